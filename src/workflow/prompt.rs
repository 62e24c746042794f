//! Operator prompts
//!
//! The workflows ask questions through [`Prompter`]; the binary answers with
//! terminal widgets and tests answer from a script. Free-text readers for
//! multi-line descriptions and item lists live here so every front end
//! terminates them the same way.

use crate::error::Result;
use std::io::BufRead;

/// Line that ends multi-line input
pub const MULTILINE_TERMINATOR: &str = "'''";

/// Interactive questions a workflow may ask
///
/// Implementations map an operator interrupt to
/// [`crate::error::Error::Cancelled`].
pub trait Prompter: Send + Sync {
    /// Single line of text, with an optional pre-filled default
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Pick one of `items`, returning its index
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Free text until a `'''` line or end of input
    fn multiline(&self, prompt: &str) -> Result<String>;

    /// One item per line until an empty line or end of input
    fn list(&self, prompt: &str) -> Result<Vec<String>>;
}

/// Read lines until a line holding only `'''` or end of input
///
/// Lines are kept verbatim; the terminator itself is dropped.
pub fn read_multiline(reader: impl BufRead) -> Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim() == MULTILINE_TERMINATOR {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim_end().to_string())
}

/// Read non-empty lines until the first empty line or end of input
pub fn read_list(reader: impl BufRead) -> Result<Vec<String>> {
    let mut items = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let item = line.trim();
        if item.is_empty() {
            break;
        }
        items.push(item.to_string());
    }
    Ok(items)
}
