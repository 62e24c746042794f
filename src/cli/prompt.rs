//! Terminal prompts backed by dialoguer

use crate::cli::style::Stylize;
use anstream::eprintln;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use gfr::error::Result;
use gfr::workflow::{MULTILINE_TERMINATOR, Prompter, read_list, read_multiline};
use std::io;

/// Prompter reading from the controlling terminal
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn multiline(&self, prompt: &str) -> Result<String> {
        eprintln!(
            "{} {}",
            prompt.emphasis().for_stderr(),
            format!("(finish with {MULTILINE_TERMINATOR} on its own line)")
                .muted()
                .for_stderr()
        );
        read_multiline(io::stdin().lock())
    }

    fn list(&self, prompt: &str) -> Result<Vec<String>> {
        eprintln!("{}", prompt.emphasis().for_stderr());
        read_list(io::stdin().lock())
    }
}
