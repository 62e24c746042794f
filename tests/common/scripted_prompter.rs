//! Prompter that answers from a script

use gfr::error::{Error, Result};
use gfr::workflow::Prompter;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Answer {
    Text(String),
    Choice(usize),
    Confirm(bool),
    Lines(Vec<String>),
    /// The operator pressed Ctrl-C
    Interrupt,
}

impl Answer {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }

    pub fn lines(items: &[&str]) -> Self {
        Self::Lines(items.iter().map(ToString::to_string).collect())
    }
}

/// Answers prompts in order and records what was asked
///
/// Panics when a prompt has no scripted answer or the answer has the wrong
/// shape, so a test fails at the prompt it did not expect.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        self.asked.lock().unwrap().push(prompt.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(Answer::Interrupt) => Err(Error::Cancelled),
            Some(answer) => Ok(answer),
            None => panic!("no scripted answer for prompt: {prompt}"),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(s) if s.is_empty() => Ok(default.unwrap_or_default().to_string()),
            Answer::Text(s) => Ok(s),
            other => panic!("expected text for '{prompt}', scripted {other:?}"),
        }
    }

    fn select(&self, prompt: &str, items: &[&str], _default: usize) -> Result<usize> {
        match self.next(prompt)? {
            Answer::Choice(i) if i < items.len() => Ok(i),
            other => panic!("expected a choice among {items:?} for '{prompt}', scripted {other:?}"),
        }
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(b) => Ok(b),
            other => panic!("expected yes/no for '{prompt}', scripted {other:?}"),
        }
    }

    fn multiline(&self, prompt: &str) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(s) => Ok(s),
            other => panic!("expected free text for '{prompt}', scripted {other:?}"),
        }
    }

    fn list(&self, prompt: &str) -> Result<Vec<String>> {
        match self.next(prompt)? {
            Answer::Lines(items) => Ok(items),
            other => panic!("expected a list for '{prompt}', scripted {other:?}"),
        }
    }
}
