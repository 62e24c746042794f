//! Spinner-backed progress callback for the terminal

use crate::cli::style::{Stream, Stylize, arrow, check, cross, hyperlink_url, spinner_style};
use anstream::{eprintln, println};
use async_trait::async_trait;
use gfr::error::Error;
use gfr::types::{Issue, PullRequest, Release};
use gfr::workflow::ProgressCallback;
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;

/// CLI progress callback
///
/// Each step shows a spinner until it completes, then collapses into a
/// checkmark line. Messages printed while a step runs go above the spinner.
#[derive(Default)]
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|mut s| s.take())
    }

    fn println(&self, line: &str) {
        let guard = self.spinner.lock().ok();
        match guard.as_ref().and_then(|s| s.as_ref()) {
            Some(spinner) => spinner.println(line),
            None => println!("{line}"),
        }
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_step(&self, step: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!("{step}..."));
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(spinner) {
                previous.finish_and_clear();
            }
        }
    }

    async fn on_step_done(&self, message: &str) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_and_clear();
        }
        println!("{} {message}", check());
    }

    async fn on_issue_created(&self, issue: &Issue) {
        let number = format!("#{}", issue.number);
        self.println(&format!(
            "  {} Issue {} {}",
            arrow(),
            number.accent(),
            hyperlink_url(Stream::Stdout, &issue.html_url)
        ));
    }

    async fn on_pr_merged(&self, pr: &PullRequest) {
        let number = format!("#{}", pr.number);
        self.println(&format!(
            "  {} Pull request {} into {} {}",
            arrow(),
            number.accent(),
            pr.base_ref.emphasis(),
            hyperlink_url(Stream::Stdout, &pr.html_url)
        ));
    }

    async fn on_release_published(&self, release: &Release) {
        self.println(&format!(
            "  {} Release {} {}",
            arrow(),
            release.tag_name.accent(),
            hyperlink_url(Stream::Stdout, &release.html_url)
        ));
    }

    async fn on_error(&self, err: &Error) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_and_clear();
        }
        eprintln!("{} {}", cross(), err.to_string().error());
    }

    async fn on_message(&self, message: &str) {
        self.println(&format!("{}", message.muted()));
    }
}
