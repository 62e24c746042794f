//! CHANGELOG.md entries and release notes

use crate::types::Version;
use chrono::NaiveDate;
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

/// File the release workflow maintains in each repository
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Contents of a freshly created changelog, before the first entry
pub const CHANGELOG_TEMPLATE: &str = "\
# Changelog

All notable changes to this project will be documented in this file.
The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.1.0/), \
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).
";

/// One release section of the changelog
#[derive(Debug, Clone)]
pub struct ChangelogEntry {
    /// Released version
    pub version: Version,
    /// Web URL of the repository, used for the release link
    pub web_url: String,
    /// Release date
    pub date: NaiveDate,
    /// `### Added` items
    pub added: Vec<String>,
    /// `### Changed` items
    pub changed: Vec<String>,
    /// `### Fixed` items
    pub fixed: Vec<String>,
}

impl ChangelogEntry {
    /// Render the entry; empty categories are left out
    pub fn render(&self) -> String {
        let mut out = format!(
            "## [{version}]({url}/releases/tag/v{version}) - {date}\n",
            version = self.version,
            url = self.web_url,
            date = self.date.format("%Y-%m-%d"),
        );
        for (category, items) in [
            ("Added", &self.added),
            ("Changed", &self.changed),
            ("Fixed", &self.fixed),
        ] {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "### {category}");
            for item in items {
                let _ = writeln!(out, "- {item}");
            }
        }
        out
    }
}

fn header_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)# Changelog\n\n.*?\n\n").expect("hardcoded regex is valid"))
}

/// Place a rendered entry into the changelog
///
/// With no existing file the template is used. Otherwise the entry goes right
/// after the header block (title, blank line, intro paragraph, blank line);
/// a file without that block gets the entry at the top. With no intro
/// paragraph the first blank-line-terminated entry stands in for it.
pub fn insert_entry(existing: Option<&str>, entry: &str) -> String {
    let Some(content) = existing else {
        return format!("{}\n\n{entry}", CHANGELOG_TEMPLATE.trim());
    };

    match header_block_re().find(content) {
        Some(header) => {
            let (head, rest) = content.split_at(header.end());
            format!("{head}{entry}\n{rest}")
        }
        None => format!("{entry}\n{content}"),
    }
}

/// Body of the published release
///
/// `commits` are one-line summaries; each becomes a bullet.
pub fn release_notes(html_url: &str, tag: &str, commits: &[String], extra_notes: &str) -> String {
    let mut notes = String::from("## Changelog\n");
    let _ = writeln!(
        notes,
        "See the [CHANGELOG.md]({html_url}/blob/main/CHANGELOG.md) for detailed changes.\n"
    );
    notes.push_str("## Commits\n");
    for commit in commits {
        let _ = writeln!(notes, "- {commit}");
    }
    let _ = writeln!(
        notes,
        "\n[View the full list of commits for this release]({html_url}/commits/{tag})\n"
    );
    notes.push_str("## Notes\n");
    notes.push_str(extra_notes.trim());
    notes
}
