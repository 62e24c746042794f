//! Terminal styling for `ggg` output
//!
//! Every colored string goes through [`Stylize`], so the palette lives in one
//! place and color detection (`NO_COLOR`, `CLICOLOR_FORCE`, TTY) is left to
//! `owo-colors`:
//!
//! | Method        | Look   | Used for                                  |
//! |---------------|--------|-------------------------------------------|
//! | `accent()`    | cyan   | repositories, branches, issue/PR numbers  |
//! | `success()`   | green  | check marks, staged files                 |
//! | `error()`     | red    | failures, unstaged files (stderr default) |
//! | `warn()`      | yellow | current branch, cancellation (stderr)     |
//! | `muted()`     | dim    | hints and follow-up instructions          |
//! | `emphasis()`  | bold   | headings                                  |

use indicatif::ProgressStyle;
pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};
use std::fmt::{self, Display};
use std::sync::OnceLock;

/// Palette entries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Accent,
    Success,
    Error,
    Warn,
    Muted,
    Emphasis,
}

impl Tone {
    const fn style(self) -> Style {
        match self {
            Self::Accent => Style::new().cyan(),
            Self::Success => Style::new().green(),
            Self::Error => Style::new().red(),
            Self::Warn => Style::new().yellow(),
            Self::Muted => Style::new().dimmed(),
            Self::Emphasis => Style::new().bold(),
        }
    }

    /// Stream whose color support decides rendering unless overridden
    const fn stream(self) -> Stream {
        match self {
            Self::Error | Self::Warn => Stream::Stderr,
            _ => Stream::Stdout,
        }
    }
}

/// A value rendered in a palette tone
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    tone: Tone,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, tone: Tone) -> Self {
        Self {
            value,
            tone,
            stream: tone.stream(),
        }
    }

    /// Detect color support on stderr instead
    #[must_use]
    pub const fn for_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }

    /// Detect color support on stdout instead
    #[must_use]
    pub const fn for_stdout(mut self) -> Self {
        self.stream = Stream::Stdout;
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.tone.style();
        write!(
            f,
            "{}",
            self.value.if_supports_color(self.stream, |v| v.style(style))
        )
    }
}

/// Palette methods for anything printable
pub trait Stylize: Display {
    /// Cyan
    fn accent(&self) -> Styled<&Self> {
        Styled::new(self, Tone::Accent)
    }

    /// Green
    fn success(&self) -> Styled<&Self> {
        Styled::new(self, Tone::Success)
    }

    /// Red
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, Tone::Error)
    }

    /// Yellow
    fn warn(&self) -> Styled<&Self> {
        Styled::new(self, Tone::Warn)
    }

    /// Dim
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, Tone::Muted)
    }

    /// Bold
    fn emphasis(&self) -> Styled<&Self> {
        Styled::new(self, Tone::Emphasis)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green `✓` for a finished step
pub const fn check() -> Styled<&'static str> {
    Styled::new("✓", Tone::Success)
}

/// Red `✗` for a failed step or repository
pub const fn cross() -> Styled<&'static str> {
    Styled::new("✗", Tone::Error)
}

/// Cyan `→` in front of created issues, PRs and releases
pub const fn arrow() -> Styled<&'static str> {
    Styled::new("→", Tone::Accent)
}

/// `url` as an OSC 8 hyperlink where the terminal supports it
pub fn hyperlink_url(stream: Stream, url: &str) -> String {
    let target = match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    };
    if supports_hyperlinks::on(target) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

/// Spinner shown while a workflow step runs
pub fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        })
        .clone()
}
