use std::io::{self, Write};
use std::path::PathBuf;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Outcome of scanning a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Every token scanned cleanly.
    Scanned,
    /// A comment was rejected by the comment-safety policy.
    Rejected,
    /// The file could not be read or tokenized.
    Error,
}

/// Result of scanning a single file.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub tokens: usize,
    pub error: Option<String>,
}

/// Aggregated report of scan results.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn scanned(&self) -> usize {
        self.count(FileStatus::Scanned)
    }

    pub fn rejected(&self) -> usize {
        self.count(FileStatus::Rejected)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn total_tokens(&self) -> usize {
        self.results.iter().map(|r| r.tokens).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn has_rejections(&self) -> bool {
        self.rejected() > 0
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("{} file(s) processed", self.total()));
        if self.scanned() > 0 {
            parts.push(format!(
                "{} scanned ({} tokens)",
                self.scanned(),
                self.total_tokens()
            ));
        }
        if self.rejected() > 0 {
            parts.push(format!("{} rejected", self.rejected()));
        }
        if self.errors() > 0 {
            parts.push(format!("{} error(s)", self.errors()));
        }
        parts.join(", ")
    }

    /// Print one line per file to stderr.
    pub fn print_results(&self, color: bool) -> io::Result<()> {
        let mut out = StandardStream::stderr(color_choice(color));
        for result in &self.results {
            let (label, fg) = match result.status {
                FileStatus::Scanned => ("scanned", Color::Green),
                FileStatus::Rejected => ("rejected", Color::Yellow),
                FileStatus::Error => ("error", Color::Red),
            };
            out.set_color(ColorSpec::new().set_fg(Some(fg)).set_bold(true))?;
            write!(out, "{}", label)?;
            out.reset()?;
            writeln!(out, " {} ({} tokens)", result.path.display(), result.tokens)?;
        }
        Ok(())
    }

    /// Print rejection and error details to stderr.
    pub fn print_errors(&self, color: bool) -> io::Result<()> {
        let mut out = StandardStream::stderr(color_choice(color));
        for result in &self.results {
            let Some(ref error) = result.error else {
                continue;
            };
            let (label, fg) = match result.status {
                FileStatus::Rejected => ("rejected", Color::Yellow),
                _ => ("error", Color::Red),
            };
            out.set_color(ColorSpec::new().set_fg(Some(fg)).set_bold(true))?;
            write!(out, "{}", label)?;
            out.reset()?;
            writeln!(out, ": {}: {}", result.path.display(), error)?;
        }
        Ok(())
    }
}

fn color_choice(color: bool) -> ColorChoice {
    if color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
}
