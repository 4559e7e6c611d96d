use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::{OwoColorize, Stream::Stderr};

use crate::{document::Document, raw::Author};

/// Human-facing progress on stderr. Lines are printed around the progress bar so they never
/// interleave with it; the bar itself only draws on a terminal, and nothing is printed when quiet.
pub struct Reporter {
    bar: ProgressBar,
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Reporter {
            bar: ProgressBar::hidden(),
            quiet,
        }
    }

    fn line(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        self.bar.suspend(|| eprintln!("{}", msg.as_ref()));
    }

    pub fn profile<S>(&self, author: &Author<S>) {
        let affiliation = if author.affiliation.is_empty() {
            "N/A"
        } else {
            author.affiliation.as_str()
        };
        self.line(format!(
            "Found: {}",
            author.name.if_supports_color(Stderr, |t| t.bold())
        ));
        self.line(format!("Affiliation: {affiliation}"));
        self.line(format!("Citations: {}", author.citedby));
        self.line(format!("h-index: {}", author.hindex));
        self.line(format!("i10-index: {}", author.i10index));
    }

    pub fn start(&self, total: usize) {
        self.line(format!("Parsing {total} publications..."));
        self.bar.set_length(total as u64);
        if !self.quiet {
            self.bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}") {
            self.bar.set_style(style.progress_chars("=> "));
        }
    }

    pub fn fetching(&self, index: usize) {
        self.bar.set_message(format!("[{index}] fetching details"));
    }

    pub fn parsed(&self, index: usize, title: &str) {
        self.bar.inc(1);
        self.line(format!(
            "  {} [{index}] {}",
            "✓".if_supports_color(Stderr, |t| t.green()),
            truncate(title, 50)
        ));
    }

    pub fn skipped(&self, index: usize, err: &dyn std::fmt::Display) {
        self.bar.inc(1);
        self.line(format!(
            "  {} [{index}] {err}",
            "✗".if_supports_color(Stderr, |t| t.red())
        ));
    }

    pub fn finish(&self, parsed: usize, skipped: usize) {
        self.bar.finish_and_clear();
        self.line(format!(
            "{} {parsed} parsed, {} {skipped} skipped",
            "✓".if_supports_color(Stderr, |t| t.green()),
            "✗".if_supports_color(Stderr, |t| t.red())
        ));
    }

    pub fn converted(&self, document: &Document) {
        self.line(format!(
            "{} converted to YAML",
            "✓".if_supports_color(Stderr, |t| t.green())
        ));
        self.line(format!("  Publications: {}", document.publications.len()));
        self.line(format!("  Citations: {}", document.profile.citations));
        self.line(format!("  h-index: {}", document.profile.h_index));
    }
}

/// First `max` characters, with an ellipsis when anything was cut.
pub fn truncate(s: &str, max: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("ééééé", 3), "ééé...");
        assert_eq!(truncate("", 3), "");
    }
}
