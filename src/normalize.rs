//! Error text normalization.
//!
//! Raw compiler traces carry terminal styling, absolute paths of the machine
//! that produced them, and stack frames from the host runtime. None of that
//! may reach a committed snapshot. [`Normalizer::normalize`] removes, in order:
//!
//! 1. ANSI escape sequences,
//! 2. the working directory wherever it prefixes a path,
//! 3. `at <location>` frame lines whose location is outside the project's
//!    source root.
//!
//! The passes only ever remove text, and they are repeated until the output
//! stops changing, so normalizing already-normalized text is a no-op.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Escape sequences as emitted by terminal styling libraries (CSI, OSC and
/// single-character forms, 7-bit and 8-bit introducers).
static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[\x1B\x{9B}][\[\]()#;?]*",
        r"(?:(?:(?:(?:;[-a-zA-Z\d/#&.:=?%@~_]+)*|[a-zA-Z\d]+(?:;[-a-zA-Z\d/#&.:=?%@~_]*)*)?\x07)",
        r"|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PR-TZcf-nq-uy=><~]))",
    ))
    .expect("ANSI escape pattern is valid")
});

/// A single frame line: newline, indentation, `at`, location to end of line.
static STACK_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\r?\n +at ([^\n]+)$").expect("stack frame pattern is valid"));

/// Introducer bytes left over once well-formed sequences are gone.
const STRAY_ESCAPES: [char; 2] = ['\u{1b}', '\u{9b}'];

#[derive(Debug, Clone)]
pub struct Normalizer {
    cwd: Option<Regex>,
    source_root: String,
}

impl Normalizer {
    /// Creates a normalizer for one harness run.
    ///
    /// `cwd` is the absolute working directory to strip; `source_root` is the
    /// leading path segment (for example `packages`) of frames that belong to
    /// the project and must be kept.
    pub fn new(cwd: impl AsRef<Path>, source_root: impl Into<String>) -> Self {
        let cwd = cwd.as_ref().to_string_lossy();
        let cwd = cwd.trim_end_matches(is_separator);
        let cwd = if cwd.is_empty() {
            None
        } else {
            // The separator is optional so a bare trailing reference to the
            // project root is caught as well.
            Regex::new(&format!(r"{}([/\\])?", regex::escape(cwd))).ok()
        };
        Self {
            cwd,
            source_root: source_root.into(),
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut current = raw.to_string();
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let text = strip_ansi(text);
        let text = self.strip_cwd(&text);
        self.strip_foreign_frames(&text)
    }

    pub fn strip_cwd(&self, text: &str) -> String {
        let Some(cwd) = &self.cwd else {
            return text.to_string();
        };
        cwd.replace_all(text, |caps: &Captures| {
            if caps.get(1).is_some() {
                return String::new();
            }
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            match text[whole.end..].chars().next() {
                Some(c) if is_path_char(c) => text[whole].to_string(),
                _ => ".".to_string(),
            }
        })
        .into_owned()
    }

    pub fn strip_foreign_frames(&self, text: &str) -> String {
        STACK_FRAME
            .replace_all(text, |caps: &Captures| {
                let location = caps.get(1).map_or("", |m| m.as_str());
                if self.is_project_frame(location) {
                    caps[0].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }

    fn is_project_frame(&self, location: &str) -> bool {
        location
            .strip_prefix(self.source_root.as_str())
            .is_some_and(|rest| rest.starts_with(is_separator))
    }
}

pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE
        .replace_all(text, "")
        .replace(|c: char| STRAY_ESCAPES.contains(&c), "")
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}
