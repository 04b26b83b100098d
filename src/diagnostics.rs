//! Compiler diagnostics and their snapshot rendering.
//!
//! The compiler returns diagnostics in source encounter order. Each one is
//! rendered on a single line:
//!
//! ```text
//! <type>[fixable](<startLine>:<startCol>-<endLine>:<endCol>): <label>
//! ```
//!
//! Columns are stored 0-based and printed 1-based. Lines are printed as
//! stored. The `[fixable]` tag and the location clause are only present when
//! the diagnostic carries them.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// DATA MODEL
// =============================================================================

/// A line/column pair. `column` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Source range of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

/// A structured note emitted by the compiler.
///
/// Deserializes from the compiler's wire shape `{type, fix, loc, label}`,
/// and also accepts `fixable` and `location` for the same fields.
/// `fix` may be any JSON value; the diagnostic is fixable when it is truthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        rename = "fix",
        alias = "fixable",
        default,
        deserialize_with = "deserialize_truthy"
    )]
    pub fixable: bool,
    #[serde(
        rename = "loc",
        alias = "location",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Location>,
    pub label: String,
}

impl Diagnostic {
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fixable: false,
            location: None,
            label: label.into(),
        }
    }

    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }

    pub fn at(mut self, start: (usize, usize), end: (usize, usize)) -> Self {
        self.location = Some(Location {
            start: Position {
                line: start.0,
                column: start.1,
            },
            end: Position {
                line: end.0,
                column: end.1,
            },
        });
        self
    }
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

// =============================================================================
// FORMATTING
// =============================================================================

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}:{}-{}:{})",
            self.start.line,
            self.start.column + 1,
            self.end.line,
            self.end.column + 1
        )
    }
}

/// Renders a single diagnostic without the trailing newline.
impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.fixable {
            write!(f, "[fixable]")?;
        }
        if let Some(location) = &self.location {
            write!(f, "{}", location)?;
        }
        write!(f, ": {}", self.label)
    }
}

/// Renders diagnostics in order, one newline-terminated line each.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        out.push_str(&diagnostic.to_string());
        out.push('\n');
    }
    out
}
