//! Fancy diagnostics of chart parse errors using `ariadne`.
//!
//! [`McParseError`] knows only the line and the column where `serde_json` stopped. This module
//! turns them into a character span of the source, so `ariadne` can render the error with the
//! surrounding lines.
//!
//! # Usage Example
//!
//! ```rust
//! use malody2osu::{diagnostics::emit_parse_error, malody::parse_mc};
//!
//! let source = "{\n  \"meta\": {\n    \"mode\": \"zero\"\n  }\n}";
//! if let Err(err) = parse_mc(source) {
//!     emit_parse_error("broken.mc", source, &err);
//! }
//! ```

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::malody::{McParseError, strip_bom};

/// Simple source container that holds the file name and source text.
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container. A leading byte order mark of `text` is dropped, as the
    /// parser does.
    #[must_use]
    pub fn new(name: &'a str, text: &'a str) -> Self {
        Self {
            name,
            text: strip_bom(text),
        }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting errors with a source location to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

/// Character span of the one-based `line` and `column` in `text`, as reported by `serde_json`.
///
/// The span covers one character, or is empty at the end of the text.
#[must_use]
pub fn char_span(text: &str, line: usize, column: usize) -> Range<usize> {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let byte = (line_start + column.saturating_sub(1)).min(text.len());
    let start = text.char_indices().take_while(|&(i, _)| i < byte).count();
    let end = if start < text.chars().count() {
        start + 1
    } else {
        start
    };
    start..end
}

impl ToAriadne for McParseError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        let (line, column) = self.line_column();
        let range = char_span(src.text(), line, column);
        let title = match self {
            Self::Json { path, .. } => format!("invalid chart at `{path}`"),
            Self::Trailing(_) => "trailing characters after chart".to_string(),
        };
        let label = self.json_error().to_string();
        build_report(src, ReportKind::Error, range, &title, label, Color::Red)
    }
}

/// Render a parse error of the chart `name` to stderr.
pub fn emit_parse_error(name: &str, source: &str, error: &McParseError) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(simple.text())));
}

/// Render a parse error into a string without colors, for logs and tests.
#[must_use]
pub fn render_parse_error(name: &str, source: &str, error: &McParseError) -> String {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let mut out = Vec::new();
    let _ = report.write((name.to_string(), Source::from(simple.text())), &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
