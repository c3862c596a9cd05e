//! Fancy diagnostics support using `ariadne`.
//!
//! [`ChartParseError`] carries the byte range of the offending text, so it can be rendered
//! against the chart source without changing the error type. Ariadne handles row/column
//! calculation from the byte offsets.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use mania2invaxion::{chart::Chart, diagnostics::emit_chart_parse_error};
//!
//! let source = "0:\n1,120;\n\n1:\n11,0021;\n\n";
//! if let Err(err) = Chart::parse(source) {
//!     emit_chart_parse_error("song.txt", source, &err);
//! }
//! # }
//! ```

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

#[cfg(feature = "diagnostics")]
use crate::chart::parse::ChartParseError;

/// Simple source container that holds the filename and source text.
///
/// # Usage Example
///
/// ```rust
/// use mania2invaxion::diagnostics::SimpleSource;
///
/// let source_text = "0:\n1,120;\n\n1:\n3,1;\n\n";
/// let source = SimpleSource::new("song.txt", source_text);
///
/// assert_eq!(source.text(), source_text);
/// assert_eq!(source.name(), "song.txt");
/// ```
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
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

/// Trait for converting positioned errors to `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    ///
    /// `src` provides the file name; ariadne computes rows and columns itself.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
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

#[cfg(feature = "diagnostics")]
impl ToAriadne for ChartParseError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        // An empty range would point at nothing, so widen it to the next char if any.
        let range = if self.range.is_empty() {
            let start = self.range.start;
            let end = src
                .text()
                .get(start..)
                .and_then(|rest| rest.chars().next())
                .map_or(start, |c| start + c.len_utf8());
            start..end
        } else {
            self.range.clone()
        };
        build_report(
            src,
            ReportKind::Error,
            range,
            "chart: invalid chart text",
            &self.kind,
            Color::Red,
        )
    }
}

/// Renders a chart parse error to stderr.
#[cfg(feature = "diagnostics")]
pub fn emit_chart_parse_error(name: &str, source: &str, error: &ChartParseError) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}

/// Builds the report of a chart parse error without printing it.
///
/// This is useful in tests to verify diagnostics can be generated while keeping test output clean.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn chart_parse_report<'a>(
    name: &'a str,
    source: &'a str,
    error: &ChartParseError,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    error.to_report(&SimpleSource::new(name, source))
}
