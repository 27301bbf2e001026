//! Fancy diagnostics support using `ariadne`.
//!
//! This module provides convenient methods to convert positioned errors and warnings
//! ([`SusErrorWithRange`] and [`SusWarningWithRange`]) to `ariadne::Report`
//! without modifying existing error type definitions.
//!
//! Since `SourceRangeMixin` contains index span information (start/end byte offsets), this module
//! lets ariadne automatically handle row/column calculations for display purposes.
//!
//! # Usage Example
//!
//! ```rust
//! use sus_rs::{
//!     diagnostics::{emit_sus_error, emit_sus_warnings},
//!     sus::parse_sus,
//! };
//!
//! let source = "#BPM01: 120\n#BPM02: 180\n#00002: 4\n#00008: 01\n";
//! match parse_sus(source) {
//!     Ok(output) => emit_sus_warnings("test.sus", source, &output.warnings),
//!     Err(err) => emit_sus_error("test.sus", source, &err),
//! }
//! ```

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::sus::{SusErrorWithRange, SusWarningWithRange};

/// Simple source container that holds the filename and source text.
/// Ariadne will automatically handle row/column calculations from byte offsets.
///
/// # Usage Example
///
/// ```rust
/// use sus_rs::diagnostics::SimpleSource;
///
/// let source_text = "#TITLE test\n#ARTIST composer\n";
/// let source = SimpleSource::new("test.sus", source_text);
///
/// assert_eq!(source.text(), source_text);
/// assert_eq!(source.name(), "test.sus");
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
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    ///
    /// # Parameters
    /// * `src` - Source file container (used for filename, ariadne handles row/column calculation)
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
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

impl ToAriadne for SusWarningWithRange {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        build_report(
            src,
            ReportKind::Warning,
            self.range(),
            "sus warning",
            self.content(),
            Color::Blue,
        )
    }
}

impl ToAriadne for SusErrorWithRange {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        build_report(
            src,
            ReportKind::Error,
            self.range(),
            "sus error",
            self.content(),
            Color::Red,
        )
    }
}

/// Convenience method: batch render [`SusWarningWithRange`] list.
///
/// # Parameters
/// * `name` - Name of the source file, used for display in diagnostic information
/// * `source` - Complete SUS source text
/// * `warnings` - List of warnings to display
pub fn emit_sus_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a SusWarningWithRange>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.eprint((name.to_string(), ariadne_source.clone()));
    }
}

/// Convenience method: render a [`SusErrorWithRange`].
pub fn emit_sus_error(name: &str, source: &str, error: &SusErrorWithRange) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}

/// Collect `ariadne::Report` instances for a list of warnings without printing.
///
/// This is useful in tests to verify diagnostics can be generated while keeping test output clean.
#[must_use]
pub fn collect_sus_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a SusWarningWithRange>,
) -> Vec<Report<'a, (String, std::ops::Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings.into_iter().map(|w| w.to_report(&simple)).collect()
}
