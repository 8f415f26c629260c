//! Diagnostic rendering for parse errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use tomlkeys_tree::KeySink;

use crate::{Driver, Error, ErrorKind};

/// Name shown for sources without a filename.
const UNNAMED_SOURCE: &str = "<input>";

impl Error {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range = self
            .location
            .map_or(source.len()..source.len(), |l| l.byte_range(source));

        let title = match self.kind {
            ErrorKind::Memory => "out of memory",
            ErrorKind::Internal => "internal error",
            ErrorKind::Syntactic => "syntax error",
            ErrorKind::Semantic => "invalid TOML",
            ErrorKind::Resource => "cannot read source",
        };

        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(title)
            .with_label(
                Label::new((filename, range))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            );
        if self.kind == ErrorKind::Internal {
            report = report.with_note("the event sequence does not match the TOML grammar");
        }

        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

impl<S: KeySink> Driver<S> {
    /// Render the latched error against `source`, labelled with the
    /// configured filename.
    pub fn render_error(&self, source: &str) -> Option<String> {
        let filename = self.options().filename.as_deref().unwrap_or(UNNAMED_SOURCE);
        self.error().map(|error| error.render(filename, source))
    }
}
