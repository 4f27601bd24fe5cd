//! Error types for skeleton conversion

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Errors that abort a conversion run
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The skeleton is not well-formed JSON
    #[error("Invalid skeleton JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// Structural problems, reported all at once
    #[error("Skeleton validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),

    /// Structurally valid, but a field has the wrong type
    #[error("Invalid skeleton: {0}")]
    Schema(#[source] serde_json::Error),

    /// The document being edited could not be read
    #[error("Invalid existing document: {0}")]
    PriorDocument(#[source] serde_json::Error),
}

impl ConvertError {
    /// Messages of a validation failure
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            ConvertError::Validation(messages) => Some(messages),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// JSON errors point at the offending position in `source`; other errors
    /// render as their display text.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let json_error = match self {
            ConvertError::Syntax(e) | ConvertError::Schema(e) => e,
            _ => return self.to_string(),
        };

        let offset = char_offset(source, json_error.line(), json_error.column());
        let end = (offset + 1).min(source.chars().count()).max(offset);
        let message = self.to_string();

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, offset)
            .with_config(Config::default().with_color(false))
            .with_message(&message)
            .with_label(
                Label::new((filename, offset..end))
                    .with_message(json_error.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}

/// Character offset of a 1-based line and column, clamped to the source
fn char_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut current_line = 1;
    let mut current_column = 1;
    for (i, c) in source.chars().enumerate() {
        if current_line == line && current_column == column {
            return i;
        }
        if c == '\n' {
            if current_line == line {
                return i;
            }
            current_line += 1;
            current_column = 1;
        } else {
            current_column += 1;
        }
    }
    source.chars().count()
}
