//! Soft warnings collected during a conversion run.
//!
//! None of these stop a conversion: the offending reference or kind is
//! treated as absent (or coerced) and processing continues. Each warning is
//! also emitted as a `tracing` event when it is recorded.

use std::fmt;

/// A non-fatal problem found while converting a skeleton
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub category: WarningCategory,
    pub message: String,
}

/// Category of warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCategory {
    /// Element kind not recognised; treated as a rectangle
    UnknownKind,
    /// Connector endpoint that may refer to an element of the prior document
    UnknownReference,
    /// Frame child id that resolves to nothing
    UnknownFrameChild,
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningCategory::UnknownKind => write!(f, "unknown-kind"),
            WarningCategory::UnknownReference => write!(f, "unknown-reference"),
            WarningCategory::UnknownFrameChild => write!(f, "unknown-frame-child"),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Accumulates warnings for one run
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, category: WarningCategory, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%category, "{message}");
        self.warnings.push(Warning { category, message });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
