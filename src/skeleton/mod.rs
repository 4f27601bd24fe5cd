//! Skeleton input: the compact, author-friendly description of a diagram
//!
//! [`parse`] turns skeleton JSON into a typed [`SkeletonDocument`], running
//! structural validation first so every problem is reported in one error.

pub mod types;
pub mod validate;

pub use types::{
    ConnectorSpec, FrameSpec, Geometry, RawElement, RawSkeleton, ShapeKind, SkeletonDocument,
    SkeletonElement, SkeletonKind, StyleFlags, TextSpec,
};
pub use validate::{validate, IssueKind, ValidationIssue};

use serde_json::Value;

use crate::diagnostics::{Diagnostics, WarningCategory};
use crate::error::ConvertError;

/// Whether a skeleton describes a new document or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Fresh,
    /// Connector endpoints may name elements of the prior document
    Edit,
}

/// Parse and validate skeleton JSON
///
/// Structural issues are fatal. Unknown connector endpoints are fatal in
/// [`Mode::Fresh`] and recorded as warnings in [`Mode::Edit`].
pub fn parse(
    source: &str,
    mode: Mode,
    diagnostics: &mut Diagnostics,
) -> Result<SkeletonDocument, ConvertError> {
    let value: Value = serde_json::from_str(source).map_err(ConvertError::Syntax)?;
    from_value(value, mode, diagnostics)
}

/// Validate and convert an already-parsed skeleton
pub fn from_value(
    value: Value,
    mode: Mode,
    diagnostics: &mut Diagnostics,
) -> Result<SkeletonDocument, ConvertError> {
    let issues = validate(&value);
    let (fatal, soft): (Vec<_>, Vec<_>) = issues.into_iter().partition(|issue| {
        issue.kind == IssueKind::Structural || mode == Mode::Fresh
    });

    if !fatal.is_empty() {
        return Err(ConvertError::Validation(
            fatal.into_iter().map(|issue| issue.message).collect(),
        ));
    }
    for issue in soft {
        diagnostics.warn(
            WarningCategory::UnknownReference,
            format!("{} (may reference existing elements)", issue.message),
        );
    }

    let raw: RawSkeleton = serde_json::from_value(value).map_err(ConvertError::Schema)?;
    Ok(SkeletonDocument::from_raw(raw, diagnostics))
}
