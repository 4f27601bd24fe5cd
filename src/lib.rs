//! Excalidraw Skeleton - expand compact diagram skeletons into Excalidraw documents
//!
//! A skeleton names shapes, connectors, labels and frames with as little
//! geometry as the author cares to give. This library assigns ids, lays out
//! unpositioned shapes, binds connectors to shape edges, sizes frames and, in
//! edit mode, merges the result into an existing document.
//!
//! # Example
//!
//! ```rust
//! use excalidraw_skeleton::convert;
//!
//! let output = convert(r#"{"elements": [{"type": "rectangle", "id": "a", "label": "Server"}]}"#).unwrap();
//! assert_eq!(output.document.element_count(), 2);
//! ```

pub mod convert;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod layout;
pub mod skeleton;
pub mod stylesheet;
pub mod tokens;

pub use convert::ConvertOutput;
pub use diagnostics::{Diagnostics, Warning, WarningCategory};
pub use document::{Document, DocumentElement, OutputConfig, PriorDocument};
pub use error::ConvertError;
pub use layout::LayoutConfig;
pub use skeleton::{Mode, SkeletonDocument};
pub use stylesheet::Stylesheet;
pub use tokens::{RandomTokens, SequentialTokens, TokenSource};

/// Configuration for the complete conversion pipeline
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// Document output configuration
    pub output: OutputConfig,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
}

impl ConvertConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the output configuration
    pub fn with_output(mut self, config: OutputConfig) -> Self {
        self.output = config;
        self
    }

    /// Set the stylesheet for color resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }
}

/// Convert skeleton JSON to a new document with default configuration
pub fn convert(source: &str) -> Result<ConvertOutput, ConvertError> {
    convert_with_config(source, None, &ConvertConfig::default())
}

/// Convert skeleton JSON, merging into `prior` (an existing document's JSON)
/// when given
///
/// # Example
///
/// ```rust
/// use excalidraw_skeleton::{convert, convert_with_config, ConvertConfig, LayoutConfig};
///
/// let first = convert(r#"{"elements": [{"type": "rectangle", "id": "a"}]}"#).unwrap();
/// let existing = serde_json::to_string(&first.document).unwrap();
///
/// let config = ConvertConfig::new().with_layout(LayoutConfig::default().with_spacing(40.0, 40.0));
/// let edited = convert_with_config(
///     r#"{"elements": [{"type": "ellipse", "id": "b"}]}"#,
///     Some(&existing),
///     &config,
/// )
/// .unwrap();
/// assert_eq!(edited.document.element_count(), 2);
/// ```
pub fn convert_with_config(
    source: &str,
    prior: Option<&str>,
    config: &ConvertConfig,
) -> Result<ConvertOutput, ConvertError> {
    convert_with_tokens(source, prior, config, &mut RandomTokens::thread())
}

/// Convert skeleton JSON drawing ids, seeds and timestamps from `tokens`
///
/// With a deterministic [`TokenSource`] the output is fully reproducible.
pub fn convert_with_tokens(
    source: &str,
    prior: Option<&str>,
    config: &ConvertConfig,
    tokens: &mut dyn TokenSource,
) -> Result<ConvertOutput, ConvertError> {
    let mode = if prior.is_some() { Mode::Edit } else { Mode::Fresh };
    let mut diagnostics = Diagnostics::new();

    let skeleton = skeleton::parse(source, mode, &mut diagnostics)?;
    let prior = prior
        .map(PriorDocument::from_str)
        .transpose()
        .map_err(ConvertError::PriorDocument)?;

    let document = convert::convert_document(&skeleton, prior, config, tokens, &mut diagnostics);
    Ok(ConvertOutput {
        document,
        warnings: diagnostics.into_warnings(),
    })
}
