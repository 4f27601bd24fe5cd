//! Configuration for document output

/// Default `source` written into the document header
pub const DEFAULT_SOURCE: &str = "https://github.com/fakoli/excalidraw-diagram-plugin";

/// Configuration options for the emitted document
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Padding between the content bounds and the initial viewport
    pub viewport_padding: f64,

    /// Value of the document's `source` field
    pub source: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            viewport_padding: 100.0,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport padding
    pub fn with_viewport_padding(mut self, padding: f64) -> Self {
        self.viewport_padding = padding;
        self
    }

    /// Set the document source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}
