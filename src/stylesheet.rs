//! Theme tables for color resolution
//!
//! Skeletons name colors semantically (`blue`, `red`, ...). A theme maps each
//! semantic name to a stroke and a fill color, so the same skeleton can be
//! rendered with different color schemes. Themes are plain TOML data; the
//! built-in table can be extended or overridden from a file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

/// Theme used when a skeleton does not name one, or names an unknown one
pub const DEFAULT_THEME: &str = "default";
/// Color used when a skeleton element does not name one, or names an unknown one
pub const DEFAULT_COLOR: &str = "blue";

const DEFAULT_VIEW_BACKGROUND: &str = "#ffffff";

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Stroke and fill for one semantic color
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorPair {
    pub stroke: String,
    pub fill: String,
}

/// One named theme
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Theme {
    /// Canvas background for documents using this theme
    pub view_background: Option<String>,
    /// Semantic color name -> stroke/fill
    #[serde(default)]
    pub colors: HashMap<String, ColorPair>,
}

/// A set of named themes
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Theme name -> theme
    pub themes: HashMap<String, Theme>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    themes: HashMap<String, Theme>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Built-in themes, derived from the Excalidraw palette
const DEFAULT_THEMES: &str = r##"
[metadata]
name = "Built-in"
description = "Excalidraw palette themes"

[themes.default]
view_background = "#ffffff"

[themes.default.colors]
blue   = { stroke = "#228be6", fill = "#e7f5ff" }
red    = { stroke = "#fa5252", fill = "#fff5f5" }
green  = { stroke = "#40c057", fill = "#ebfbee" }
orange = { stroke = "#fd7e14", fill = "#fff4e6" }
violet = { stroke = "#7950f2", fill = "#f3f0ff" }
yellow = { stroke = "#fab005", fill = "#fff9db" }
cyan   = { stroke = "#15aabf", fill = "#e3fafc" }
teal   = { stroke = "#12b886", fill = "#e6fcf5" }
pink   = { stroke = "#e64980", fill = "#fff0f6" }
grape  = { stroke = "#be4bdb", fill = "#f8f0fc" }
gray   = { stroke = "#868e96", fill = "#f8f9fa" }
black  = { stroke = "#1e1e1e", fill = "transparent" }
white  = { stroke = "#ced4da", fill = "#ffffff" }
bronze = { stroke = "#a18072", fill = "#f8f1ee" }

[themes.blueprint]
view_background = "#1e293b"

[themes.blueprint.colors]
blue   = { stroke = "#a5d8ff", fill = "transparent" }
red    = { stroke = "#ffc9c9", fill = "transparent" }
green  = { stroke = "#b2f2bb", fill = "transparent" }
orange = { stroke = "#ffd8a8", fill = "transparent" }
violet = { stroke = "#d0bfff", fill = "transparent" }
yellow = { stroke = "#ffec99", fill = "transparent" }
cyan   = { stroke = "#99e9f2", fill = "transparent" }
teal   = { stroke = "#96f2d7", fill = "transparent" }
pink   = { stroke = "#fcc2d7", fill = "transparent" }
grape  = { stroke = "#eebefa", fill = "transparent" }
gray   = { stroke = "#ced4da", fill = "transparent" }
black  = { stroke = "#e9ecef", fill = "transparent" }
white  = { stroke = "#ced4da", fill = "transparent" }
bronze = { stroke = "#eaddd7", fill = "transparent" }

[themes.warm]
view_background = "#ffffff"

[themes.warm.colors]
blue   = { stroke = "#228be6", fill = "#fff9db" }
red    = { stroke = "#fa5252", fill = "#fff4e6" }
green  = { stroke = "#40c057", fill = "#fff9db" }
orange = { stroke = "#fd7e14", fill = "#fff4e6" }
violet = { stroke = "#7950f2", fill = "#fff0f6" }
yellow = { stroke = "#fab005", fill = "#fff9db" }
cyan   = { stroke = "#15aabf", fill = "#e6fcf5" }
teal   = { stroke = "#12b886", fill = "#ebfbee" }
pink   = { stroke = "#e64980", fill = "#fff0f6" }
grape  = { stroke = "#be4bdb", fill = "#f8f0fc" }
gray   = { stroke = "#868e96", fill = "#f8f9fa" }
black  = { stroke = "#1e1e1e", fill = "transparent" }
white  = { stroke = "#ced4da", fill = "#ffffff" }
bronze = { stroke = "#a18072", fill = "#f8f1ee" }

[themes.monochrome]
view_background = "#ffffff"

[themes.monochrome.colors]
blue   = { stroke = "#868e96", fill = "#f8f9fa" }
red    = { stroke = "#868e96", fill = "#f8f9fa" }
green  = { stroke = "#868e96", fill = "#f8f9fa" }
orange = { stroke = "#868e96", fill = "#f8f9fa" }
violet = { stroke = "#868e96", fill = "#f8f9fa" }
yellow = { stroke = "#868e96", fill = "#f8f9fa" }
cyan   = { stroke = "#868e96", fill = "#f8f9fa" }
teal   = { stroke = "#868e96", fill = "#f8f9fa" }
pink   = { stroke = "#868e96", fill = "#f8f9fa" }
grape  = { stroke = "#868e96", fill = "#f8f9fa" }
gray   = { stroke = "#868e96", fill = "#f8f9fa" }
black  = { stroke = "#1e1e1e", fill = "transparent" }
white  = { stroke = "#ced4da", fill = "#ffffff" }
bronze = { stroke = "#868e96", fill = "#f8f9fa" }
"##;

/// `#` followed by 3 to 8 hex digits
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            (3..=8).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            themes: parsed.themes,
        })
    }

    /// Look up a semantic color in one theme of this stylesheet only
    pub fn resolve(&self, color: &str, theme: &str) -> Option<&ColorPair> {
        self.themes.get(theme)?.colors.get(color)
    }

    /// Resolve a semantic color with fallbacks
    ///
    /// Fallback order:
    /// 1. This stylesheet, then the built-in table, for the requested theme
    /// 2. The same lookup in the `default` theme
    /// 3. The theme's `blue`
    pub fn resolve_or_default(&self, color: &str, theme: &str) -> ColorPair {
        let builtin = Self::builtin();
        let lookup = |color: &str, theme: &str| {
            self.resolve(color, theme)
                .or_else(|| builtin.resolve(color, theme))
                .cloned()
        };
        let theme = if self.themes.contains_key(theme) || builtin.themes.contains_key(theme) {
            theme
        } else {
            DEFAULT_THEME
        };

        lookup(color, theme)
            .or_else(|| lookup(color, DEFAULT_THEME))
            .or_else(|| lookup(DEFAULT_COLOR, theme))
            .or_else(|| lookup(DEFAULT_COLOR, DEFAULT_THEME))
            .unwrap_or_else(|| ColorPair {
                stroke: "#228be6".to_string(),
                fill: "#e7f5ff".to_string(),
            })
    }

    /// Stroke color for a semantic name or hex literal
    pub fn resolve_stroke(&self, color: &str, theme: &str) -> String {
        if is_hex_color(color) {
            return color.to_string();
        }
        self.resolve_or_default(color, theme).stroke
    }

    /// Fill color for a semantic name or hex literal
    pub fn resolve_fill(&self, color: &str, theme: &str) -> String {
        if is_hex_color(color) {
            return color.to_string();
        }
        self.resolve_or_default(color, theme).fill
    }

    /// Canvas background for a theme
    pub fn view_background(&self, theme: &str) -> String {
        self.themes
            .get(theme)
            .and_then(|t| t.view_background.clone())
            .or_else(|| {
                Self::builtin()
                    .themes
                    .get(theme)
                    .and_then(|t| t.view_background.clone())
            })
            .unwrap_or_else(|| DEFAULT_VIEW_BACKGROUND.to_string())
    }
}

impl Stylesheet {
    /// The built-in themes, parsed on first use
    pub fn builtin() -> &'static Stylesheet {
        static BUILTIN: OnceLock<Stylesheet> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::from_str(DEFAULT_THEMES).expect("Built-in themes should be valid TOML")
        })
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_parsed_once() {
        assert!(std::ptr::eq(Stylesheet::builtin(), Stylesheet::builtin()));
        let copy = Stylesheet::default();
        assert_eq!(copy.themes.len(), Stylesheet::builtin().themes.len());
    }

    #[test]
    fn test_default_stylesheet_has_all_themes() {
        let stylesheet = Stylesheet::default();
        for theme in ["default", "blueprint", "warm", "monochrome"] {
            assert_eq!(stylesheet.themes[theme].colors.len(), 14, "theme {theme}");
        }
    }

    #[test]
    fn test_resolve_semantic_color() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve_stroke("blue", "default"), "#228be6");
        assert_eq!(stylesheet.resolve_fill("blue", "default"), "#e7f5ff");
        assert_eq!(stylesheet.resolve_fill("red", "blueprint"), "transparent");
    }

    #[test]
    fn test_hex_passes_through() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve_stroke("#abc", "default"), "#abc");
        assert_eq!(stylesheet.resolve_fill("#112233", "warm"), "#112233");
        assert!(!is_hex_color("#12"));
        assert!(!is_hex_color("#zzzzzz"));
        assert!(!is_hex_color("blue"));
    }

    #[test]
    fn test_unknown_color_falls_back_to_blue() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve_stroke("chartreuse", "default"), "#228be6");
        assert_eq!(stylesheet.resolve_stroke("chartreuse", "blueprint"), "#a5d8ff");
    }

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve_stroke("red", "neon"), "#fa5252");
        assert_eq!(stylesheet.view_background("neon"), "#ffffff");
        assert_eq!(stylesheet.view_background("blueprint"), "#1e293b");
    }

    #[test]
    fn test_custom_theme_overrides_and_falls_back() {
        let toml_str = r##"
[metadata]
name = "Corporate"

[themes.corporate]
view_background = "#fafafa"

[themes.corporate.colors]
blue = { stroke = "#003366", fill = "#ddeeff" }
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.name, Some("Corporate".to_string()));
        assert_eq!(stylesheet.resolve_stroke("blue", "corporate"), "#003366");
        // Colors the custom theme does not define come from the default theme
        assert_eq!(stylesheet.resolve_stroke("green", "corporate"), "#40c057");
        assert_eq!(stylesheet.view_background("corporate"), "#fafafa");
        // Built-in themes remain available
        assert_eq!(stylesheet.resolve_fill("blue", "warm"), "#fff9db");
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        let result = Stylesheet::from_str(invalid);
        assert!(result.is_err());
    }
}
