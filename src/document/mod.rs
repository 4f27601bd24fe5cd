//! Output document model
//!
//! A [`Document`] is what gets written to an `.excalidraw` file: a header,
//! the element list and an app-state block that places the initial viewport
//! over the content. [`PriorDocument`] is the subset read back in edit mode.

pub mod config;
pub mod element;
pub mod index;

pub use config::OutputConfig;
pub use element::{
    Binding, BoundElement, BoundKind, DocumentElement, ElementKind, FrameProps, LinearProps,
    OpaqueProps, Roundness, ShapeProps, TextProps,
};
pub use index::{assign_indices, decode_index, index_key};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layout::BoundingBox;

/// A complete diagram document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub version: u32,
    pub source: String,
    pub elements: Vec<DocumentElement>,
    pub app_state: AppState,
    pub files: Map<String, Value>,
}

impl Document {
    pub fn new(elements: Vec<DocumentElement>, app_state: AppState, config: &OutputConfig) -> Self {
        Self {
            doc_type: "excalidraw".to_string(),
            version: 2,
            source: config.source.clone(),
            elements,
            app_state,
            files: Map::new(),
        }
    }

    /// Number of elements that are not logically deleted
    pub fn element_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_deleted).count()
    }

    pub fn find(&self, id: &str) -> Option<&DocumentElement> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// The part of a previously generated document that edit mode needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriorDocument {
    #[serde(default)]
    pub elements: Vec<DocumentElement>,
}

impl PriorDocument {
    pub fn from_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zoom {
    pub value: f64,
}

/// Viewport and per-document defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub grid_size: u32,
    pub grid_step: u32,
    pub grid_mode_enabled: bool,
    pub view_background_color: String,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: Zoom,
    pub current_item_stroke_color: String,
    pub current_item_background_color: String,
    pub current_item_fill_style: String,
    pub current_item_stroke_width: f64,
    pub current_item_stroke_style: String,
    pub current_item_roughness: f64,
    pub current_item_opacity: f64,
    pub current_item_font_family: u32,
    pub current_item_font_size: f64,
    pub current_item_text_align: String,
    pub current_item_start_arrowhead: Option<String>,
    pub current_item_end_arrowhead: Option<String>,
    pub current_item_arrow_type: String,
}

impl AppState {
    /// Build the app state for `elements`, scrolled so the content's top-left
    /// corner sits `padding` units inside the viewport
    pub fn fit(elements: &[DocumentElement], view_background: &str, padding: f64) -> Self {
        let bounds = content_bounds(elements);
        Self {
            grid_size: 20,
            grid_step: 5,
            grid_mode_enabled: false,
            view_background_color: view_background.to_string(),
            scroll_x: -(bounds.x - padding),
            scroll_y: -(bounds.y - padding),
            zoom: Zoom { value: 1.0 },
            current_item_stroke_color: element::BLACK.to_string(),
            current_item_background_color: element::TRANSPARENT.to_string(),
            current_item_fill_style: "solid".to_string(),
            current_item_stroke_width: 2.0,
            current_item_stroke_style: "solid".to_string(),
            current_item_roughness: 1.0,
            current_item_opacity: 100.0,
            current_item_font_family: element::FONT_FAMILY_EXCALIFONT,
            current_item_font_size: 20.0,
            current_item_text_align: "left".to_string(),
            current_item_start_arrowhead: None,
            current_item_end_arrowhead: Some("arrow".to_string()),
            current_item_arrow_type: "round".to_string(),
        }
    }
}

/// Union of all non-deleted element boxes; the origin when there are none
pub fn content_bounds(elements: &[DocumentElement]) -> BoundingBox {
    elements
        .iter()
        .filter(|e| !e.is_deleted)
        .map(DocumentElement::bounds)
        .reduce(|acc, b| acc.union(&b))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_at(id: &str, x: f64, y: f64) -> DocumentElement {
        let mut el = DocumentElement::new(id, ElementKind::Rectangle(ShapeProps::default()), 1, 1, 0);
        el.x = x;
        el.y = y;
        el.width = 100.0;
        el.height = 50.0;
        el
    }

    #[test]
    fn test_app_state_scroll_from_bounds() {
        let elements = vec![rect_at("a", 50.0, 80.0), rect_at("b", 300.0, 10.0)];
        let state = AppState::fit(&elements, "#ffffff", 100.0);
        assert_eq!(state.scroll_x, 50.0);
        assert_eq!(state.scroll_y, 90.0);
        assert_eq!(state.zoom.value, 1.0);
    }

    #[test]
    fn test_deleted_elements_ignored_for_bounds() {
        let mut gone = rect_at("gone", -500.0, -500.0);
        gone.is_deleted = true;
        let elements = vec![rect_at("a", 0.0, 0.0), gone];
        assert_eq!(content_bounds(&elements), BoundingBox::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_empty_bounds_at_origin() {
        let state = AppState::fit(&[], "#ffffff", 100.0);
        assert_eq!(state.scroll_x, 100.0);
        assert_eq!(state.scroll_y, 100.0);
    }

    #[test]
    fn test_prior_document_tolerates_missing_elements() {
        let prior = PriorDocument::from_str(r#"{"type":"excalidraw","appState":{}}"#).unwrap();
        assert!(prior.elements.is_empty());
    }
}
