//! Document elements as persisted in an `.excalidraw` file
//!
//! Every element shares a common header (geometry, style, identity and
//! mutation metadata). Kind-specific fields live in [`ElementKind`], which is
//! tagged by the element's `type`. Fields this crate does not model are kept
//! in each kind's `extra` map so elements read from an existing file are
//! written back untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::layout::BoundingBox;

/// Default stroke color for every element
pub const BLACK: &str = "#1e1e1e";
/// Transparent background
pub const TRANSPARENT: &str = "transparent";
/// Excalifont
pub const FONT_FAMILY_EXCALIFONT: u32 = 5;
/// Binding mode written for connectors attached by the binding engine
pub const BINDING_MODE_ORBIT: &str = "orbit";

/// Corner rounding of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roundness {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Roundness {
    pub const PROPORTIONAL_RADIUS: u8 = 2;
    pub const ADAPTIVE_RADIUS: u8 = 3;

    pub fn proportional() -> Self {
        Self {
            kind: Self::PROPORTIONAL_RADIUS,
            value: None,
        }
    }

    pub fn adaptive() -> Self {
        Self {
            kind: Self::ADAPTIVE_RADIUS,
            value: None,
        }
    }
}

/// Kind of a back-reference stored in `boundElements`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Arrow,
    Text,
}

/// Back-reference from an element to a dependent element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BoundKind,
}

impl BoundElement {
    pub fn arrow(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: BoundKind::Arrow,
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: BoundKind::Text,
        }
    }
}

/// Attachment of a connector endpoint to another element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: String,
    /// Anchor on the target's bounding box, in unit-square coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_point: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Binding {
    pub fn orbit(element_id: impl Into<String>, fixed_point: [f64; 2]) -> Self {
        Self {
            element_id: element_id.into(),
            fixed_point: Some(fixed_point),
            mode: Some(BINDING_MODE_ORBIT.to_string()),
            extra: Map::new(),
        }
    }
}

/// Fields of rectangles, diamonds and ellipses beyond the common header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeProps {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields of text elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    pub text: String,
    pub original_text: String,
    pub auto_resize: bool,
    pub font_size: f64,
    pub font_family: u32,
    pub text_align: String,
    pub vertical_align: String,
    pub line_height: f64,
    pub container_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields of arrows and lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinearProps {
    /// Polyline relative to the element's `(x, y)`
    pub points: Vec<[f64; 2]>,
    pub start_binding: Option<Binding>,
    pub end_binding: Option<Binding>,
    pub start_arrowhead: Option<String>,
    pub end_arrowhead: Option<String>,
    pub last_committed_point: Option<[f64; 2]>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields of frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameProps {
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields of element kinds that are only ever carried forward
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpaqueProps {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kind-specific part of an element, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle(ShapeProps),
    Diamond(ShapeProps),
    Ellipse(ShapeProps),
    Text(TextProps),
    Arrow(LinearProps),
    Line(LinearProps),
    Frame(FrameProps),
    Image(OpaqueProps),
    Freedraw(OpaqueProps),
    Embeddable(OpaqueProps),
    Iframe(OpaqueProps),
    Magicframe(OpaqueProps),
}

impl ElementKind {
    /// The `type` string written to the file
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Rectangle(_) => "rectangle",
            ElementKind::Diamond(_) => "diamond",
            ElementKind::Ellipse(_) => "ellipse",
            ElementKind::Text(_) => "text",
            ElementKind::Arrow(_) => "arrow",
            ElementKind::Line(_) => "line",
            ElementKind::Frame(_) => "frame",
            ElementKind::Image(_) => "image",
            ElementKind::Freedraw(_) => "freedraw",
            ElementKind::Embeddable(_) => "embeddable",
            ElementKind::Iframe(_) => "iframe",
            ElementKind::Magicframe(_) => "magicframe",
        }
    }
}

fn default_stroke_color() -> String {
    BLACK.to_string()
}

fn default_background_color() -> String {
    TRANSPARENT.to_string()
}

fn default_solid() -> String {
    "solid".to_string()
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_roughness() -> f64 {
    1.0
}

fn default_opacity() -> f64 {
    100.0
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn default_version() -> i64 {
    1
}

/// A fully specified element of the output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentElement {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_solid")]
    pub fill_style: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_solid")]
    pub stroke_style: String,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub group_ids: Vec<String>,
    #[serde(default)]
    pub frame_id: Option<String>,
    /// Ordering key, see [`crate::document::index`]
    ///
    /// Existing documents may carry `null` here; every key is reassigned on
    /// output anyway.
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: String,
    #[serde(default)]
    pub roundness: Option<Roundness>,
    #[serde(default)]
    pub seed: i64,
    #[serde(default = "default_version")]
    pub version: i64,
    #[serde(default)]
    pub version_nonce: i64,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub bound_elements: Option<Vec<BoundElement>>,
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl DocumentElement {
    /// Create an element with the default header and zero geometry
    pub fn new(id: impl Into<String>, kind: ElementKind, seed: i64, nonce: i64, updated: i64) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            stroke_color: default_stroke_color(),
            background_color: default_background_color(),
            fill_style: default_solid(),
            stroke_width: default_stroke_width(),
            stroke_style: default_solid(),
            roughness: default_roughness(),
            opacity: default_opacity(),
            group_ids: Vec::new(),
            frame_id: None,
            index: String::new(),
            roundness: None,
            seed,
            version: 1,
            version_nonce: nonce,
            is_deleted: false,
            bound_elements: None,
            updated,
            link: None,
            locked: false,
            kind,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn text(&self) -> Option<&TextProps> {
        match &self.kind {
            ElementKind::Text(props) => Some(props),
            _ => None,
        }
    }

    pub fn linear(&self) -> Option<&LinearProps> {
        match &self.kind {
            ElementKind::Arrow(props) | ElementKind::Line(props) => Some(props),
            _ => None,
        }
    }

    pub fn linear_mut(&mut self) -> Option<&mut LinearProps> {
        match &mut self.kind {
            ElementKind::Arrow(props) | ElementKind::Line(props) => Some(props),
            _ => None,
        }
    }

    /// Record a dependent element, ignoring duplicates by id
    pub fn add_bound_element(&mut self, entry: BoundElement) {
        let bound = self.bound_elements.get_or_insert_with(Vec::new);
        if !bound.iter().any(|be| be.id == entry.id) {
            bound.push(entry);
        }
    }

    /// Ids of text elements bound to this element
    pub fn bound_text_ids(&self) -> impl Iterator<Item = &str> {
        self.bound_elements
            .iter()
            .flatten()
            .filter(|be| be.kind == BoundKind::Text)
            .map(|be| be.id.as_str())
    }
}
