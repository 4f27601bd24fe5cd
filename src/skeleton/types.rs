//! Skeleton data model
//!
//! The JSON form is deliberately loose: every element is a flat object with a
//! `type` discriminant and optional fields. [`RawSkeleton`] mirrors that form;
//! [`SkeletonDocument`] is the typed model the converter works on, with one
//! [`SkeletonKind`] case per element kind.

use serde::{Deserialize, Deserializer};

use crate::diagnostics::{Diagnostics, WarningCategory};

/// Skeleton as it appears in JSON
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkeleton {
    #[serde(default)]
    pub elements: Vec<RawElement>,
    pub theme: Option<String>,
    pub layout: Option<String>,
    pub remove: Option<Vec<String>>,
}

/// Distinguishes a missing field from an explicit `null`
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// One skeleton element as it appears in JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill_style: Option<String>,
    pub stroke_style: Option<String>,
    /// Line style of connectors and polylines: `dashed` or `dotted`
    pub style: Option<String>,
    pub roughness: Option<f64>,
    pub opacity: Option<f64>,
    pub group_ids: Option<Vec<String>>,
    pub frame_id: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<u32>,
    pub text_align: Option<String>,
    pub vertical_align: Option<String>,
    pub line_height: Option<f64>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub start_arrowhead: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub end_arrowhead: Option<Option<String>>,
    pub points: Option<Vec<[f64; 2]>>,
    pub children: Option<Vec<String>>,
}

/// Closed shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Diamond,
    Ellipse,
}

/// Connector endpoints and arrowheads
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorSpec {
    pub from: Option<String>,
    pub to: Option<String>,
    pub start_arrowhead: Option<String>,
    pub end_arrowhead: Option<String>,
}

/// Free-standing text
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub text: String,
    pub font_family: Option<u32>,
    pub text_align: Option<String>,
    pub vertical_align: Option<String>,
    pub line_height: Option<f64>,
}

/// Frame name and member ids
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    pub name: Option<String>,
    pub children: Vec<String>,
}

/// Kind-specific part of a skeleton element
#[derive(Debug, Clone, PartialEq)]
pub enum SkeletonKind {
    Shape(ShapeKind),
    Connector(ConnectorSpec),
    Polyline { points: Option<Vec<[f64; 2]>> },
    Text(TextSpec),
    Frame(FrameSpec),
}

/// Author-supplied position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Geometry {
    pub fn has_position(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

/// Author-supplied style flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleFlags {
    pub fill_style: Option<String>,
    pub stroke_style: Option<String>,
    pub roughness: Option<f64>,
    pub opacity: Option<f64>,
}

/// One typed skeleton element
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonElement {
    pub id: Option<String>,
    pub label: Option<String>,
    pub color: Option<String>,
    pub geometry: Geometry,
    pub style: StyleFlags,
    pub font_size: Option<f64>,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub kind: SkeletonKind,
}

/// A typed skeleton document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonDocument {
    pub elements: Vec<SkeletonElement>,
    pub theme: Option<String>,
    pub layout: Option<String>,
    /// Prior-document element ids to drop (edit mode)
    pub remove: Vec<String>,
}

/// `dashed` and `dotted` pass through; anything else is solid
fn line_style(style: Option<&str>) -> String {
    match style {
        Some("dashed") => "dashed".to_string(),
        Some("dotted") => "dotted".to_string(),
        _ => "solid".to_string(),
    }
}

impl SkeletonElement {
    /// Convert a raw element, coercing unknown kinds to rectangles
    pub fn from_raw(raw: RawElement, position: usize, diagnostics: &mut Diagnostics) -> Self {
        let mut style = StyleFlags {
            fill_style: raw.fill_style,
            stroke_style: raw.stroke_style,
            roughness: raw.roughness,
            opacity: raw.opacity,
        };

        let kind = match raw.kind.as_str() {
            "rectangle" => SkeletonKind::Shape(ShapeKind::Rectangle),
            "diamond" => SkeletonKind::Shape(ShapeKind::Diamond),
            "ellipse" => SkeletonKind::Shape(ShapeKind::Ellipse),
            "arrow" => {
                style.stroke_style = Some(line_style(raw.style.as_deref()));
                SkeletonKind::Connector(ConnectorSpec {
                    from: raw.from,
                    to: raw.to,
                    start_arrowhead: raw.start_arrowhead.flatten(),
                    end_arrowhead: raw
                        .end_arrowhead
                        .unwrap_or_else(|| Some("arrow".to_string())),
                })
            }
            "line" => {
                style.stroke_style = Some(line_style(raw.style.as_deref()));
                SkeletonKind::Polyline {
                    points: raw.points,
                }
            }
            "text" => SkeletonKind::Text(TextSpec {
                text: raw.text.or_else(|| raw.label.clone()).unwrap_or_default(),
                font_family: raw.font_family,
                text_align: raw.text_align,
                vertical_align: raw.vertical_align,
                line_height: raw.line_height,
            }),
            "frame" => SkeletonKind::Frame(FrameSpec {
                name: raw.label.clone().or(raw.name),
                children: raw.children.unwrap_or_default(),
            }),
            other => {
                diagnostics.warn(
                    WarningCategory::UnknownKind,
                    format!(
                        "Element at index {position} has unknown type \"{other}\"; treating it as a rectangle"
                    ),
                );
                SkeletonKind::Shape(ShapeKind::Rectangle)
            }
        };

        // Free text carries its content in `kind`; labels belong to everything else
        let label = match kind {
            SkeletonKind::Text(_) | SkeletonKind::Frame(_) => None,
            _ => raw.label,
        };

        Self {
            id: raw.id,
            label,
            color: raw.color,
            geometry: Geometry {
                x: raw.x,
                y: raw.y,
                width: raw.width,
                height: raw.height,
            },
            style,
            font_size: raw.font_size,
            group_ids: raw.group_ids.unwrap_or_default(),
            frame_id: raw.frame_id,
            kind,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.kind, SkeletonKind::Shape(_))
    }
}

impl SkeletonDocument {
    pub fn from_raw(raw: RawSkeleton, diagnostics: &mut Diagnostics) -> Self {
        let elements = raw
            .elements
            .into_iter()
            .enumerate()
            .map(|(i, el)| SkeletonElement::from_raw(el, i, diagnostics))
            .collect();
        Self {
            elements,
            theme: raw.theme,
            layout: raw.layout,
            remove: raw.remove.unwrap_or_default(),
        }
    }

    /// Shape elements in declaration order
    pub fn shapes(&self) -> impl Iterator<Item = &SkeletonElement> {
        self.elements.iter().filter(|e| e.is_shape())
    }
}
