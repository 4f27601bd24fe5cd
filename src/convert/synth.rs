//! Element synthesizers
//!
//! One method per skeleton kind, each turning a skeleton element into a fully
//! populated [`DocumentElement`]. Geometry that depends on other elements
//! (connector endpoints, frame bounds) is filled in by later passes.

use crate::document::element::{FONT_FAMILY_EXCALIFONT, TRANSPARENT};
use crate::document::{
    DocumentElement, ElementKind, FrameProps, LinearProps, Roundness, ShapeProps, TextProps,
};
use crate::layout::binding::DEFAULT_SEGMENT_LENGTH;
use crate::layout::{LayoutConfig, Point};
use crate::skeleton::{ConnectorSpec, FrameSpec, ShapeKind, SkeletonElement, TextSpec};
use crate::stylesheet::{Stylesheet, DEFAULT_COLOR};
use crate::tokens::TokenSource;

use super::ids::IdResolver;
use super::text::{measure_text, DEFAULT_LINE_HEIGHT};

/// Font size of shape labels
pub const SHAPE_LABEL_FONT_SIZE: f64 = 16.0;
/// Font size of connector labels
pub const CONNECTOR_LABEL_FONT_SIZE: f64 = 14.0;
/// Font size of free-standing text
pub const FREE_TEXT_FONT_SIZE: f64 = 20.0;

/// Semantic color of connectors, polylines and free text
const INK_COLOR: &str = "black";
const FRAME_STROKE: &str = "#bbb";

/// Builds document elements for one conversion run
pub struct Synthesizer<'a> {
    stylesheet: &'a Stylesheet,
    theme: &'a str,
    layout: &'a LayoutConfig,
    ids: &'a IdResolver,
    tokens: &'a mut dyn TokenSource,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        stylesheet: &'a Stylesheet,
        theme: &'a str,
        layout: &'a LayoutConfig,
        ids: &'a IdResolver,
        tokens: &'a mut dyn TokenSource,
    ) -> Self {
        Self {
            stylesheet,
            theme,
            layout,
            ids,
            tokens,
        }
    }

    /// A blank element with fresh seed, nonce and timestamp
    fn element(&mut self, id: String, kind: ElementKind) -> DocumentElement {
        let seed = self.tokens.seed();
        let nonce = self.tokens.seed();
        let updated = self.tokens.timestamp();
        DocumentElement::new(id, kind, seed, nonce, updated)
    }

    /// A blank element for `skel`, carrying its grouping and style flags
    fn element_for(&mut self, skel: &SkeletonElement, kind: ElementKind) -> DocumentElement {
        let id = self.ids.id_for(skel, &mut *self.tokens);
        let mut el = self.element(id, kind);

        el.group_ids = skel.group_ids.clone();
        // Frames are usually named by author id; unknown names pass through
        el.frame_id = skel.frame_id.as_deref().map(|frame| {
            self.ids.resolve(frame).unwrap_or(frame).to_string()
        });

        if let Some(fill_style) = &skel.style.fill_style {
            el.fill_style = fill_style.clone();
        }
        if let Some(stroke_style) = &skel.style.stroke_style {
            el.stroke_style = stroke_style.clone();
        }
        if let Some(roughness) = skel.style.roughness {
            el.roughness = roughness;
        }
        if let Some(opacity) = skel.style.opacity {
            el.opacity = opacity;
        }
        el
    }

    pub fn shape(&mut self, skel: &SkeletonElement, shape: ShapeKind) -> DocumentElement {
        let props = ShapeProps::default();
        let (kind, roundness) = match shape {
            ShapeKind::Rectangle => (ElementKind::Rectangle(props), Some(Roundness::adaptive())),
            ShapeKind::Diamond => (ElementKind::Diamond(props), Some(Roundness::proportional())),
            ShapeKind::Ellipse => (ElementKind::Ellipse(props), None),
        };
        let mut el = self.element_for(skel, kind);

        let color = skel.color.as_deref().unwrap_or(DEFAULT_COLOR);
        el.stroke_color = self.stylesheet.resolve_stroke(color, self.theme);
        el.background_color = self.stylesheet.resolve_fill(color, self.theme);
        el.roundness = roundness;

        let (default_width, default_height) = self.layout.default_shape_size;
        el.x = skel.geometry.x.unwrap_or(0.0);
        el.y = skel.geometry.y.unwrap_or(0.0);
        el.width = skel.geometry.width.unwrap_or(default_width);
        el.height = skel.geometry.height.unwrap_or(default_height);
        el
    }

    /// Text bound to `container`, centered on `center`
    ///
    /// The caller records the label in the container's `boundElements`.
    pub fn bound_text(
        &mut self,
        text: &str,
        container: &DocumentElement,
        font_size: f64,
        center: Point,
    ) -> DocumentElement {
        let id = self.tokens.id();
        let size = measure_text(text, font_size, DEFAULT_LINE_HEIGHT);
        let mut el = self.element(
            id,
            ElementKind::Text(TextProps {
                text: text.to_string(),
                original_text: text.to_string(),
                auto_resize: true,
                font_size,
                font_family: FONT_FAMILY_EXCALIFONT,
                text_align: "center".to_string(),
                vertical_align: "middle".to_string(),
                line_height: DEFAULT_LINE_HEIGHT,
                container_id: Some(container.id.clone()),
                ..TextProps::default()
            }),
        );
        el.stroke_color = container.stroke_color.clone();
        el.background_color = TRANSPARENT.to_string();
        el.width = size.width;
        el.height = size.height;
        el.x = center.x - size.width / 2.0;
        el.y = center.y - size.height / 2.0;
        el
    }

    pub fn free_text(&mut self, skel: &SkeletonElement, spec: &TextSpec) -> DocumentElement {
        let font_size = skel.font_size.unwrap_or(FREE_TEXT_FONT_SIZE);
        let line_height = spec.line_height.unwrap_or(DEFAULT_LINE_HEIGHT);
        let mut el = self.element_for(
            skel,
            ElementKind::Text(TextProps {
                text: spec.text.clone(),
                original_text: spec.text.clone(),
                auto_resize: true,
                font_size,
                font_family: spec.font_family.unwrap_or(FONT_FAMILY_EXCALIFONT),
                text_align: spec.text_align.clone().unwrap_or_else(|| "left".to_string()),
                vertical_align: spec
                    .vertical_align
                    .clone()
                    .unwrap_or_else(|| "top".to_string()),
                line_height,
                container_id: None,
                ..TextProps::default()
            }),
        );

        let color = skel.color.as_deref().unwrap_or(INK_COLOR);
        el.stroke_color = self.stylesheet.resolve_stroke(color, self.theme);

        let size = measure_text(&spec.text, font_size, line_height);
        el.x = skel.geometry.x.unwrap_or(0.0);
        el.y = skel.geometry.y.unwrap_or(0.0);
        el.width = size.width;
        el.height = size.height;
        el
    }

    /// Connector with style and arrowheads; endpoints are set by binding
    pub fn connector(&mut self, skel: &SkeletonElement, spec: &ConnectorSpec) -> DocumentElement {
        let mut el = self.element_for(
            skel,
            ElementKind::Arrow(LinearProps {
                start_arrowhead: spec.start_arrowhead.clone(),
                end_arrowhead: spec.end_arrowhead.clone(),
                ..LinearProps::default()
            }),
        );
        let color = skel.color.as_deref().unwrap_or(INK_COLOR);
        el.stroke_color = self.stylesheet.resolve_stroke(color, self.theme);
        el.background_color = TRANSPARENT.to_string();
        el.roundness = Some(Roundness::proportional());
        el
    }

    /// Open polyline
    ///
    /// With two or more points the line starts at the explicit `(x, y)` if
    /// given, else at the first point, and the points are stored relative to
    /// that origin. Otherwise a straight segment is drawn from `(x, y)`.
    pub fn polyline(&mut self, skel: &SkeletonElement, points: Option<&[[f64; 2]]>) -> DocumentElement {
        let geometry = skel.geometry;
        let (origin, local) = match points {
            Some(points) if points.len() >= 2 => {
                let origin = Point::new(
                    geometry.x.unwrap_or(points[0][0]),
                    geometry.y.unwrap_or(points[0][1]),
                );
                let local = points
                    .iter()
                    .map(|[x, y]| [x - origin.x, y - origin.y])
                    .collect();
                (origin, local)
            }
            _ => {
                let origin = Point::new(geometry.x.unwrap_or(0.0), geometry.y.unwrap_or(0.0));
                let end = [
                    geometry.width.unwrap_or(DEFAULT_SEGMENT_LENGTH),
                    geometry.height.unwrap_or(0.0),
                ];
                (origin, vec![[0.0, 0.0], end])
            }
        };

        let (min_x, max_x) = extent(local.iter().map(|p| p[0]));
        let (min_y, max_y) = extent(local.iter().map(|p| p[1]));

        let mut el = self.element_for(
            skel,
            ElementKind::Line(LinearProps {
                points: local,
                ..LinearProps::default()
            }),
        );
        let color = skel.color.as_deref().unwrap_or(INK_COLOR);
        el.stroke_color = self.stylesheet.resolve_stroke(color, self.theme);
        el.background_color = TRANSPARENT.to_string();
        el.roundness = Some(Roundness::proportional());
        el.x = origin.x;
        el.y = origin.y;
        el.width = max_x - min_x;
        el.height = max_y - min_y;
        el
    }

    /// Frame with only its explicit geometry; the rest comes from its children
    pub fn frame(&mut self, skel: &SkeletonElement, spec: &FrameSpec) -> DocumentElement {
        let mut el = self.element_for(
            skel,
            ElementKind::Frame(FrameProps {
                name: spec.name.clone(),
                ..FrameProps::default()
            }),
        );
        el.stroke_color = FRAME_STROKE.to_string();
        el.background_color = TRANSPARENT.to_string();
        el.roughness = 0.0;
        el.roundness = None;
        el.x = skel.geometry.x.unwrap_or(0.0);
        el.y = skel.geometry.y.unwrap_or(0.0);
        el.width = skel.geometry.width.unwrap_or(0.0);
        el.height = skel.geometry.height.unwrap_or(0.0);
        el
    }
}

/// Midpoint of a linear element's first-to-last segment
pub fn linear_midpoint(el: &DocumentElement) -> Point {
    let [dx, dy] = el
        .linear()
        .and_then(|linear| linear.points.last().copied())
        .unwrap_or([el.width, el.height]);
    Point::new(el.x + dx / 2.0, el.y + dy / 2.0)
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}
