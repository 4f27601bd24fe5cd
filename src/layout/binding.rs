//! Connector binding
//!
//! A bound connector runs from the center of one shape to the center of
//! another. Each end records which side of its shape it attaches to, as a
//! unit-square anchor (`[0, 0.5]` is the middle of the left edge). Both shapes
//! get a back-reference to the connector.

use std::collections::HashMap;

use super::types::*;
use crate::document::{Binding, BoundElement, DocumentElement};
use crate::skeleton::Geometry;

/// Length of a connector or polyline segment with no width given
pub const DEFAULT_SEGMENT_LENGTH: f64 = 200.0;

/// Side of a bounding box a connector attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Middle of this edge in unit-square coordinates
    pub fn fixed_point(self) -> [f64; 2] {
        match self {
            Edge::Top => [0.5, 0.0],
            Edge::Bottom => [0.5, 1.0],
            Edge::Left => [0.0, 0.5],
            Edge::Right => [1.0, 0.5],
        }
    }
}

/// Edges of `from` and `to` that face each other
///
/// The dominant axis between the two centers decides: left/right when the
/// horizontal distance is strictly larger, top/bottom otherwise. Each end
/// picks the side pointing toward the other shape; with no offset at all on
/// the chosen axis both ends attach to the top.
pub fn facing_edges(from: &BoundingBox, to: &BoundingBox) -> (Edge, Edge) {
    let dx = to.center().x - from.center().x;
    let dy = to.center().y - from.center().y;

    if dx.abs() > dy.abs() {
        let start = if dx > 0.0 { Edge::Right } else { Edge::Left };
        let end = if dx < 0.0 { Edge::Right } else { Edge::Left };
        (start, end)
    } else {
        let start = if dy > 0.0 { Edge::Bottom } else { Edge::Top };
        let end = if dy < 0.0 { Edge::Bottom } else { Edge::Top };
        (start, end)
    }
}

/// Geometry of a connector bound between two boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub start: Point,
    pub end: Point,
    pub start_anchor: [f64; 2],
    pub end_anchor: [f64; 2],
}

pub fn attach(from: &BoundingBox, to: &BoundingBox) -> Attachment {
    let (start_edge, end_edge) = facing_edges(from, to);
    Attachment {
        start: from.center(),
        end: to.center(),
        start_anchor: start_edge.fixed_point(),
        end_anchor: end_edge.fixed_point(),
    }
}

/// Endpoints of an unbound connector: `(x, y)` to `(x + width, y + height)`
pub fn fallback_segment(geometry: &Geometry) -> (Point, Point) {
    let x = geometry.x.unwrap_or(0.0);
    let y = geometry.y.unwrap_or(0.0);
    let width = geometry.width.unwrap_or(DEFAULT_SEGMENT_LENGTH);
    let height = geometry.height.unwrap_or(0.0);
    (Point::new(x, y), Point::new(x + width, y + height))
}

/// Store a straight segment as a two-point polyline local to `start`
pub fn set_segment(element: &mut DocumentElement, start: Point, end: Point) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    element.x = start.x;
    element.y = start.y;
    element.width = dx.abs();
    element.height = dy.abs();
    if let Some(linear) = element.linear_mut() {
        linear.points = vec![[0.0, 0.0], [dx, dy]];
    }
}

/// An element a connector endpoint resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A shape synthesized in this run
    Synthesized(usize),
    /// A surviving element of the document being edited
    Prior(usize),
}

/// Elements connectors may attach to
///
/// Holds the shapes of this run and, in edit mode, the surviving elements of
/// the prior document. Back-references are written straight into them.
#[derive(Debug)]
pub struct BindingTargets<'a> {
    shapes: &'a mut [DocumentElement],
    shape_index: HashMap<String, usize>,
    prior: &'a mut [DocumentElement],
    prior_index: HashMap<String, usize>,
}

impl<'a> BindingTargets<'a> {
    pub fn new(shapes: &'a mut [DocumentElement], prior: &'a mut [DocumentElement]) -> Self {
        let shape_index = shapes
            .iter()
            .enumerate()
            .map(|(i, el)| (el.id.clone(), i))
            .collect();
        let prior_index = prior
            .iter()
            .enumerate()
            .filter(|(_, el)| !el.is_deleted)
            .map(|(i, el)| (el.id.clone(), i))
            .collect();
        Self {
            shapes,
            shape_index,
            prior,
            prior_index,
        }
    }

    /// Find the element an endpoint names
    ///
    /// `resolved` is the document id the author id maps to in this run, if
    /// any. Only shapes of this run qualify; failing that, the author id is
    /// looked up literally among the prior document's elements.
    pub fn locate(&self, author: &str, resolved: Option<&str>) -> Option<Target> {
        resolved
            .and_then(|id| self.shape_index.get(id))
            .map(|&i| Target::Synthesized(i))
            .or_else(|| self.prior_index.get(author).map(|&i| Target::Prior(i)))
    }

    fn element(&self, target: Target) -> &DocumentElement {
        match target {
            Target::Synthesized(i) => &self.shapes[i],
            Target::Prior(i) => &self.prior[i],
        }
    }

    fn element_mut(&mut self, target: Target) -> &mut DocumentElement {
        match target {
            Target::Synthesized(i) => &mut self.shapes[i],
            Target::Prior(i) => &mut self.prior[i],
        }
    }

    /// Bind `connector` between two endpoints
    ///
    /// When either end is missing the connector keeps the author's geometry
    /// (see [`fallback_segment`]) and no binding. Returns whether it was bound.
    pub fn bind(
        &mut self,
        connector: &mut DocumentElement,
        from: Option<Target>,
        to: Option<Target>,
        fallback: &Geometry,
    ) -> bool {
        let (Some(from), Some(to)) = (from, to) else {
            let (start, end) = fallback_segment(fallback);
            set_segment(connector, start, end);
            return false;
        };

        let from_el = self.element(from);
        let to_el = self.element(to);
        let attachment = attach(&from_el.bounds(), &to_el.bounds());
        let from_id = from_el.id.clone();
        let to_id = to_el.id.clone();

        set_segment(connector, attachment.start, attachment.end);
        if let Some(linear) = connector.linear_mut() {
            linear.start_binding = Some(Binding::orbit(from_id, attachment.start_anchor));
            linear.end_binding = Some(Binding::orbit(to_id, attachment.end_anchor));
        }

        let back_reference = BoundElement::arrow(connector.id.clone());
        self.element_mut(from).add_bound_element(back_reference.clone());
        self.element_mut(to).add_bound_element(back_reference);
        true
    }
}
