//! Skeleton to document conversion
//!
//! The pipeline runs in dependency order:
//!
//! 1. Assign document ids to every author id ([`ids`])
//! 2. Synthesize shapes and, if any lacks a position, lay them all out
//! 3. Label shapes, then bind connectors to the placed shapes
//! 4. Synthesize polylines and free text
//! 5. Tag frame children and size frames ([`frame`])
//! 6. In edit mode, fold everything into the prior document ([`merge`])
//!
//! Output order is shapes (each followed by its label), connectors (each
//! followed by its label), polylines, free text, frames.

pub mod frame;
pub mod ids;
pub mod merge;
pub mod synth;
pub mod text;

pub use frame::{complete_frames, frame_bounds, PendingFrame};
pub use ids::IdResolver;
pub use merge::merge;
pub use synth::Synthesizer;
pub use text::measure_text;

use crate::diagnostics::{Diagnostics, Warning};
use crate::document::{assign_indices, AppState, BoundElement, Document, DocumentElement, PriorDocument};
use crate::layout::{self, BindingTargets, LayoutFamily, LayoutNode, Size};
use crate::skeleton::{SkeletonDocument, SkeletonElement, SkeletonKind};
use crate::stylesheet::DEFAULT_THEME;
use crate::tokens::TokenSource;
use crate::ConvertConfig;

use synth::{linear_midpoint, CONNECTOR_LABEL_FONT_SIZE, SHAPE_LABEL_FONT_SIZE};

/// A converted document and the warnings raised while building it
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    pub document: Document,
    pub warnings: Vec<Warning>,
}

/// Convert a validated skeleton, optionally merging into a prior document
pub fn convert_document(
    skeleton: &SkeletonDocument,
    prior: Option<PriorDocument>,
    config: &ConvertConfig,
    tokens: &mut dyn TokenSource,
    diagnostics: &mut Diagnostics,
) -> Document {
    let theme = skeleton.theme.as_deref().unwrap_or(DEFAULT_THEME);
    let ids = IdResolver::assign(skeleton, tokens);
    let mut synth = Synthesizer::new(&config.stylesheet, theme, &config.layout, &ids, tokens);

    // Shapes, then layout
    let shape_skels: Vec<&SkeletonElement> = skeleton.shapes().collect();
    let mut shapes: Vec<DocumentElement> = shape_skels
        .iter()
        .filter_map(|skel| match &skel.kind {
            SkeletonKind::Shape(kind) => Some(synth.shape(skel, *kind)),
            _ => None,
        })
        .collect();

    if layout::needs_auto_layout(skeleton) {
        let family = LayoutFamily::from_name(skeleton.layout.as_deref());
        place_shapes(&mut shapes, &shape_skels, skeleton, family, config);
    }

    // Shape labels
    let shape_labels: Vec<Option<DocumentElement>> = shapes
        .iter_mut()
        .zip(&shape_skels)
        .map(|(shape, skel)| {
            let text = skel.label.as_deref()?;
            let font_size = skel.font_size.unwrap_or(SHAPE_LABEL_FONT_SIZE);
            let label = synth.bound_text(text, shape, font_size, shape.bounds().center());
            shape.add_bound_element(BoundElement::text(label.id.clone()));
            Some(label)
        })
        .collect();

    // Connectors, bound to this run's shapes or the prior document's elements
    let is_edit = prior.is_some();
    let mut prior_elements = prior
        .map(|p| merge::surviving(p.elements))
        .unwrap_or_default();
    let mut connectors = Vec::new();
    {
        let mut targets = BindingTargets::new(&mut shapes, &mut prior_elements);
        for skel in &skeleton.elements {
            let SkeletonKind::Connector(spec) = &skel.kind else {
                continue;
            };
            let mut connector = synth.connector(skel, spec);
            let from = spec.from.as_deref().and_then(|a| targets.locate(a, ids.resolve(a)));
            let to = spec.to.as_deref().and_then(|a| targets.locate(a, ids.resolve(a)));
            let bound = targets.bind(&mut connector, from, to, &skel.geometry);
            if !bound {
                tracing::debug!(connector = ?skel.id, "connector left unbound");
            }

            let label = skel.label.as_deref().map(|text| {
                let font_size = skel.font_size.unwrap_or(CONNECTOR_LABEL_FONT_SIZE);
                synth.bound_text(text, &connector, font_size, linear_midpoint(&connector))
            });
            if let Some(label) = &label {
                connector.add_bound_element(BoundElement::text(label.id.clone()));
            }
            connectors.push((connector, label));
        }
    }

    let mut elements: Vec<DocumentElement> = Vec::new();
    for (shape, label) in shapes.into_iter().zip(shape_labels) {
        elements.push(shape);
        elements.extend(label);
    }
    for (connector, label) in connectors {
        elements.push(connector);
        elements.extend(label);
    }

    // Polylines, then free text
    let mut pending_frames = Vec::new();
    for skel in &skeleton.elements {
        if let SkeletonKind::Polyline { points } = &skel.kind {
            elements.push(synth.polyline(skel, points.as_deref()));
        }
    }
    for skel in &skeleton.elements {
        if let SkeletonKind::Text(spec) = &skel.kind {
            elements.push(synth.free_text(skel, spec));
        }
    }
    for skel in &skeleton.elements {
        if let SkeletonKind::Frame(spec) = &skel.kind {
            pending_frames.push(PendingFrame {
                element: synth.frame(skel, spec),
                author_id: skel.id.clone(),
                explicit: skel.geometry,
                children: spec.children.clone(),
            });
        }
    }

    let frames = complete_frames(pending_frames, &mut elements, &ids, &config.layout, diagnostics);
    elements.extend(frames);

    let elements = if is_edit {
        merge(prior_elements, elements, &skeleton.remove)
    } else {
        assign_indices(&mut elements);
        elements
    };

    let background = config.stylesheet.view_background(theme);
    let app_state = AppState::fit(&elements, &background, config.output.viewport_padding);
    Document::new(elements, app_state, &config.output)
}

/// Lay out every shape and move it to its computed position
fn place_shapes(
    shapes: &mut [DocumentElement],
    shape_skels: &[&SkeletonElement],
    skeleton: &SkeletonDocument,
    family: LayoutFamily,
    config: &ConvertConfig,
) {
    let nodes: Vec<LayoutNode> = shapes
        .iter()
        .zip(shape_skels)
        .map(|(shape, skel)| LayoutNode {
            key: skel.id.as_deref(),
            size: Size::new(shape.width, shape.height),
        })
        .collect();
    let edges: Vec<(&str, &str)> = skeleton
        .elements
        .iter()
        .filter_map(|el| match &el.kind {
            SkeletonKind::Connector(spec) => Some((spec.from.as_deref()?, spec.to.as_deref()?)),
            _ => None,
        })
        .collect();

    let positions = layout::compute(&nodes, &edges, family, &config.layout);
    for (shape, position) in shapes.iter_mut().zip(positions) {
        shape.x = position.x;
        shape.y = position.y;
    }
    tracing::debug!(?family, shapes = shapes.len(), "auto-layout applied");
}
