//! Frame membership and bounds
//!
//! Frames are completed after everything else is placed: each child (and the
//! text bound to it) is tagged with the frame's id, and any geometry the
//! author left out is taken from the union of the children, padded.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, WarningCategory};
use crate::document::DocumentElement;
use crate::layout::{BoundingBox, LayoutConfig};
use crate::skeleton::Geometry;

use super::ids::IdResolver;

/// A synthesized frame waiting for its children to be placed
#[derive(Debug, Clone)]
pub struct PendingFrame {
    pub element: DocumentElement,
    pub author_id: Option<String>,
    /// Geometry the author gave explicitly; never overridden
    pub explicit: Geometry,
    /// Author ids of the members
    pub children: Vec<String>,
}

/// Padded union of `children`, or `None` without children
///
/// The top and bottom get extra room for the frame's name label.
pub fn frame_bounds(children: &[BoundingBox], config: &LayoutConfig) -> Option<BoundingBox> {
    let union = children.iter().copied().reduce(|acc, b| acc.union(&b))?;
    let padding = config.frame_padding;
    let allowance = config.frame_label_allowance;
    Some(BoundingBox::new(
        union.x - padding,
        union.y - padding - allowance,
        union.width + 2.0 * padding,
        union.height + 2.0 * padding + allowance,
    ))
}

/// Tag children and size every pending frame
///
/// Child ids that resolve to nothing, or to something that is not among
/// `elements` (another frame, say), are reported and skipped. Returns the
/// finished frames in declaration order.
pub fn complete_frames(
    pending: Vec<PendingFrame>,
    elements: &mut [DocumentElement],
    ids: &IdResolver,
    config: &LayoutConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<DocumentElement> {
    let positions: HashMap<String, usize> = elements
        .iter()
        .enumerate()
        .map(|(i, el)| (el.id.clone(), i))
        .collect();

    pending
        .into_iter()
        .map(|frame| {
            let PendingFrame {
                element: mut frame_el,
                author_id,
                explicit,
                children,
            } = frame;

            let mut child_bounds = Vec::new();
            for child in &children {
                let Some(child_id) = ids.resolve(child) else {
                    diagnostics.warn(
                        WarningCategory::UnknownFrameChild,
                        format!(
                            "Frame \"{}\" references unknown child \"{child}\"",
                            author_id.as_deref().unwrap_or_default()
                        ),
                    );
                    continue;
                };
                let Some(&position) = positions.get(child_id) else {
                    diagnostics.warn(
                        WarningCategory::UnknownFrameChild,
                        format!(
                            "Frame \"{}\" child \"{child}\" is not a placeable element",
                            author_id.as_deref().unwrap_or_default()
                        ),
                    );
                    continue;
                };

                let member = &mut elements[position];
                member.frame_id = Some(frame_el.id.clone());
                child_bounds.push(member.bounds());

                let labels: Vec<String> = member.bound_text_ids().map(str::to_string).collect();
                for label in labels {
                    if let Some(&i) = positions.get(&label) {
                        elements[i].frame_id = Some(frame_el.id.clone());
                    }
                }
            }

            if let Some(bounds) = frame_bounds(&child_bounds, config) {
                if explicit.x.is_none() {
                    frame_el.x = bounds.x;
                }
                if explicit.y.is_none() {
                    frame_el.y = bounds.y;
                }
                if explicit.width.is_none() {
                    frame_el.width = bounds.width;
                }
                if explicit.height.is_none() {
                    frame_el.height = bounds.height;
                }
            }
            frame_el
        })
        .collect()
}
