//! Folding a conversion run into an existing document
//!
//! Edits are limited to appending new elements and removing prior ones by
//! id. Removing an element also removes the text bound to it, and every
//! reference to a removed id is cleared from the elements that stay.

use std::collections::HashSet;

use crate::document::{assign_indices, Binding, DocumentElement};

/// Drop logically deleted elements
pub fn surviving(prior: Vec<DocumentElement>) -> Vec<DocumentElement> {
    prior.into_iter().filter(|el| !el.is_deleted).collect()
}

/// Ids to drop: each requested id found in `prior`, plus its bound text
///
/// Requested ids that are not in `prior` are ignored.
pub fn removal_set(prior: &[DocumentElement], remove: &[String]) -> HashSet<String> {
    let mut removed = HashSet::new();
    for id in remove {
        if let Some(el) = prior.iter().find(|el| el.id == *id) {
            removed.insert(el.id.clone());
            removed.extend(el.bound_text_ids().map(str::to_string));
        }
    }
    removed
}

/// Clear bindings and back-references that point at removed ids
pub fn repair_references(el: &mut DocumentElement, removed: &HashSet<String>) {
    if let Some(linear) = el.linear_mut() {
        let dangling = |binding: &Option<Binding>| {
            binding
                .as_ref()
                .is_some_and(|b| removed.contains(&b.element_id))
        };
        if dangling(&linear.start_binding) {
            linear.start_binding = None;
        }
        if dangling(&linear.end_binding) {
            linear.end_binding = None;
        }
    }
    if let Some(bound) = el.bound_elements.as_mut() {
        bound.retain(|be| !removed.contains(&be.id));
    }
}

/// Surviving prior elements followed by `synthesized`, with fresh ordering keys
pub fn merge(
    prior: Vec<DocumentElement>,
    synthesized: Vec<DocumentElement>,
    remove: &[String],
) -> Vec<DocumentElement> {
    let kept = surviving(prior);
    let removed = removal_set(&kept, remove);

    let mut elements: Vec<DocumentElement> = kept
        .into_iter()
        .filter(|el| !removed.contains(&el.id))
        .chain(synthesized)
        .collect();
    for el in elements.iter_mut() {
        repair_references(el, &removed);
    }
    tracing::debug!(removed = removed.len(), total = elements.len(), "merged into existing document");

    assign_indices(&mut elements);
    elements
}
