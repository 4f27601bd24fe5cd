//! Author id to document id mapping

use std::collections::HashMap;

use crate::skeleton::{SkeletonDocument, SkeletonElement};
use crate::tokens::TokenSource;

/// Maps every author-chosen id to a fresh opaque document id
///
/// The map is filled before anything is synthesized, so connectors and frames
/// can refer to elements declared after them.
#[derive(Debug, Clone, Default)]
pub struct IdResolver {
    ids: HashMap<String, String>,
}

impl IdResolver {
    pub fn assign(skeleton: &SkeletonDocument, tokens: &mut dyn TokenSource) -> Self {
        let mut ids = HashMap::new();
        for id in skeleton.elements.iter().filter_map(|el| el.id.as_ref()) {
            ids.entry(id.clone()).or_insert_with(|| tokens.id());
        }
        Self { ids }
    }

    /// Document id for an author id, if one was assigned
    pub fn resolve(&self, author: &str) -> Option<&str> {
        self.ids.get(author).map(String::as_str)
    }

    /// Document id of `element`; elements without an author id get a fresh one
    pub fn id_for(&self, element: &SkeletonElement, tokens: &mut dyn TokenSource) -> String {
        element
            .id
            .as_deref()
            .and_then(|id| self.resolve(id))
            .map(str::to_string)
            .unwrap_or_else(|| tokens.id())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
