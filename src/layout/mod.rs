//! Layout engine for computing shape positions and connector bindings
//!
//! [`engine`] places shapes that the author left unpositioned, using the
//! connector graph ([`graph`]) for leveled layouts. [`binding`] attaches
//! connectors to the placed shapes.

pub mod binding;
pub mod config;
pub mod engine;
pub mod graph;
pub mod types;

pub use binding::{attach, facing_edges, Attachment, BindingTargets, Edge, Target};
pub use config::LayoutConfig;
pub use engine::{assign_levels, compute, needs_auto_layout, LayoutFamily, LayoutNode};
pub use graph::LevelGraph;
pub use types::*;
