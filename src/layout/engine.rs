//! Layout computation engine
//!
//! Positions shapes when the author left coordinates out. Two families are
//! supported:
//!
//! - **Grid**: `ceil(sqrt(n))` columns in declaration order. Each column is as
//!   wide as its widest member and each row as tall as its tallest, so shapes
//!   of different sizes never overlap.
//! - **Leveled**: shapes are ranked by longest path through the connector
//!   graph (see [`super::graph`]) and stacked level by level along the primary
//!   axis, each level centered on the cross axis. The result is shifted so the
//!   top-left shape sits at the configured margin.
//!
//! Every function here is pure: it takes sizes and edges and returns
//! positions in node order. Applying them to elements is the caller's job.

use super::config::LayoutConfig;
use super::graph::LevelGraph;
use super::types::*;
use crate::skeleton::SkeletonDocument;

/// Layout family selected by the skeleton's `layout` name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutFamily {
    #[default]
    Grid,
    Leveled(Direction),
}

impl LayoutFamily {
    /// Map a layout name to a family; unknown or missing names mean grid
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("top-down" | "tree" | "flowchart") => LayoutFamily::Leveled(Direction::Vertical),
            Some("left-right" | "pipeline" | "flow") => {
                LayoutFamily::Leveled(Direction::Horizontal)
            }
            _ => LayoutFamily::Grid,
        }
    }
}

/// One shape taking part in a layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutNode<'a> {
    /// Author id, used to match connector endpoints
    pub key: Option<&'a str>,
    pub size: Size,
}

/// Whether any shape lacks an explicit position
///
/// When this is true every shape is laid out, including those the author did
/// place; partial coordinates are not mixed with computed ones.
pub fn needs_auto_layout(skeleton: &SkeletonDocument) -> bool {
    skeleton.shapes().any(|shape| !shape.geometry.has_position())
}

/// Compute the top-left corner of every node
pub fn compute(
    nodes: &[LayoutNode<'_>],
    edges: &[(&str, &str)],
    family: LayoutFamily,
    config: &LayoutConfig,
) -> Vec<Point> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let sizes: Vec<Size> = nodes.iter().map(|n| effective_size(n.size, config)).collect();

    match family {
        LayoutFamily::Grid => {
            tracing::debug!(shapes = nodes.len(), "grid layout");
            layout_grid(&sizes, config)
        }
        LayoutFamily::Leveled(direction) => {
            let levels = assign_levels(nodes, edges);
            tracing::debug!(shapes = nodes.len(), ?direction, ?levels, "leveled layout");
            layout_leveled(&sizes, &levels, direction, config)
        }
    }
}

/// Longest-path level of every node
pub fn assign_levels(nodes: &[LayoutNode<'_>], edges: &[(&str, &str)]) -> Vec<usize> {
    let mut graph = LevelGraph::new(nodes.iter().map(|n| n.key));
    for (from, to) in edges {
        graph.add_edge(from, to);
    }
    graph.levels()
}

/// Zero-sized shapes are laid out as if they had the default size
fn effective_size(size: Size, config: &LayoutConfig) -> Size {
    let (default_width, default_height) = config.default_shape_size;
    Size::new(
        if size.width > 0.0 { size.width } else { default_width },
        if size.height > 0.0 { size.height } else { default_height },
    )
}

fn layout_grid(sizes: &[Size], config: &LayoutConfig) -> Vec<Point> {
    let columns = (sizes.len() as f64).sqrt().ceil() as usize;
    let rows = sizes.len().div_ceil(columns);

    let mut column_widths = vec![0.0_f64; columns];
    let mut row_heights = vec![0.0_f64; rows];
    for (i, size) in sizes.iter().enumerate() {
        let (column, row) = (i % columns, i / columns);
        column_widths[column] = column_widths[column].max(size.width);
        row_heights[row] = row_heights[row].max(size.height);
    }

    // Offset of each column/row is the sum of everything before it plus gaps
    let column_offsets = cumulative(&column_widths, config.spacing_x);
    let row_offsets = cumulative(&row_heights, config.spacing_y);

    (0..sizes.len())
        .map(|i| Point::new(column_offsets[i % columns], row_offsets[i / columns]))
        .collect()
}

fn cumulative(extents: &[f64], gap: f64) -> Vec<f64> {
    let mut offset = 0.0;
    extents
        .iter()
        .map(|extent| {
            let start = offset;
            offset += extent + gap;
            start
        })
        .collect()
}

fn layout_leveled(
    sizes: &[Size],
    levels: &[usize],
    direction: Direction,
    config: &LayoutConfig,
) -> Vec<Point> {
    let (primary_gap, cross_gap) = match direction {
        Direction::Vertical => (config.spacing_y, config.spacing_x),
        Direction::Horizontal => (config.spacing_x, config.spacing_y),
    };
    let primary = |size: &Size| match direction {
        Direction::Vertical => size.height,
        Direction::Horizontal => size.width,
    };
    let cross = |size: &Size| match direction {
        Direction::Vertical => size.width,
        Direction::Horizontal => size.height,
    };

    // Members of each level, in declaration order
    let mut distinct: Vec<usize> = levels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    let groups: Vec<Vec<usize>> = distinct
        .iter()
        .map(|level| (0..sizes.len()).filter(|&i| levels[i] == *level).collect())
        .collect();

    let mut positions = vec![Point::new(0.0, 0.0); sizes.len()];
    let mut primary_offset = 0.0;
    for group in &groups {
        let total_cross: f64 = group.iter().map(|&i| cross(&sizes[i])).sum::<f64>()
            + cross_gap * group.len().saturating_sub(1) as f64;

        let mut cross_offset = -total_cross / 2.0;
        for &i in group {
            positions[i] = match direction {
                Direction::Vertical => Point::new(cross_offset, primary_offset),
                Direction::Horizontal => Point::new(primary_offset, cross_offset),
            };
            cross_offset += cross(&sizes[i]) + cross_gap;
        }

        let deepest = group.iter().map(|&i| primary(&sizes[i])).fold(0.0, f64::max);
        primary_offset += deepest + primary_gap;
    }

    shift_to_margin(&mut positions, config.margin);
    positions
}

/// Translate so the smallest x and y both equal `margin`
fn shift_to_margin(positions: &mut [Point], margin: f64) {
    let min_x = positions.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }
    for p in positions.iter_mut() {
        p.x += margin - min_x;
        p.y += margin - min_y;
    }
}
