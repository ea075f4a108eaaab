use crate::graph::Graph;
use crate::layout::{assign_edge_geometry, positioned_bbox, Layout};
use crate::types::LayoutParams;

/// Proportional rescale used on resize instead of recomputing a layout.
///
/// Remaps every positioned node from the bounding box of the current
/// placement into the new padded canvas range, preserving the relative
/// arrangement. Nodes without a position are skipped, never treated as
/// sitting at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct RescaleLayout;

impl RescaleLayout {
    pub fn new() -> Self {
        RescaleLayout
    }
}

impl Layout for RescaleLayout {
    fn setup(&self, g: &mut Graph, params: &LayoutParams) {
        let Some((min, max)) = positioned_bbox(g) else {
            return;
        };

        let x_axis = Axis::new(min.x, max.x, params.padding, params.width - params.padding);
        let y_axis = Axis::new(min.y, max.y, params.padding, params.height - params.padding);

        for node in g.nodes.values_mut() {
            if let Some(pos) = node.pos.as_mut() {
                pos.x = x_axis.remap(pos.x);
                pos.y = y_axis.remap(pos.y);
            }
        }
        assign_edge_geometry(g);
    }
}

// Linear remap of one axis; degenerate or already-fitting spans collapse to
// the identity so repeated rescales at the same size move nothing
#[derive(Debug, Clone, Copy)]
enum Axis {
    Identity,
    Remap { old_min: f64, new_min: f64, scale: f64 },
}

impl Axis {
    fn new(old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> Self {
        let span = old_max - old_min;
        if span == 0.0 || (old_min == new_min && old_max == new_max) {
            return Axis::Identity;
        }
        Axis::Remap {
            old_min,
            new_min,
            scale: (new_max - new_min) / span,
        }
    }

    #[inline]
    fn remap(&self, v: f64) -> f64 {
        match *self {
            Axis::Identity => v,
            Axis::Remap {
                old_min,
                new_min,
                scale,
            } => new_min + (v - old_min) * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GraphSnapshot, Point};
    use pretty_assertions::assert_eq;

    fn graph_with_positions(positions: &[(&str, Option<(f64, f64)>)]) -> Graph {
        let nodes: Vec<serde_json::Value> = positions
            .iter()
            .map(|(id, _)| serde_json::json!({"id": id}))
            .collect();
        let snapshot: GraphSnapshot =
            serde_json::from_value(serde_json::json!({"nodes": nodes, "edges": []})).unwrap();
        let mut g = Graph::from_snapshot(snapshot).unwrap();
        for (id, pos) in positions {
            if let Some((x, y)) = pos {
                g.node_mut(id).unwrap().pos = Some(Point::new(*x, *y));
            }
        }
        g
    }

    #[test]
    fn remaps_into_padded_range_preserving_arrangement() {
        let mut g = graph_with_positions(&[
            ("a", Some((0.0, 0.0))),
            ("b", Some((50.0, 100.0))),
            ("c", Some((100.0, 200.0))),
        ]);
        // Scales of exactly 2x on both axes keep the expectations exact
        let params = LayoutParams::new(260.0, 460.0);
        RescaleLayout::new().setup(&mut g, &params);

        assert_eq!(g.node("a").unwrap().pos, Some(Point::new(30.0, 30.0)));
        assert_eq!(g.node("b").unwrap().pos, Some(Point::new(130.0, 230.0)));
        assert_eq!(g.node("c").unwrap().pos, Some(Point::new(230.0, 430.0)));
    }

    #[test]
    fn same_dimensions_twice_is_identity() {
        let mut g = graph_with_positions(&[
            ("a", Some((0.0, 0.0))),
            ("b", Some((42.5, 63.75))),
            ("c", Some((85.0, 85.0))),
        ]);
        let params = LayoutParams::new(400.0, 400.0);
        let layout = RescaleLayout::new();
        layout.setup(&mut g, &params);
        let first: Vec<Option<Point>> = g.nodes.values().map(|n| n.pos).collect();

        layout.setup(&mut g, &params);
        let second: Vec<Option<Point>> = g.nodes.values().map(|n| n.pos).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unpositioned_nodes_are_skipped_not_origin() {
        let mut g = graph_with_positions(&[
            ("a", Some((100.0, 100.0))),
            ("b", Some((200.0, 200.0))),
            ("c", None),
        ]);
        RescaleLayout::new().setup(&mut g, &LayoutParams::new(260.0, 260.0));

        // c stays unplaced, and the box was computed from a and b only
        assert_eq!(g.node("c").unwrap().pos, None);
        assert_eq!(g.node("a").unwrap().pos, Some(Point::new(30.0, 30.0)));
        assert_eq!(g.node("b").unwrap().pos, Some(Point::new(230.0, 230.0)));
    }

    #[test]
    fn zero_extent_axis_is_a_no_op_on_that_axis() {
        let mut g = graph_with_positions(&[
            ("a", Some((150.0, 10.0))),
            ("b", Some((150.0, 90.0))),
        ]);
        RescaleLayout::new().setup(&mut g, &LayoutParams::new(400.0, 400.0));

        // All nodes share x = 150: no division by zero, x untouched
        assert_eq!(g.node("a").unwrap().pos, Some(Point::new(150.0, 30.0)));
        assert_eq!(g.node("b").unwrap().pos, Some(Point::new(150.0, 370.0)));
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let mut g = graph_with_positions(&[]);
        RescaleLayout::new().setup(&mut g, &LayoutParams::default());
        assert!(g.is_empty());
    }
}
