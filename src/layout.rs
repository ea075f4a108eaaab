use crate::graph::Graph;
use crate::types::{LayoutParams, Point, OVERLAP_OFFSET};
use ahash::AHashSet as HashSet;

/// A layout is a pair of operations over `(Graph, LayoutParams)`.
///
/// `setup` performs first placement, `relayout` re-placement on resize; the
/// default `relayout` reuses `setup`. Both are one-shot: once begun they run
/// to completion, and callers never observe partial positions.
pub trait Layout {
    fn setup(&self, g: &mut Graph, params: &LayoutParams);

    fn relayout(&self, g: &mut Graph, params: &LayoutParams) {
        self.setup(g, params);
    }
}

#[inline]
pub(crate) fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

// Bounding box over positioned nodes only; None when nothing is placed yet
pub(crate) fn positioned_bbox(g: &Graph) -> Option<(Point, Point)> {
    let mut bounds: Option<(Point, Point)> = None;
    for node in g.nodes.values() {
        let Some(pos) = node.pos else { continue };
        bounds = Some(match bounds {
            None => (pos, pos),
            Some((min, max)) => (
                Point::new(min.x.min(pos.x), min.y.min(pos.y)),
                Point::new(max.x.max(pos.x), max.y.max(pos.y)),
            ),
        });
    }
    bounds
}

/// Recomputes every edge's endpoint coordinates from node positions.
///
/// Edges whose two nodes are also connected in the opposite direction are
/// flagged as overlapped and shifted perpendicular to the node-joining line
/// by a fixed radius, each edge of the pair deterministically taking one
/// side, so the pair renders as visibly parallel lines.
pub fn assign_edge_geometry(g: &mut Graph) {
    let mut pairs: HashSet<(std::sync::Arc<str>, std::sync::Arc<str>)> = HashSet::new();
    for edge in g.edges.values() {
        pairs.insert((edge.source.clone(), edge.target.clone()));
    }

    let mut assignments = Vec::with_capacity(g.edge_count());
    for edge in g.edges.values() {
        let (source, target) = g.endpoints(edge);
        let (Some(s), Some(t)) = (source.pos, target.pos) else {
            continue;
        };

        let reciprocal = edge.source != edge.target
            && pairs.contains(&(edge.target.clone(), edge.source.clone()));
        let (ox, oy) = if reciprocal {
            // Each edge offsets along its own +perpendicular; the reverse
            // edge's direction is rotated by pi, which lands it on the
            // mirrored side.
            let theta = (t.y - s.y).atan2(t.x - s.x);
            (-OVERLAP_OFFSET * theta.sin(), OVERLAP_OFFSET * theta.cos())
        } else {
            (0.0, 0.0)
        };

        assignments.push((
            edge.id.clone(),
            reciprocal,
            s.x + ox,
            s.y + oy,
            t.x + ox,
            t.y + oy,
        ));
    }

    for (id, overlapped, x1, y1, x2, y2) in assignments {
        let edge = g.edges.get_mut(&id).unwrap();
        edge.styles.overlapped = overlapped;
        edge.styles.x1 = Some(x1);
        edge.styles.y1 = Some(y1);
        edge.styles.x2 = Some(x2);
        edge.styles.y2 = Some(y2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphSnapshot;
    use pretty_assertions::assert_eq;

    fn positioned_pair() -> Graph {
        let snapshot: GraphSnapshot = serde_json::from_value(serde_json::json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [
                {"id": "ab", "source": "a", "target": "b"},
                {"id": "ba", "source": "b", "target": "a"}
            ]
        }))
        .unwrap();
        let mut g = Graph::from_snapshot(snapshot).unwrap();
        g.node_mut("a").unwrap().pos = Some(Point::new(0.0, 0.0));
        g.node_mut("b").unwrap().pos = Some(Point::new(100.0, 0.0));
        g
    }

    #[test]
    fn reciprocal_edges_get_mirrored_offsets() {
        let mut g = positioned_pair();
        assign_edge_geometry(&mut g);

        let ab = g.edge("ab").unwrap().styles.clone();
        let ba = g.edge("ba").unwrap().styles.clone();
        assert!(ab.overlapped);
        assert!(ba.overlapped);

        // Horizontal line: offsets are purely vertical, non-zero, mirrored
        let ab_dy = ab.y1.unwrap();
        let ba_dy = ba.y1.unwrap();
        assert!(ab_dy.abs() > 0.0);
        assert!((ab_dy + ba_dy).abs() < 1e-9);
        assert_eq!(ab.x1, Some(0.0));
        assert_eq!(ba.x1, Some(100.0));
    }

    #[test]
    fn lone_edge_keeps_plain_endpoints() {
        let snapshot: GraphSnapshot = serde_json::from_value(serde_json::json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [{"id": "ab", "source": "a", "target": "b"}]
        }))
        .unwrap();
        let mut g = Graph::from_snapshot(snapshot).unwrap();
        g.node_mut("a").unwrap().pos = Some(Point::new(10.0, 20.0));
        g.node_mut("b").unwrap().pos = Some(Point::new(30.0, 40.0));
        assign_edge_geometry(&mut g);

        let styles = &g.edge("ab").unwrap().styles;
        assert!(!styles.overlapped);
        assert_eq!(styles.x1, Some(10.0));
        assert_eq!(styles.y1, Some(20.0));
        assert_eq!(styles.x2, Some(30.0));
        assert_eq!(styles.y2, Some(40.0));
    }

    #[test]
    fn unpositioned_nodes_leave_edges_untouched() {
        let snapshot: GraphSnapshot = serde_json::from_value(serde_json::json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [{"id": "ab", "source": "a", "target": "b"}]
        }))
        .unwrap();
        let mut g = Graph::from_snapshot(snapshot).unwrap();
        assign_edge_geometry(&mut g);
        assert_eq!(g.edge("ab").unwrap().styles.x1, None);
    }
}
