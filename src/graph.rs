use crate::error::VizError;
use crate::types::{
    EdgeStylePatch, EdgeStyles, GraphSnapshot, NodeKind, NodeStylePatch, NodeStyles, Point,
};
use ahash::AHashMap as HashMap;
use indexmap::IndexMap;
use std::sync::Arc;

// Helper function to convert &str to Arc<str>
#[inline]
pub fn arc_str(s: &str) -> Arc<str> {
    Arc::from(s)
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: Arc<str>,
    pub name: String,
    pub kind: NodeKind,
    // None until a layout assigns a position
    pub pos: Option<Point>,
    // Admissible values, variable-typed nodes only
    pub domain: Option<Vec<String>>,
    // Algorithm-specific fields owned by the visualization
    pub heuristic: Option<f64>,
    pub observation: Option<String>,
    pub styles: NodeStyles,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: Arc<str>,
    pub source: Arc<str>,
    pub target: Arc<str>,
    pub cost: Option<f64>,
    pub styles: EdgeStyles,
}

// What an id in the index resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Edge,
}

// Reference to either element class, for O(1) event dispatch
#[derive(Debug)]
pub enum Element<'a> {
    Node(&'a GraphNode),
    Edge(&'a GraphEdge),
}

/// Id-indexed node/edge store shared by all visualizations.
///
/// Nodes and edges live in insertion order; `id_index` is kept exactly equal
/// to the union of node ids and edge ids for the life of the graph. Elements
/// are never removed after construction, only their attributes mutate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: IndexMap<Arc<str>, GraphNode>,
    pub edges: IndexMap<Arc<str>, GraphEdge>,
    id_index: HashMap<Arc<str>, ElementKind>,
}

impl Graph {
    /// Builds a graph from an initial snapshot. Positions start absent;
    /// duplicate ids and dangling edge endpoints are construction failures.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, VizError> {
        let mut graph = Graph::default();

        for n in snapshot.nodes {
            let id = arc_str(&n.id);
            if graph.id_index.contains_key(&id) {
                return Err(VizError::DuplicateId(n.id));
            }
            graph.id_index.insert(id.clone(), ElementKind::Node);
            graph.nodes.insert(
                id.clone(),
                GraphNode {
                    id,
                    name: n.name.unwrap_or(n.id),
                    kind: n.kind,
                    pos: None,
                    domain: n.domain,
                    heuristic: n.h,
                    observation: n.observation,
                    styles: NodeStyles::default(),
                },
            );
        }

        for e in snapshot.edges {
            let id = arc_str(&e.id);
            if graph.id_index.contains_key(&id) {
                return Err(VizError::DuplicateId(e.id));
            }
            let source = arc_str(&e.source);
            let target = arc_str(&e.target);
            for endpoint in [&source, &target] {
                if !matches!(graph.id_index.get(endpoint), Some(ElementKind::Node)) {
                    return Err(VizError::DanglingEdge {
                        edge: e.id,
                        endpoint: endpoint.as_ref().to_string(),
                    });
                }
            }
            graph.id_index.insert(id.clone(), ElementKind::Edge);
            graph.edges.insert(
                id.clone(),
                GraphEdge {
                    id,
                    source,
                    target,
                    cost: e.cost,
                    styles: EdgeStyles::default(),
                },
            );
        }

        Ok(graph)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut GraphEdge> {
        self.edges.get_mut(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<ElementKind> {
        self.id_index.get(id).copied()
    }

    /// O(1) id resolution against the live element.
    pub fn lookup(&self, id: &str) -> Result<Element<'_>, VizError> {
        match self.id_index.get(id) {
            Some(ElementKind::Node) => Ok(Element::Node(&self.nodes[id])),
            Some(ElementKind::Edge) => Ok(Element::Edge(&self.edges[id])),
            None => Err(VizError::UnknownId(id.to_string())),
        }
    }

    /// Replaces a node's domain wholesale. Domains are absolute, never
    /// incremental, so replaying the same write is idempotent.
    pub fn set_domain(&mut self, node_id: &str, values: Vec<String>) -> Result<(), VizError> {
        match self.nodes.get_mut(node_id) {
            Some(node) => {
                node.domain = Some(values);
                Ok(())
            }
            None => Err(VizError::UnknownId(node_id.to_string())),
        }
    }

    /// Field-wise style merge on a node; unset patch fields stay untouched.
    pub fn set_node_style(&mut self, id: &str, patch: &NodeStylePatch) -> Result<(), VizError> {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.styles.apply(patch);
                Ok(())
            }
            None => Err(VizError::UnknownId(id.to_string())),
        }
    }

    /// Field-wise style merge on an edge.
    pub fn set_edge_style(&mut self, id: &str, patch: &EdgeStylePatch) -> Result<(), VizError> {
        match self.edges.get_mut(id) {
            Some(edge) => {
                edge.styles.apply(patch);
                Ok(())
            }
            None => Err(VizError::UnknownId(id.to_string())),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Both endpoints of an edge, resolved. Referential integrity makes the
    // lookups infallible for edges held by this graph.
    pub fn endpoints(&self, edge: &GraphEdge) -> (&GraphNode, &GraphNode) {
        (&self.nodes[&edge.source], &self.nodes[&edge.target])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GraphSnapshot, SnapshotEdge, SnapshotNode};
    use pretty_assertions::assert_eq;

    fn snapshot_node(id: &str) -> SnapshotNode {
        SnapshotNode {
            id: id.to_string(),
            name: None,
            kind: NodeKind::Plain,
            domain: None,
            h: None,
            observation: None,
        }
    }

    fn snapshot_edge(id: &str, source: &str, target: &str) -> SnapshotEdge {
        SnapshotEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            cost: None,
        }
    }

    fn two_node_snapshot() -> GraphSnapshot {
        GraphSnapshot {
            nodes: vec![snapshot_node("a"), snapshot_node("b")],
            edges: vec![snapshot_edge("e1", "a", "b")],
        }
    }

    #[test]
    fn id_index_is_union_of_node_and_edge_ids() {
        let g = Graph::from_snapshot(two_node_snapshot()).unwrap();

        assert_eq!(g.id_index.len(), g.node_count() + g.edge_count());
        for id in g.nodes.keys() {
            assert_eq!(g.kind_of(id), Some(ElementKind::Node));
        }
        for (id, edge) in &g.edges {
            assert_eq!(g.kind_of(id), Some(ElementKind::Edge));
            // Declared endpoints resolve to live nodes
            let (s, t) = g.endpoints(edge);
            assert_eq!(s.id, edge.source);
            assert_eq!(t.id, edge.target);
        }
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let snapshot = GraphSnapshot {
            nodes: vec![snapshot_node("a"), snapshot_node("a")],
            edges: vec![],
        };
        assert_eq!(
            Graph::from_snapshot(snapshot),
            Err(VizError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn edge_id_colliding_with_node_id_is_rejected() {
        let snapshot = GraphSnapshot {
            nodes: vec![snapshot_node("a"), snapshot_node("b")],
            edges: vec![snapshot_edge("a", "a", "b")],
        };
        assert_eq!(
            Graph::from_snapshot(snapshot),
            Err(VizError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let snapshot = GraphSnapshot {
            nodes: vec![snapshot_node("a")],
            edges: vec![snapshot_edge("e1", "a", "missing")],
        };
        assert_eq!(
            Graph::from_snapshot(snapshot),
            Err(VizError::DanglingEdge {
                edge: "e1".to_string(),
                endpoint: "missing".to_string(),
            })
        );
    }

    #[test]
    fn lookup_discriminates_nodes_and_edges() {
        let g = Graph::from_snapshot(two_node_snapshot()).unwrap();
        assert!(matches!(g.lookup("a"), Ok(Element::Node(_))));
        assert!(matches!(g.lookup("e1"), Ok(Element::Edge(_))));
        assert_eq!(
            g.lookup("nope").unwrap_err(),
            VizError::UnknownId("nope".to_string())
        );
    }

    #[test]
    fn set_domain_replaces_and_rejects_unknown() {
        let mut g = Graph::from_snapshot(two_node_snapshot()).unwrap();
        g.set_domain("a", vec!["1".to_string(), "2".to_string()])
            .unwrap();
        assert_eq!(
            g.node("a").unwrap().domain,
            Some(vec!["1".to_string(), "2".to_string()])
        );
        assert_eq!(
            g.set_domain("zzz", vec![]),
            Err(VizError::UnknownId("zzz".to_string()))
        );
        // An edge id is not a valid domain target
        assert_eq!(
            g.set_domain("e1", vec![]),
            Err(VizError::UnknownId("e1".to_string()))
        );
    }

    #[test]
    fn independent_style_writers_do_not_clobber() {
        let mut g = Graph::from_snapshot(two_node_snapshot()).unwrap();
        g.set_edge_style(
            "e1",
            &EdgeStylePatch {
                stroke: Some("red".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        g.set_edge_style(
            "e1",
            &EdgeStylePatch {
                stroke_width: Some(7.0),
                ..Default::default()
            },
        )
        .unwrap();

        let styles = &g.edge("e1").unwrap().styles;
        assert_eq!(styles.stroke, "red");
        assert_eq!(styles.stroke_width, 7.0);
    }
}
