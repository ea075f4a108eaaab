use crate::graph::Graph;
use crate::layout::{assign_edge_geometry, Layout};
use crate::types::LayoutParams;
use ahash::AHashMap as HashMap;
use indexmap::IndexMap;
use log::warn;
use std::sync::Arc;

// Largest node radius a level may use, and the horizontal gap reserved
// around each node
const MAX_LEVEL_RADIUS: f64 = 50.0;
const SIBLING_GAP: f64 = 15.0;

/// Hierarchical top-down placement for parent/child structures.
///
/// The hierarchy is derived by walking edges in insertion order and
/// attaching each edge's target under its source. Edges that would give a
/// node a second parent, close a cycle, or mirror an existing parent/child
/// pair are skipped; skips are surfaced through [`TreeDiagnostics`] since
/// they mean the structure is not actually a tree.
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    // Explicit root id; falls back to the first node when absent or unknown
    pub root: Option<String>,
}

impl TreeLayout {
    pub fn new() -> Self {
        TreeLayout::default()
    }

    pub fn with_root(root: impl Into<String>) -> Self {
        TreeLayout {
            root: Some(root.into()),
        }
    }
}

/// Everything the edge walk had to ignore to keep the structure a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeDiagnostics {
    // Edges whose target was already attached (second parent or cycle)
    pub skipped_extra_parent: Vec<Arc<str>>,
    // Edges mirroring an existing parent/child relationship
    pub skipped_reverse: Vec<Arc<str>>,
    // Nodes never reached from the root; they keep whatever position they had
    pub unattached: Vec<Arc<str>>,
}

impl TreeDiagnostics {
    pub fn is_tree(&self) -> bool {
        self.skipped_extra_parent.is_empty()
            && self.skipped_reverse.is_empty()
            && self.unattached.is_empty()
    }
}

struct Hierarchy {
    // Breadth-first levels, discovery order within each level
    levels: Vec<Vec<Arc<str>>>,
    diagnostics: TreeDiagnostics,
}

impl Layout for TreeLayout {
    fn setup(&self, g: &mut Graph, params: &LayoutParams) {
        if g.is_empty() {
            return;
        }

        let hierarchy = build_hierarchy(g, self.root.as_deref());
        if !hierarchy.diagnostics.is_tree() {
            warn!(
                "structure is not a tree: {} extra-parent edge(s), {} reverse edge(s), {} unattached node(s)",
                hierarchy.diagnostics.skipped_extra_parent.len(),
                hierarchy.diagnostics.skipped_reverse.len(),
                hierarchy.diagnostics.unattached.len(),
            );
        }

        place(g, params, &hierarchy.levels);
        assign_edge_geometry(g);
    }
}

impl TreeLayout {
    /// Runs only the hierarchy derivation, for callers that want the
    /// degraded-layout flags without placing anything.
    pub fn diagnose(&self, g: &Graph) -> TreeDiagnostics {
        if g.is_empty() {
            return TreeDiagnostics::default();
        }
        build_hierarchy(g, self.root.as_deref()).diagnostics
    }
}

fn build_hierarchy(g: &Graph, root: Option<&str>) -> Hierarchy {
    let root: Arc<str> = root
        .and_then(|id| g.node(id))
        .map(|n| n.id.clone())
        // Missing or invalid root: fall back to the first node
        .unwrap_or_else(|| g.nodes.keys().next().unwrap().clone());

    let mut parent: HashMap<Arc<str>, Arc<str>> = HashMap::new();
    let mut children: IndexMap<Arc<str>, Vec<Arc<str>>> = IndexMap::new();
    let mut diagnostics = TreeDiagnostics::default();

    for edge in g.edges.values() {
        let s = &edge.source;
        let t = &edge.target;
        let attached = *t == root || parent.contains_key(t);
        if attached || s == t {
            diagnostics.skipped_extra_parent.push(edge.id.clone());
            continue;
        }
        if parent.get(s) == Some(t) {
            diagnostics.skipped_reverse.push(edge.id.clone());
            continue;
        }
        parent.insert(t.clone(), s.clone());
        children.entry(s.clone()).or_default().push(t.clone());
    }

    // Breadth-first walk from the root; parented subtrees not hanging off
    // the root are left unplaced
    let mut levels: Vec<Vec<Arc<str>>> = vec![vec![root]];
    loop {
        let next: Vec<Arc<str>> = levels
            .last()
            .unwrap()
            .iter()
            .flat_map(|id| children.get(id).into_iter().flatten().cloned())
            .collect();
        if next.is_empty() {
            break;
        }
        levels.push(next);
    }

    let reached: ahash::AHashSet<&Arc<str>> = levels.iter().flatten().collect();
    diagnostics.unattached = g
        .nodes
        .keys()
        .filter(|id| !reached.contains(id))
        .cloned()
        .collect();

    Hierarchy {
        levels,
        diagnostics,
    }
}

fn place(g: &mut Graph, params: &LayoutParams, levels: &[Vec<Arc<str>>]) {
    let max_depth = levels.len() - 1;
    // Shallow trees keep a compact band height instead of stretching to
    // fill the canvas
    let band = params.height / (max_depth as f64 + 2.0);

    for (depth, level) in levels.iter().enumerate() {
        let count = level.len() as f64;
        let radius = (params.width / count / 2.0 - SIBLING_GAP)
            .min(MAX_LEVEL_RADIUS)
            .max(1.0);
        let y = band * (depth as f64 + 1.0);

        for (i, id) in level.iter().enumerate() {
            let node = g.nodes.get_mut(id).unwrap();
            let x = (i as f64 * 2.0 + 1.0) * (radius + SIBLING_GAP);
            node.pos = Some(crate::types::Point::new(x, y));
            node.styles.radius = radius;
        }
    }
}
