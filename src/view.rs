use crate::error::VizError;
use crate::force::ForceLayout;
use crate::graph::{Element, Graph};
use crate::layout::Layout;
use crate::protocol::{Dispatcher, OutboundEvent};
use crate::rescale::RescaleLayout;
use crate::tree::TreeLayout;
use crate::types::{GraphSnapshot, LayoutParams, NodeKind};
use serde::{Deserialize, Serialize};

// Which visualization flavor a view renders; picks the default layout and
// the per-node sub-label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "csp")]
    Csp,
    #[serde(rename = "bayes")]
    Bayes,
}

impl ViewKind {
    pub fn parse(s: &str) -> Option<ViewKind> {
        match s {
            "search" => Some(ViewKind::Search),
            "csp" => Some(ViewKind::Csp),
            "bayes" => Some(ViewKind::Bayes),
            _ => None,
        }
    }

    // Search state spaces are parent/child structures; constraint and
    // factor graphs are general node-link graphs
    fn default_layout(&self) -> Box<dyn Layout> {
        match self {
            ViewKind::Search => Box::new(TreeLayout::new()),
            ViewKind::Csp | ViewKind::Bayes => Box::new(ForceLayout::new()),
        }
    }
}

// ===== Renderable props =====
// Plain geometry + style attributes; the host's drawing layer consumes
// these without touching the model.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeProps {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub stroke: String,
    pub stroke_width: f64,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeProps {
    pub id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderProps {
    pub nodes: Vec<NodeProps>,
    pub edges: Vec<EdgeProps>,
    pub status: String,
}

/// One visualization instance: a Graph, its dispatcher state, and the
/// chosen layout.
///
/// The host calls [`View::render`] once its drawing container exists (it
/// defers that by a tick after construction); the first call lays the graph
/// out and runs the one-time bootstrap, later calls only rescale on resize.
pub struct View {
    pub kind: ViewKind,
    graph: Graph,
    dispatcher: Dispatcher,
    layout: Box<dyn Layout>,
    params: Option<LayoutParams>,
}

impl View {
    pub fn new(kind: ViewKind, snapshot: GraphSnapshot) -> Result<Self, VizError> {
        let layout = kind.default_layout();
        Self::with_layout(kind, snapshot, layout)
    }

    pub fn with_layout(
        kind: ViewKind,
        snapshot: GraphSnapshot,
        layout: Box<dyn Layout>,
    ) -> Result<Self, VizError> {
        Ok(View {
            kind,
            graph: Graph::from_snapshot(snapshot)?,
            dispatcher: Dispatcher::new(),
            layout,
            params: None,
        })
    }

    /// First call: full layout plus the one-time bootstrap. Re-render at
    /// the same size: nothing to do. Resize: proportional rescale, no
    /// layout recomputation.
    pub fn render(&mut self, params: LayoutParams) {
        match self.params {
            None => {
                self.layout.setup(&mut self.graph, &params);
                self.dispatcher.bootstrap(&mut self.graph);
            }
            Some(previous) if previous != params => {
                RescaleLayout::new().relayout(&mut self.graph, &params);
            }
            Some(_) => {}
        }
        self.params = Some(params);
    }

    pub fn process_message(&mut self, json: &str) -> Result<(), VizError> {
        self.dispatcher.dispatch_json(&mut self.graph, json)
    }

    pub fn resolve_split(&mut self, choice: Option<Vec<String>>) -> Result<(), VizError> {
        self.dispatcher.resolve_split(&mut self.graph, choice)
    }

    pub fn pending_split(&self) -> Option<&[String]> {
        self.dispatcher.pending_split()
    }

    pub fn take_outbound(&mut self) -> Vec<OutboundEvent> {
        self.dispatcher.take_outbound()
    }

    pub fn status(&self) -> &str {
        self.dispatcher.status()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Discards the graph (and any positions it held) for a fresh snapshot.
    /// This is the one wholesale replacement in a view's life, and the only
    /// thing that re-arms the bootstrap.
    pub fn reset(&mut self, snapshot: GraphSnapshot) -> Result<(), VizError> {
        self.graph = Graph::from_snapshot(snapshot)?;
        self.dispatcher.reset();
        self.params = None;
        Ok(())
    }

    // ===== Gestures =====

    /// Click on a graph element: nodes report the variable name, arcs the
    /// constraint/variable pair.
    pub fn click(&mut self, id: &str) -> Result<(), VizError> {
        let event = match self.graph.lookup(id)? {
            Element::Node(node) => OutboundEvent::VarClick {
                var_name: node.name.clone(),
            },
            Element::Edge(edge) => {
                let (source, target) = self.graph.endpoints(edge);
                // The constraint end identifies the arc; the other end
                // names the variable
                let (constraint, variable) = if source.kind == NodeKind::Constraint {
                    (source, target)
                } else {
                    (target, source)
                };
                OutboundEvent::ArcClick {
                    constraint_id: constraint.id.as_ref().to_string(),
                    var_name: variable.name.clone(),
                }
            }
        };
        self.dispatcher.emit(event);
        Ok(())
    }

    pub fn fine_step(&mut self) {
        self.dispatcher.emit(OutboundEvent::FineStepClick);
    }

    pub fn step(&mut self) {
        self.dispatcher.emit(OutboundEvent::StepClick);
    }

    pub fn auto_step(&mut self) {
        self.dispatcher.emit(OutboundEvent::AutoStepClick);
    }

    // ===== Props =====

    /// Flattens the model into renderable props. Unpositioned elements are
    /// omitted; they have nothing to draw yet.
    pub fn render_props(&self) -> RenderProps {
        let nodes = self
            .graph
            .nodes
            .values()
            .filter_map(|node| {
                let pos = node.pos?;
                Some(NodeProps {
                    id: node.id.as_ref().to_string(),
                    label: node.name.clone(),
                    sub_label: self.sub_label(node),
                    x: pos.x,
                    y: pos.y,
                    radius: node.styles.radius,
                    stroke: node.styles.stroke.clone(),
                    stroke_width: node.styles.stroke_width,
                    kind: node.kind,
                })
            })
            .collect();

        let edges = self
            .graph
            .edges
            .values()
            .filter_map(|edge| {
                Some(EdgeProps {
                    id: edge.id.as_ref().to_string(),
                    x1: edge.styles.x1?,
                    y1: edge.styles.y1?,
                    x2: edge.styles.x2?,
                    y2: edge.styles.y2?,
                    stroke: edge.styles.stroke.clone(),
                    stroke_width: edge.styles.stroke_width,
                    label: edge.cost.map(format_number),
                })
            })
            .collect();

        RenderProps {
            nodes,
            edges,
            status: self.dispatcher.status().to_string(),
        }
    }

    fn sub_label(&self, node: &crate::graph::GraphNode) -> Option<String> {
        match self.kind {
            ViewKind::Search => node.heuristic.map(|h| format!("h={}", format_number(h))),
            ViewKind::Csp => node
                .domain
                .as_ref()
                .filter(|_| node.kind == NodeKind::Variable)
                .map(|d| format!("{{{}}}", d.join(","))),
            ViewKind::Bayes => node.observation.as_ref().map(|o| format!("={o}")),
        }
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
