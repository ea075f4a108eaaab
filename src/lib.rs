// Interactive node/edge visualization core for algorithm state
// (search graphs, constraint graphs, Bayesian networks) in notebooks.

#![deny(clippy::all)]

// Core modules
pub mod error;
pub mod graph;
pub mod protocol;
pub mod types;
pub mod view;

// Layout algorithms
pub mod force;
pub mod layout;
pub mod rescale;
pub mod tree;

// Host (notebook widget) boundary
#[cfg(feature = "wasm")]
pub mod wasm;

// ===== Essential Public API (for 99% of users) =====
/// A view instance: graph + dispatcher + layout, driven by the host
pub use view::{EdgeProps, NodeProps, RenderProps, View, ViewKind};

/// Message schemas and the per-view protocol state machine
pub use protocol::{Dispatcher, InboundEvent, OutboundEvent};

/// Snapshot and geometry types crossing the JSON boundary
pub use types::{GraphSnapshot, HighlightStyle, LayoutParams, NodeKind, Point};

pub use error::VizError;

// ===== Advanced Public API (for direct graph manipulation) =====
/// Graph data structure for advanced use cases
pub use graph::{Element, ElementKind, Graph, GraphEdge, GraphNode};

/// Layout contract and the concrete algorithms
pub use force::{ForceConfig, ForceLayout};
pub use layout::Layout;
pub use rescale::RescaleLayout;
pub use tree::{TreeDiagnostics, TreeLayout};
