use serde::{Deserialize, Serialize};

// ===== Style constants =====

// Stroke widths applied by arc highlighting
pub const ARC_STROKE_BOLD: f64 = 7.0;
pub const ARC_STROKE_NORMAL: f64 = 4.0;

// Stroke width applied by node highlighting
pub const NODE_HIGHLIGHT_STROKE_WIDTH: f64 = 2.0;

// Colour of the one-time "highlight everything" bootstrap
pub const BOOTSTRAP_COLOUR: &str = "blue";

pub const DEFAULT_STROKE: &str = "black";
pub const DEFAULT_NODE_RADIUS: f64 = 25.0;
pub const DEFAULT_NODE_STROKE_WIDTH: f64 = 1.0;

// Perpendicular offset applied to each member of a bidirectional edge pair
pub const OVERLAP_OFFSET: f64 = 5.0;

// Kind tag carried by every node in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "goal")]
    Goal,
    #[serde(rename = "variable")]
    Variable,
    #[serde(rename = "constraint")]
    Constraint,
    #[serde(rename = "factor")]
    Factor,
    #[serde(rename = "plain")]
    Plain,
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Plain
    }
}

// Stroke weight requested by an arc highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightStyle {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bold")]
    Bold,
}

impl HighlightStyle {
    pub fn stroke_width(&self) -> f64 {
        match self {
            HighlightStyle::Normal => ARC_STROKE_NORMAL,
            HighlightStyle::Bold => ARC_STROKE_BOLD,
        }
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        HighlightStyle::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

// Canvas dimensions supplied to every layout call and re-supplied on resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_padding")]
    pub padding: f64,
}

fn default_padding() -> f64 {
    30.0
}

impl LayoutParams {
    pub fn new(width: f64, height: f64) -> Self {
        LayoutParams {
            width,
            height,
            padding: default_padding(),
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams::new(800.0, 600.0)
    }
}

// ===== Node/edge visual attributes =====
// Closed attribute sets merged field-wise through the patch structs below,
// so independent style writers never clobber each other.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyles {
    pub stroke: String,
    pub stroke_width: f64,
    pub radius: f64,
    // Measured by the host once text is rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Point>,
}

impl Default for NodeStyles {
    fn default() -> Self {
        NodeStyles {
            stroke: DEFAULT_STROKE.to_string(),
            stroke_width: DEFAULT_NODE_STROKE_WIDTH,
            radius: DEFAULT_NODE_RADIUS,
            width: None,
            height: None,
            offset: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Point>,
}

impl NodeStyles {
    pub fn apply(&mut self, patch: &NodeStylePatch) {
        if let Some(ref stroke) = patch.stroke {
            self.stroke = stroke.clone();
        }
        if let Some(stroke_width) = patch.stroke_width {
            self.stroke_width = stroke_width;
        }
        if let Some(radius) = patch.radius {
            self.radius = radius;
        }
        if let Some(width) = patch.width {
            self.width = Some(width);
        }
        if let Some(height) = patch.height {
            self.height = Some(height);
        }
        if let Some(offset) = patch.offset {
            self.offset = Some(offset);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyles {
    pub stroke: String,
    pub stroke_width: f64,
    // Set when this edge is one half of a bidirectional pair
    pub overlapped: bool,
    // Endpoint coordinates, shifted off the node-joining line when overlapped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
}

impl Default for EdgeStyles {
    fn default() -> Self {
        EdgeStyles {
            stroke: DEFAULT_STROKE.to_string(),
            stroke_width: ARC_STROKE_NORMAL,
            overlapped: false,
            x1: None,
            y1: None,
            x2: None,
            y2: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeStylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlapped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
}

impl EdgeStyles {
    pub fn apply(&mut self, patch: &EdgeStylePatch) {
        if let Some(ref stroke) = patch.stroke {
            self.stroke = stroke.clone();
        }
        if let Some(stroke_width) = patch.stroke_width {
            self.stroke_width = stroke_width;
        }
        if let Some(overlapped) = patch.overlapped {
            self.overlapped = overlapped;
        }
        if let Some(x1) = patch.x1 {
            self.x1 = Some(x1);
        }
        if let Some(y1) = patch.y1 {
            self.y1 = Some(y1);
        }
        if let Some(x2) = patch.x2 {
            self.x2 = Some(x2);
        }
        if let Some(y2) = patch.y2 {
            self.y2 = Some(y2);
        }
    }
}

// ===== Snapshot input (JSON boundary) =====

// Node as delivered by the snapshot source; ids are assigned there and
// never regenerated here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<SnapshotEdge>,
}
