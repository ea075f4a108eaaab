use thiserror::Error;

/// Error type shared across the graph model, layouts and protocol dispatch.
///
/// `DuplicateId` and `DanglingEdge` are fatal to view construction; every
/// other variant drops the offending mutation and leaves the view running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VizError {
    /// Snapshot contains the same id twice (node/node, edge/edge or mixed)
    #[error("duplicate id in snapshot: {0}")]
    DuplicateId(String),

    /// Snapshot edge references a node id that is not in the node list
    #[error("edge {edge} references unknown node {endpoint}")]
    DanglingEdge { edge: String, endpoint: String },

    /// Event references an id absent from the graph's id index
    #[error("unknown id: {0}")]
    UnknownId(String),

    /// Recognized event with a malformed payload
    #[error("malformed event: {0}")]
    ProtocolShape(String),

    /// A domain split is already awaiting its reply
    #[error("domain split already pending")]
    SplitPending,

    /// A split reply arrived with no split request outstanding
    #[error("no domain split pending")]
    NoSplitPending,
}
