use thiserror::Error;

/// Ownership violations in the world tree.
///
/// These are configuration errors: a run never recovers from them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("node {0} is not an agent")]
    NotAnAgent(String),

    #[error("node {0} is not an area")]
    NotAnArea(String),

    #[error("root {0} must not have a parent")]
    RootHasParent(String),

    #[error("node {0} has no parent and is not the root")]
    Orphan(String),

    #[error("ownership chain from {from} is broken at {missing}")]
    BrokenChain { from: String, missing: String },

    #[error("cycle or unreachable node at {0}")]
    Cycle(String),

    #[error("node {child} cannot be nested under {parent}")]
    InvalidNesting { child: String, parent: String },

    #[error("parent/child links disagree between {child} and {parent}")]
    LinkMismatch { child: String, parent: String },

    #[error("node key {key} does not match node id {id}")]
    KeyMismatch { key: String, id: String },
}
