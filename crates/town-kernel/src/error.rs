use thiserror::Error;
use town_core::WorldError;

/// Fatal failure while advancing a tick.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TickError {
    #[error("world invariant violated at tick {tick}: {source}")]
    World {
        tick: u64,
        #[source]
        source: WorldError,
    },

    #[error("agent `{0}` has no memory stream")]
    MissingMind(String),
}
