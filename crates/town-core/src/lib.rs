//! Deterministic world model and decision contracts for the town simulation.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod area_graph;
pub mod embed;
pub mod error;
pub mod policy;
pub mod targets;
pub mod tick;
pub mod world;

pub use action::{Action, InteractVerb};
pub use agent::{AgentState, Tile, Travel};
pub use area_graph::{AreaGraph, Portals};
pub use embed::HashEmbedder;
pub use error::WorldError;
pub use policy::{Embedder, PlanStep, Policy};
pub use targets::{build_valid_targets, ValidTargets};
pub use tick::{Event, EventKind, Payload, StateSnapshot, Tick, TickSnapshot};
pub use world::{NodeKind, WorldNode, WorldTree};
