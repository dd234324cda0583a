//! Town Kernel - world loading and the tick loop
//!
//! This crate wires the simulation primitives together: it loads a world
//! directory into a tree, grid, and agent set, then advances it one tick at
//! a time, consulting a decision backend for actions and prompts.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod loader;
pub mod orchestrator;
pub mod prompting;

pub use config::SimConfig;
pub use error::TickError;
pub use loader::{load_world, LoadError, LoadedWorld};
pub use orchestrator::{run_ticks, AgentMind, Simulation, TickRunner};
pub use prompting::{PlanShape, Prompter};
