//! Simulation configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use town_memory::{DEFAULT_RECENCY_DECAY, DEFAULT_REFLECTION_THRESHOLD};
use town_plan::{DEFAULT_ACTION_CHUNK_TICKS, DEFAULT_HOUR_CHUNK_TICKS};
use town_policy::PolicyKind;

/// Tunables for one simulation run, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks to run; `None` runs until interrupted.
    pub ticks: Option<u64>,

    /// Exponential decay per tick for retrieval recency
    #[serde(default = "default_recency_decay")]
    pub recency_decay: f64,

    /// Records returned by each retrieval
    #[serde(default = "default_retrieve_k")]
    pub retrieve_k: usize,

    /// Accumulated importance that triggers a reflection
    #[serde(default = "default_reflection_threshold")]
    pub reflection_threshold: u32,

    #[serde(default = "default_hour_chunk_ticks")]
    pub hour_chunk_ticks: u64,

    #[serde(default = "default_action_chunk_ticks")]
    pub action_chunk_ticks: u64,

    /// Width of the hash embedding vectors
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Decision backend
    pub policy: PolicyKind,
}

fn default_recency_decay() -> f64 {
    DEFAULT_RECENCY_DECAY
}
fn default_retrieve_k() -> usize {
    3
}
fn default_reflection_threshold() -> u32 {
    DEFAULT_REFLECTION_THRESHOLD
}
fn default_hour_chunk_ticks() -> u64 {
    DEFAULT_HOUR_CHUNK_TICKS
}
fn default_action_chunk_ticks() -> u64 {
    DEFAULT_ACTION_CHUNK_TICKS
}
fn default_embedding_dim() -> usize {
    8
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: None,
            recency_decay: default_recency_decay(),
            retrieve_k: default_retrieve_k(),
            reflection_threshold: default_reflection_threshold(),
            hour_chunk_ticks: default_hour_chunk_ticks(),
            action_chunk_ticks: default_action_chunk_ticks(),
            embedding_dim: default_embedding_dim(),
            policy: PolicyKind::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
