//! Decision backends for town agents.
//!
//! - [`prompts`]: the prompt catalog shared by every backend.
//! - [`ScriptedPolicy`]: deterministic fixture answers for every prompt.
//! - [`PatrolPolicy`]: route-following movement, no prompt answers.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use town_core::Policy;

pub mod error;
pub mod patrol;
pub mod prompts;
pub mod scripted;

pub use error::{PolicyError, Result};
pub use patrol::PatrolPolicy;
pub use prompts::{clamp_importance, extract_json, Prompt, PromptId};
pub use scripted::ScriptedPolicy;

/// Which backend drives the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Scripted,
    Patrol,
}

impl PolicyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Scripted => "scripted",
            PolicyKind::Patrol => "patrol",
        }
    }

    pub fn build(self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Scripted => Box::new(ScriptedPolicy::new()),
            PolicyKind::Patrol => Box::new(PatrolPolicy::new()),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scripted" => Ok(PolicyKind::Scripted),
            "patrol" => Ok(PolicyKind::Patrol),
            other => Err(PolicyError::UnknownPolicy(other.to_string())),
        }
    }
}
