use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A grid coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Tile) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// An area-to-area move in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Travel {
    pub origin: String,
    pub destination: String,
}

/// Per-agent mutable record, owned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    pub agent_id: String,
    pub name: String,
    /// Id of the area node currently holding the agent.
    pub location_id: String,
    pub position: Tile,
    pub path: VecDeque<Tile>,
    pub travel: Option<Travel>,
    pub patrol_route: Vec<String>,
}

impl AgentState {
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        location_id: impl Into<String>,
        position: Tile,
    ) -> Self {
        let location_id = location_id.into();
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            patrol_route: vec![location_id.clone()],
            location_id,
            position,
            path: VecDeque::new(),
            travel: None,
        }
    }

    pub fn with_patrol_route(mut self, route: Vec<String>) -> Self {
        if !route.is_empty() {
            self.patrol_route = route;
        }
        self
    }

    pub fn is_traveling(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_empty() && self.travel.is_none()
    }
}
