use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::WorldTree;

/// Logical simulation step. Ticks are not tied to wall-clock time.
pub type Tick = u64;

pub type Payload = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Move,
    Say,
    PlanSummary,
    ReflectionSummary,
    MemorySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    #[serde(default)]
    pub payload: Payload,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            payload: Payload::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.payload.get("agent_id").and_then(Value::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub world: WorldTree,
    /// Per-agent belief trees. Always empty in this core.
    #[serde(default)]
    pub beliefs: BTreeMap<String, WorldTree>,
}

/// Externally observable output of one tick. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: Tick,
    pub state: StateSnapshot,
    pub events: Option<Vec<Event>>,
}

impl TickSnapshot {
    pub fn new(tick: Tick, world: WorldTree, events: Vec<Event>) -> Self {
        Self {
            tick,
            state: StateSnapshot {
                world,
                beliefs: BTreeMap::new(),
            },
            events: if events.is_empty() { None } else { Some(events) },
        }
    }

    pub fn events(&self) -> &[Event] {
        self.events.as_deref().unwrap_or(&[])
    }

    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events().iter().filter(move |e| e.kind == kind)
    }
}
