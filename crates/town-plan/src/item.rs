use std::fmt;

use serde::{Deserialize, Serialize};
use town_core::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    Day,
    Hour,
    Action,
}

impl PlanLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanLevel::Day => "day",
            PlanLevel::Hour => "hour",
            PlanLevel::Action => "action",
        }
    }
}

impl fmt::Display for PlanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One interval of a schedule, covering `[start_tick, end_tick)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    pub start_tick: Tick,
    pub end_tick: Tick,
    pub location: String,
    pub description: String,
    pub level: PlanLevel,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl PlanItem {
    pub fn duration(&self) -> Tick {
        self.end_tick.saturating_sub(self.start_tick)
    }

    pub fn contains_tick(&self, tick: Tick) -> bool {
        self.start_tick <= tick && tick < self.end_tick
    }

    /// Whether `other`'s whole range sits inside this item's range.
    pub fn encloses(&self, other: &PlanItem) -> bool {
        self.start_tick <= other.start_tick && other.end_tick <= self.end_tick
    }
}

/// Schedule entry before it is pinned to ticks: what a backend returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSlot {
    pub location: String,
    pub description: String,
    pub duration: Tick,
}

impl PlanSlot {
    pub fn new(location: impl Into<String>, description: impl Into<String>, duration: Tick) -> Self {
        Self {
            location: location.into(),
            description: description.into(),
            duration,
        }
    }
}

/// Lay slots back to back from `start_tick`. Ids are `"{id_prefix}{index}"`.
///
/// `None` if the last end tick would overflow.
pub fn sequence_slots(
    id_prefix: &str,
    start_tick: Tick,
    slots: &[PlanSlot],
    level: PlanLevel,
) -> Option<Vec<PlanItem>> {
    let mut current = start_tick;
    let mut items = Vec::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        let end_tick = current.checked_add(slot.duration)?;
        items.push(PlanItem {
            id: format!("{id_prefix}{i}"),
            start_tick: current,
            end_tick,
            location: slot.location.clone(),
            description: slot.description.clone(),
            level,
            parent_id: None,
        });
        current = end_tick;
    }
    Some(items)
}
