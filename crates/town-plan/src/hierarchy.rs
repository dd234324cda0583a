use serde::{Deserialize, Serialize};
use town_core::Tick;

use crate::{active_item, assign_parents, covers_range, decompose, PlanItem, PlanLevel};

pub const DEFAULT_HOUR_CHUNK_TICKS: Tick = 2;
pub const DEFAULT_ACTION_CHUNK_TICKS: Tick = 1;

/// Day plan plus its hour and action refinements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanHierarchy {
    pub day: Vec<PlanItem>,
    pub hour: Vec<PlanItem>,
    pub action: Vec<PlanItem>,
}

impl PlanHierarchy {
    /// Decompose `day` into hours, and hours into actions.
    pub fn from_day(day: Vec<PlanItem>, hour_chunk: Tick, action_chunk: Tick) -> Self {
        let hour = decompose(&day, hour_chunk, PlanLevel::Hour);
        let action = decompose(&hour, action_chunk, PlanLevel::Action);
        Self { day, hour, action }
    }

    /// `[start, end)` of the day plan.
    pub fn range(&self) -> Option<(Tick, Tick)> {
        let first = self.day.first()?;
        let last = self.day.last()?;
        Some((first.start_tick, last.end_tick))
    }

    /// True until the day plan has run out.
    pub fn is_active_at(&self, tick: Tick) -> bool {
        self.range().is_some_and(|(_, end)| tick < end)
    }

    pub fn items(&self, level: PlanLevel) -> &[PlanItem] {
        match level {
            PlanLevel::Day => &self.day,
            PlanLevel::Hour => &self.hour,
            PlanLevel::Action => &self.action,
        }
    }

    pub fn active(&self, level: PlanLevel, tick: Tick) -> Option<&PlanItem> {
        active_item(self.items(level), tick)
    }

    /// Whether the items at `level` partition the day range, with every
    /// non-day item linked to an enclosing item one level up.
    pub fn covers(&self, level: PlanLevel) -> bool {
        let Some((start, end)) = self.range() else {
            return self.items(level).is_empty();
        };
        let items = self.items(level);
        if !covers_range(items, start, end) {
            return false;
        }
        let parents = match level {
            PlanLevel::Day => return items.iter().all(|i| i.parent_id.is_none()),
            PlanLevel::Hour => &self.day,
            PlanLevel::Action => &self.hour,
        };
        items.iter().all(|child| {
            child
                .parent_id
                .as_deref()
                .and_then(|pid| parents.iter().find(|p| p.id == pid))
                .is_some_and(|p| p.encloses(child))
        })
    }

    /// Swap in externally produced action items.
    ///
    /// Accepted only when they exactly cover the day range; parents are
    /// recomputed against the hour level. Returns whether the swap happened.
    pub fn replace_actions(&mut self, mut actions: Vec<PlanItem>) -> bool {
        let Some((start, end)) = self.range() else {
            return false;
        };
        if !covers_range(&actions, start, end) {
            return false;
        }
        for item in actions.iter_mut() {
            item.level = PlanLevel::Action;
        }
        assign_parents(&mut actions, &self.hour);
        self.action = actions;
        true
    }
}
