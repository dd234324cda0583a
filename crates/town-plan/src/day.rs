use std::ops::RangeInclusive;

use town_core::Tick;

use crate::PlanSlot;

/// Accepted number of day-plan entries from a backend.
pub const DAY_PLAN_LEN: RangeInclusive<usize> = 5..=8;

pub const FALLBACK_SLOT_TICKS: Tick = 4;

/// Longest day plan accepted from a backend, in ticks.
pub const MAX_DAY_PLAN_TICKS: Tick = 96;

/// Summed duration of `slots`, or `None` on overflow.
pub fn total_ticks(slots: &[PlanSlot]) -> Option<Tick> {
    slots
        .iter()
        .try_fold(0 as Tick, |total, s| total.checked_add(s.duration))
}

/// Whether backend slots form a usable day plan.
///
/// 5 to 8 entries, each at least one tick, at most [`MAX_DAY_PLAN_TICKS`]
/// in total.
pub fn is_valid_day_plan(slots: &[PlanSlot]) -> bool {
    DAY_PLAN_LEN.contains(&slots.len())
        && slots.iter().all(|s| s.duration >= 1)
        && total_ticks(slots).is_some_and(|total| total <= MAX_DAY_PLAN_TICKS)
}

/// Five four-tick entries cycling over the agent's anchor locations.
///
/// An empty anchor list yields an empty plan.
pub fn fallback_day_plan(agent_name: &str, anchors: &[String]) -> Vec<PlanSlot> {
    let descriptions = [
        format!("{agent_name} starts the day and checks the surroundings."),
        format!("{agent_name} spends time nearby and observes activity."),
        format!("{agent_name} takes a short walk and reflects."),
        format!("{agent_name} does a short errand and returns."),
        format!("{agent_name} wraps up with a final stop."),
    ];
    anchors
        .iter()
        .cycle()
        .zip(descriptions)
        .map(|(location, description)| PlanSlot::new(location.clone(), description, FALLBACK_SLOT_TICKS))
        .collect()
}
