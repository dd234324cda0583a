//! Deterministic day → hour → action planning.
//!
//! A day plan is a list of back-to-back [`PlanItem`]s. Each level below it
//! partitions the same tick range into smaller chunks, and links to its
//! parent by range containment.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod day;
pub mod decompose;
pub mod hierarchy;
pub mod item;

pub use day::{
    fallback_day_plan, is_valid_day_plan, total_ticks, DAY_PLAN_LEN, FALLBACK_SLOT_TICKS,
    MAX_DAY_PLAN_TICKS,
};
pub use decompose::{active_item, assign_parents, covers_range, decompose};
pub use hierarchy::{PlanHierarchy, DEFAULT_ACTION_CHUNK_TICKS, DEFAULT_HOUR_CHUNK_TICKS};
pub use item::{sequence_slots, PlanItem, PlanLevel, PlanSlot};
