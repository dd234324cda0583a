use crate::MemoryRecord;

pub const DEFAULT_REFLECTION_THRESHOLD: u32 = 10;

/// Importance accumulator that fires once the running sum reaches a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionTrigger {
    threshold: u32,
    accumulated: u32,
}

impl Default for ReflectionTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_REFLECTION_THRESHOLD)
    }
}

impl ReflectionTrigger {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            accumulated: 0,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn accumulated(&self) -> u32 {
        self.accumulated
    }

    pub fn record_importance(&mut self, importance: u8) {
        self.accumulated = self.accumulated.saturating_add(u32::from(importance));
    }

    pub fn should_reflect(&self) -> bool {
        self.accumulated >= self.threshold
    }

    pub fn reset(&mut self) {
        self.accumulated = 0;
    }
}

/// A synthesized statement plus the ids of the records it rests on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub text: String,
    pub links: Vec<String>,
}

/// Template insights used when the backend yields nothing usable.
///
/// Links cover the first two, the next two, and the last two supporting
/// records. No supporting records means no insights.
pub fn fallback_insights(agent_name: &str, supporting: &[MemoryRecord]) -> Vec<Insight> {
    if supporting.is_empty() {
        return Vec::new();
    }
    let ids = |records: &[MemoryRecord]| records.iter().map(|r| r.id.clone()).collect();
    let n = supporting.len();
    let first = &supporting[..n.min(2)];
    let middle = &supporting[n.min(2)..n.min(4)];
    let last = &supporting[n.saturating_sub(2)..];
    vec![
        Insight {
            text: format!("{agent_name} noticed a pattern in recent events."),
            links: ids(first),
        },
        Insight {
            text: format!("{agent_name} is forming a short-term routine."),
            links: ids(middle),
        },
        Insight {
            text: format!("{agent_name} should follow through on recent observations."),
            links: ids(last),
        },
    ]
}
