use std::collections::BTreeMap;

use town_core::{Action, AgentState, PlanStep, Policy, ValidTargets, WorldTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    index: usize,
    forward: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            index: 0,
            forward: true,
        }
    }
}

/// Walks each agent back and forth along its patrol route.
///
/// Prompts are all answered with `{}` so every sub-prompt takes its
/// fallback path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatrolPolicy {
    cursors: BTreeMap<String, Cursor>,
}

impl PatrolPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for PatrolPolicy {
    fn decide_action(
        &mut self,
        _world: &WorldTree,
        agent: &AgentState,
        _targets: &ValidTargets,
        _plan_step: Option<&PlanStep>,
    ) -> Action {
        let route = &agent.patrol_route;
        if route.len() < 2 || agent.is_traveling() {
            return Action::Idle;
        }

        let cursor = self.cursors.entry(agent.agent_id.clone()).or_default();
        if let Some(pos) = route.iter().position(|r| *r == agent.location_id) {
            cursor.index = pos;
        }

        let step = |c: &Cursor| {
            if c.forward {
                c.index.checked_add(1).filter(|i| *i < route.len())
            } else {
                c.index.checked_sub(1)
            }
        };
        let next = match step(&*cursor) {
            Some(next) => next,
            None => {
                cursor.forward = !cursor.forward;
                match step(&*cursor) {
                    Some(next) => next,
                    None => return Action::Idle,
                }
            }
        };

        let destination = &route[next];
        if *destination == agent.location_id {
            return Action::Idle;
        }
        Action::Move {
            to: destination.clone(),
        }
    }

    fn complete_prompt(&mut self, _prompt_id: &str, _prompt: &str) -> String {
        "{}".to_string()
    }
}
