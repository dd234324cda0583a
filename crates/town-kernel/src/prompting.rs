//! Backend prompts with their deterministic fallbacks.
//!
//! Every helper here turns a prompt round-trip into a usable value. When a
//! completion does not parse, or parses into something unusable, the
//! fallback is used and the substitution is logged at `debug`.

use town_core::{Policy, Tick};
use town_memory::{fallback_insights, Insight, MemoryKind, MemoryRecord};
use town_plan::{
    fallback_day_plan, is_valid_day_plan, sequence_slots, PlanHierarchy, PlanItem, PlanLevel,
    PlanSlot,
};
use town_policy::prompts::{
    parse, DayPlanInput, DialogueInput, ImportanceInput, ObservationInput, PlanDecomposeInput,
    PlanItemSpec, ReactInput, ReflectionInsightsInput, ReflectionQuestionsInput,
};
use town_policy::{clamp_importance, Prompt};

/// Chunk sizes used when a fresh hierarchy is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanShape {
    pub hour_chunk: Tick,
    pub action_chunk: Tick,
}

pub struct Prompter<'a> {
    policy: &'a mut dyn Policy,
}

impl<'a> Prompter<'a> {
    pub fn new(policy: &'a mut dyn Policy) -> Self {
        Self { policy }
    }

    fn run<P: Prompt>(&mut self, input: &P) -> Option<P::Output> {
        let id = input.prompt_id();
        let response = self.policy.complete_prompt(id.as_str(), &input.render());
        let parsed = parse::<P>(&response);
        if parsed.is_none() {
            tracing::debug!(prompt = %id, "Unusable completion; using fallback");
        }
        parsed
    }

    pub fn observations(
        &mut self,
        agent_name: &str,
        location_name: &str,
        visible_agents: Vec<String>,
        visible_objects: Vec<String>,
    ) -> Vec<String> {
        let input = ObservationInput {
            agent_name: agent_name.to_string(),
            location_name: location_name.to_string(),
            visible_agents,
            visible_objects,
        };
        let observations: Vec<String> = self
            .run(&input)
            .map(|out| out.observations)
            .unwrap_or_default()
            .into_iter()
            .filter(|o| !o.trim().is_empty())
            .collect();
        if observations.is_empty() {
            return vec![format!("{agent_name} is at {location_name}.")];
        }
        observations
    }

    pub fn importance(&mut self, memory_text: &str, kind: MemoryKind) -> u8 {
        let input = ImportanceInput {
            memory_text: memory_text.to_string(),
            memory_type: Some(kind.as_str().to_string()),
        };
        match self.run(&input) {
            Some(out) => clamp_importance(out.importance),
            None => kind.fallback_importance(),
        }
    }

    /// Opening line for a conversation, or `None` to keep the chosen one.
    pub fn dialogue(&mut self, agent_name: &str, target_name: &str) -> Option<String> {
        let input = DialogueInput {
            agent_name: agent_name.to_string(),
            observation: format!("{agent_name} is initiating a conversation."),
            context: Some(format!("Speaking to {target_name}.")),
            history: Vec::new(),
            responding: false,
        };
        self.run(&input)
            .map(|out| out.utterance)
            .filter(|u| !u.trim().is_empty())
    }

    /// Reaction text when the backend decides the agent should react.
    pub fn reaction(
        &mut self,
        agent_name: &str,
        observation: &str,
        current_plan: Option<&str>,
    ) -> Option<String> {
        let input = ReactInput {
            agent_name: agent_name.to_string(),
            observation: observation.to_string(),
            current_plan: current_plan.map(str::to_string),
        };
        self.run(&input)
            .filter(|out| out.react)
            .map(|out| out.reaction)
    }

    /// Day-level items for `agent_id`, laid out from `start_tick`.
    pub fn day_plan(
        &mut self,
        agent_id: &str,
        agent_name: &str,
        start_tick: Tick,
        context: Option<&str>,
        anchors: &[String],
        generation: u32,
    ) -> Vec<PlanItem> {
        let input = DayPlanInput {
            agent_name: agent_name.to_string(),
            start_tick,
            context: context.map(str::to_string),
            locations: anchors.to_vec(),
        };
        let slots: Vec<PlanSlot> = self
            .run(&input)
            .map(|out| out.items.into_iter().map(PlanSlot::from).collect())
            .unwrap_or_default();
        let slots = if is_valid_day_plan(&slots) {
            slots
        } else {
            tracing::debug!(agent = agent_id, items = slots.len(), "Rejected day plan; using fallback");
            fallback_day_plan(agent_name, anchors)
        };
        let prefix = format!("{agent_id}/g{generation}/d");
        sequence_slots(&prefix, start_tick, &slots, PlanLevel::Day).unwrap_or_else(|| {
            tracing::debug!(agent = agent_id, start_tick, "Day plan overflows; using fallback");
            let fallback = fallback_day_plan(agent_name, anchors);
            sequence_slots(&prefix, start_tick, &fallback, PlanLevel::Day).unwrap_or_default()
        })
    }

    /// Decompose `day` locally, then let the backend propose action steps.
    pub fn hierarchy(
        &mut self,
        agent_id: &str,
        day: Vec<PlanItem>,
        shape: PlanShape,
        generation: u32,
    ) -> PlanHierarchy {
        let mut plan = PlanHierarchy::from_day(day, shape.hour_chunk, shape.action_chunk);
        let Some((start, _)) = plan.range() else {
            return plan;
        };
        let input = PlanDecomposeInput {
            items: plan
                .day
                .iter()
                .map(|item| PlanItemSpec {
                    description: item.description.clone(),
                    location: item.location.clone(),
                    duration: item.duration().max(1),
                })
                .collect(),
            chunk_size: shape.action_chunk.max(1),
        };
        if let Some(out) = self.run(&input) {
            let slots: Vec<PlanSlot> = out.items.into_iter().map(PlanSlot::from).collect();
            let actions = sequence_slots(
                &format!("{agent_id}/g{generation}/a"),
                start,
                &slots,
                PlanLevel::Action,
            );
            if !actions.is_some_and(|actions| plan.replace_actions(actions)) {
                tracing::debug!(agent = agent_id, "Decomposition does not cover the day; keeping local steps");
            }
        }
        plan
    }

    /// Questions, then insights; falls back to template insights.
    pub fn reflect(&mut self, agent_name: &str, supporting: &[MemoryRecord]) -> Vec<Insight> {
        if supporting.is_empty() {
            return Vec::new();
        }
        let statements: Vec<String> = supporting.iter().map(|r| r.description.clone()).collect();
        let questions = self
            .run(&ReflectionQuestionsInput {
                statements: statements.clone(),
            })
            .map(|out| out.questions)
            .unwrap_or_default();
        let insights = self
            .run(&ReflectionInsightsInput {
                statements,
                questions,
            })
            .map(|out| out.insights)
            .unwrap_or_default();
        if insights.is_empty() {
            return fallback_insights(agent_name, supporting);
        }
        insights
            .into_iter()
            .map(|spec| Insight {
                text: spec.text,
                links: spec
                    .supports
                    .iter()
                    .filter_map(|i| usize::try_from(*i).ok())
                    .filter(|i| (1..=supporting.len()).contains(i))
                    .map(|i| supporting[i - 1].id.clone())
                    .collect(),
            })
            .collect()
    }
}
