use serde_json::{json, Value};
use town_core::{Action, AgentState, PlanStep, Policy, ValidTargets, WorldTree};

use crate::prompts::{
    parse, parse_input, ActInput, DayPlanInput, DialogueInput, ImportanceInput, ObservationInput,
    PlanDecomposeInput, Prompt, PromptId, ReactInput, ReflectionInsightsInput,
    ReflectionQuestionsInput,
};

/// Deterministic fixture backend.
///
/// Every prompt gets a canned but input-dependent answer, and actions are
/// chosen through the `act` prompt like a model-backed policy would.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptedPolicy;

impl ScriptedPolicy {
    pub fn new() -> Self {
        Self
    }
}

fn answer<P: Prompt>(prompt: &str, fixture: impl FnOnce(P) -> Value) -> String {
    match parse_input::<P>(prompt) {
        Some(input) => fixture(input).to_string(),
        None => "{}".to_string(),
    }
}

fn importance_for(memory_type: Option<&str>) -> i64 {
    match memory_type {
        Some("action") | Some("reflection") => 3,
        Some("plan") => 1,
        _ => 2,
    }
}

/// 1-based support pair for insight `index` out of `total` statements.
fn supports_for(index: usize, total: usize) -> Vec<usize> {
    if total <= 1 {
        return vec![1];
    }
    let start = index + 1;
    vec![start, (start + 1).min(total)]
}

fn observation(input: ObservationInput) -> Value {
    let mut observations = vec![format!(
        "{} is at {}.",
        input.agent_name, input.location_name
    )];
    if !input.visible_agents.is_empty() {
        observations.push(format!(
            "{} sees {} nearby.",
            input.agent_name,
            input.visible_agents.join(", ")
        ));
    }
    if !input.visible_objects.is_empty() {
        observations.push(format!(
            "{} notices {}.",
            input.agent_name,
            input.visible_objects.join(", ")
        ));
    }
    json!({ "observations": observations })
}

fn reflection_insights(input: ReflectionInsightsInput) -> Value {
    let total = input.statements.len();
    let insights: Vec<Value> = (0..total.clamp(1, 3))
        .map(|i| {
            json!({
                "text": format!("Insight {} based on recent memories.", i + 1),
                "supports": supports_for(i, total),
            })
        })
        .collect();
    json!({ "insights": insights })
}

fn day_plan(input: DayPlanInput) -> Value {
    if input.locations.is_empty() {
        return json!({});
    }
    let name = &input.agent_name;
    let templates = [
        "starts the day and checks the surroundings at",
        "spends time and observes activity at",
        "takes a short walk and reflects near",
        "does a short errand around",
        "wraps up with a final stop at",
    ];
    let items: Vec<Value> = input
        .locations
        .iter()
        .cycle()
        .zip(templates)
        .map(|(location, verb)| {
            json!({
                "location": location,
                "description": format!("{name} {verb} {location}."),
                "duration": 4,
            })
        })
        .collect();
    json!({ "items": items })
}

fn plan_decompose(input: PlanDecomposeInput) -> Value {
    let chunk = input.chunk_size.max(1);
    let mut items = Vec::new();
    for item in &input.items {
        let mut remaining = item.duration.max(1);
        while remaining > 0 {
            let step = remaining.min(chunk);
            items.push(json!({
                "location": item.location,
                "description": format!("{} (action slice)", item.description.trim()),
                "duration": step,
            }));
            remaining -= step;
        }
    }
    json!({ "items": items })
}

fn act(input: ActInput) -> Value {
    if let Some(location) = input.plan_location.as_deref() {
        if location != input.current_location
            && input.valid_locations.iter().any(|l| l == location)
        {
            return json!({ "kind": "MOVE", "move": { "to_location_id": location } });
        }
    }
    if let Some(other) = input.valid_agents.first() {
        return json!({
            "kind": "SAY",
            "say": {
                "to_agent_id": other,
                "utterance": format!("Hello, I'm {}.", input.agent_name),
            },
        });
    }
    if let Some(object) = input.valid_objects.first() {
        return json!({ "kind": "INTERACT", "interact": { "object_id": object, "verb": "USE" } });
    }
    json!({ "kind": "IDLE" })
}

impl Policy for ScriptedPolicy {
    fn decide_action(
        &mut self,
        _world: &WorldTree,
        agent: &AgentState,
        targets: &ValidTargets,
        plan_step: Option<&PlanStep>,
    ) -> Action {
        let input = ActInput {
            agent_name: agent.name.clone(),
            current_location: agent.location_id.clone(),
            valid_locations: targets.locations.iter().cloned().collect(),
            valid_objects: targets.objects.iter().cloned().collect(),
            valid_agents: targets.agents.iter().cloned().collect(),
            plan_step: plan_step.map(|s| s.description.clone()),
            plan_location: plan_step.map(|s| s.location.clone()),
        };
        let response = self.complete_prompt(PromptId::Act.as_str(), &input.render());
        match parse::<ActInput>(&response) {
            Some(action) => action.coerce(targets),
            None => Action::Idle,
        }
    }

    fn complete_prompt(&mut self, prompt_id: &str, prompt: &str) -> String {
        let Ok(id) = prompt_id.parse::<PromptId>() else {
            tracing::debug!(prompt_id, "no fixture for prompt");
            return "{}".to_string();
        };
        match id {
            PromptId::Observation => answer(prompt, observation),
            PromptId::Importance => answer(prompt, |input: ImportanceInput| {
                json!({ "importance": importance_for(input.memory_type.as_deref()) })
            }),
            PromptId::ReflectionQuestions => answer(prompt, |_: ReflectionQuestionsInput| {
                json!({
                    "questions": [
                        "What patterns are emerging?",
                        "What is the main focus right now?",
                        "What should be followed up on?",
                    ]
                })
            }),
            PromptId::ReflectionInsights => answer(prompt, reflection_insights),
            PromptId::DayPlan => answer(prompt, day_plan),
            PromptId::PlanDecompose => answer(prompt, plan_decompose),
            PromptId::React => answer(prompt, |_: ReactInput| {
                json!({ "react": false, "reaction": "Keeps to the plan." })
            }),
            PromptId::DialogueInitiator | PromptId::DialogueResponder => {
                answer(prompt, |input: DialogueInput| {
                    json!({ "utterance": format!("{} says hello.", input.agent_name) })
                })
            }
            PromptId::Act => answer(prompt, act),
        }
    }
}
