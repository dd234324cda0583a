//! Prompt catalog: typed inputs, typed outputs, rendering and parsing.
//!
//! Every prompt renders as
//!
//! ```text
//! {instruction}
//! Input JSON:
//! {pretty-printed input}
//! Output JSON:
//! ```
//!
//! and every completion is parsed by pulling the outermost JSON object out of
//! the text and validating it against the prompt's output type. Unknown
//! fields are rejected, so a sloppy completion falls back instead of
//! half-applying.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use town_core::{Action, Tick};
use town_plan::PlanSlot;

use crate::PolicyError;

const INPUT_MARKER: &str = "Input JSON:";
const OUTPUT_MARKER: &str = "Output JSON:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptId {
    Observation,
    Importance,
    ReflectionQuestions,
    ReflectionInsights,
    DayPlan,
    PlanDecompose,
    React,
    DialogueInitiator,
    DialogueResponder,
    Act,
}

impl PromptId {
    pub const ALL: [PromptId; 10] = [
        PromptId::Observation,
        PromptId::Importance,
        PromptId::ReflectionQuestions,
        PromptId::ReflectionInsights,
        PromptId::DayPlan,
        PromptId::PlanDecompose,
        PromptId::React,
        PromptId::DialogueInitiator,
        PromptId::DialogueResponder,
        PromptId::Act,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PromptId::Observation => "observation",
            PromptId::Importance => "importance",
            PromptId::ReflectionQuestions => "reflection_questions",
            PromptId::ReflectionInsights => "reflection_insights",
            PromptId::DayPlan => "day_plan",
            PromptId::PlanDecompose => "plan_decompose",
            PromptId::React => "react",
            PromptId::DialogueInitiator => "dialogue_initiator",
            PromptId::DialogueResponder => "dialogue_responder",
            PromptId::Act => "act",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            PromptId::Observation => {
                "You are writing short observation memories. \
                 Return JSON with a list of brief, declarative observations."
            }
            PromptId::Importance => {
                "Rate the importance of the memory on a 1-10 scale. \
                 Return JSON with an integer importance."
            }
            PromptId::ReflectionQuestions => {
                "Generate three high-level reflection questions. \
                 Return JSON with a questions list."
            }
            PromptId::ReflectionInsights => {
                "Generate 3-5 insights. Each insight should reference supporting \
                 statement indices (1-based). Return JSON with an insights list."
            }
            PromptId::DayPlan => {
                "Create a 5-8 item day plan. Each item must include a location and \
                 duration (ticks). Return JSON with an items list."
            }
            PromptId::PlanDecompose => {
                "Decompose the plan into smaller chunks with the provided chunk size. \
                 Return JSON with an items list."
            }
            PromptId::React => {
                "Decide whether to react to the observation. \
                 Return JSON with react boolean and reaction string."
            }
            PromptId::DialogueInitiator => {
                "Write a single initiating utterance. Return JSON with an utterance field."
            }
            PromptId::DialogueResponder => {
                "Write a single response utterance. Return JSON with an utterance field."
            }
            PromptId::Act => {
                "Choose exactly one action. Return only JSON matching the action schema: \
                 { \"kind\": \"IDLE|MOVE|INTERACT|SAY\", \
                 \"move\": {\"to_location_id\": \"...\"}, \
                 \"interact\": {\"object_id\": \"...\", \"verb\": \"USE|OPEN|CLOSE|TAKE|DROP\"}, \
                 \"say\": {\"to_agent_id\": \"...\", \"utterance\": \"...\"} }"
            }
        }
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptId {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownPrompt(s.to_string()))
    }
}

/// A typed prompt input that knows its id and how to read its answer.
pub trait Prompt: Serialize + DeserializeOwned {
    type Output;

    fn prompt_id(&self) -> PromptId;

    fn parse_output(value: Value) -> Option<Self::Output>;

    fn render(&self) -> String {
        render(self.prompt_id(), self)
    }
}

macro_rules! schema_output {
    ($input:ty, $id:expr, $output:ty) => {
        impl Prompt for $input {
            type Output = $output;

            fn prompt_id(&self) -> PromptId {
                $id
            }

            fn parse_output(value: Value) -> Option<Self::Output> {
                serde_json::from_value(value).ok()
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservationInput {
    pub agent_name: String,
    pub location_name: String,
    #[serde(default)]
    pub visible_agents: Vec<String>,
    #[serde(default)]
    pub visible_objects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservationOutput {
    pub observations: Vec<String>,
}

schema_output!(ObservationInput, PromptId::Observation, ObservationOutput);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportanceInput {
    pub memory_text: String,
    #[serde(default)]
    pub memory_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportanceOutput {
    pub importance: i64,
}

schema_output!(ImportanceInput, PromptId::Importance, ImportanceOutput);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReflectionQuestionsInput {
    pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReflectionQuestionsOutput {
    pub questions: Vec<String>,
}

schema_output!(
    ReflectionQuestionsInput,
    PromptId::ReflectionQuestions,
    ReflectionQuestionsOutput
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReflectionInsightsInput {
    pub statements: Vec<String>,
    pub questions: Vec<String>,
}

/// One insight; `supports` are 1-based indices into the input statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsightSpec {
    pub text: String,
    pub supports: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReflectionInsightsOutput {
    pub insights: Vec<InsightSpec>,
}

schema_output!(
    ReflectionInsightsInput,
    PromptId::ReflectionInsights,
    ReflectionInsightsOutput
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanItemSpec {
    pub description: String,
    pub location: String,
    pub duration: Tick,
}

impl From<PlanItemSpec> for PlanSlot {
    fn from(spec: PlanItemSpec) -> Self {
        PlanSlot::new(spec.location, spec.description, spec.duration)
    }
}

impl From<&PlanSlot> for PlanItemSpec {
    fn from(slot: &PlanSlot) -> Self {
        Self {
            description: slot.description.clone(),
            location: slot.location.clone(),
            duration: slot.duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DayPlanInput {
    pub agent_name: String,
    pub start_tick: Tick,
    #[serde(default)]
    pub context: Option<String>,
    /// Areas the agent usually spends the day in.
    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanItemsOutput {
    pub items: Vec<PlanItemSpec>,
}

schema_output!(DayPlanInput, PromptId::DayPlan, PlanItemsOutput);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDecomposeInput {
    pub items: Vec<PlanItemSpec>,
    pub chunk_size: Tick,
}

schema_output!(PlanDecomposeInput, PromptId::PlanDecompose, PlanItemsOutput);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactInput {
    pub agent_name: String,
    pub observation: String,
    #[serde(default)]
    pub current_plan: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactOutput {
    pub react: bool,
    pub reaction: String,
}

schema_output!(ReactInput, PromptId::React, ReactOutput);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialogueInput {
    pub agent_name: String,
    pub observation: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub history: Vec<String>,
    /// Selects the responder prompt; not part of the rendered payload.
    #[serde(skip)]
    pub responding: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialogueOutput {
    pub utterance: String,
}

impl Prompt for DialogueInput {
    type Output = DialogueOutput;

    fn prompt_id(&self) -> PromptId {
        if self.responding {
            PromptId::DialogueResponder
        } else {
            PromptId::DialogueInitiator
        }
    }

    fn parse_output(value: Value) -> Option<Self::Output> {
        serde_json::from_value(value).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActInput {
    pub agent_name: String,
    pub current_location: String,
    pub valid_locations: Vec<String>,
    pub valid_objects: Vec<String>,
    pub valid_agents: Vec<String>,
    #[serde(default)]
    pub plan_step: Option<String>,
    #[serde(default)]
    pub plan_location: Option<String>,
}

impl Prompt for ActInput {
    type Output = Action;

    fn prompt_id(&self) -> PromptId {
        PromptId::Act
    }

    fn parse_output(value: Value) -> Option<Self::Output> {
        Action::from_json(&value)
    }
}

/// Render `payload` under the instruction for `id`.
pub fn render<T: Serialize + ?Sized>(id: PromptId, payload: &T) -> String {
    let body = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
    format!(
        "{}\n{INPUT_MARKER}\n{body}\n{OUTPUT_MARKER}",
        id.instruction()
    )
}

/// Parse a completion for prompt `P`. `None` on any mismatch.
pub fn parse<P: Prompt>(text: &str) -> Option<P::Output> {
    P::parse_output(extract_json(text)?)
}

/// Read the input payload back out of a rendered prompt.
pub fn parse_input<P: Prompt>(prompt: &str) -> Option<P> {
    serde_json::from_value(extract_json(prompt)?).ok()
}

/// Pull a JSON object out of free-form text.
///
/// A block between the input/output markers wins; otherwise the span from
/// the first `{` to the last `}` is tried. Non-object JSON yields `None`.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Some((_, rest)) = text.split_once(INPUT_MARKER) {
        if let Some((block, _)) = rest.split_once(OUTPUT_MARKER) {
            let block = block.trim();
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(block) {
                return Some(value);
            }
        }
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

pub fn clamp_importance(value: i64) -> u8 {
    value.clamp(1, 10) as u8
}
