use crate::{Action, AgentState, ValidTargets, WorldTree};

/// The action-level plan item an agent is currently working through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub description: String,
    /// Area id the step should happen in.
    pub location: String,
}

/// Decision-making backend consulted once per agent per tick.
///
/// Implementations range from scripted fixtures to model-backed deciders;
/// the orchestrator only relies on these two calls. Any output that fails to
/// parse is replaced by a safe default on the caller's side.
pub trait Policy {
    fn decide_action(
        &mut self,
        world: &WorldTree,
        agent: &AgentState,
        targets: &ValidTargets,
        plan_step: Option<&PlanStep>,
    ) -> Action;

    /// Raw completion for a rendered prompt.
    fn complete_prompt(&mut self, prompt_id: &str, prompt: &str) -> String;
}

/// Text embedding backend used by memory retrieval.
pub trait Embedder {
    fn embed(&self, text: &str) -> Vec<f32>;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide_action(
        &mut self,
        world: &WorldTree,
        agent: &AgentState,
        targets: &ValidTargets,
        plan_step: Option<&PlanStep>,
    ) -> Action {
        (**self).decide_action(world, agent, targets, plan_step)
    }

    fn complete_prompt(&mut self, prompt_id: &str, prompt: &str) -> String {
        (**self).complete_prompt(prompt_id, prompt)
    }
}
