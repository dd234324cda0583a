//! The per-tick control loop.

use std::collections::{BTreeMap, BTreeSet};
use std::iter::FusedIterator;
use std::rc::Rc;

use town_core::{
    build_valid_targets, Action, AgentState, AreaGraph, Embedder, Event, EventKind, HashEmbedder,
    NodeKind, PlanStep, Policy, Tick, TickSnapshot, WorldError, WorldTree,
};
use town_memory::{MemoryKind, MemoryRecord, MemoryStream, ReflectionTrigger};
use town_nav::{advance_movement, start_move, AreaLayout, MoveContext, TileGrid};
use town_plan::{PlanHierarchy, PlanLevel};

use crate::prompting::{PlanShape, Prompter};
use crate::{LoadedWorld, SimConfig, TickError};

/// Memory, reflection, and planning state of one agent.
#[derive(Debug)]
pub struct AgentMind {
    pub memory: MemoryStream,
    pub trigger: ReflectionTrigger,
    pub plan: Option<PlanHierarchy>,
    generation: u32,
}

impl AgentMind {
    /// How many plan hierarchies have been built for this agent.
    pub fn plan_generation(&self) -> u32 {
        self.generation
    }
}

/// A loaded world plus everything needed to advance it.
pub struct Simulation {
    tick: Tick,
    world: WorldTree,
    graph: AreaGraph,
    grid: TileGrid,
    layout: AreaLayout,
    agents: BTreeMap<String, AgentState>,
    minds: BTreeMap<String, AgentMind>,
    policy: Box<dyn Policy>,
    retrieve_k: usize,
    plan_shape: PlanShape,
}

impl Simulation {
    pub fn new(
        loaded: LoadedWorld,
        policy: Box<dyn Policy>,
        embedder: Rc<dyn Embedder>,
        config: &SimConfig,
    ) -> Self {
        let graph = AreaGraph::build(&loaded.world, &loaded.portals);
        let minds = loaded
            .agents
            .keys()
            .map(|id| {
                let mind = AgentMind {
                    memory: MemoryStream::new(id.as_str(), Rc::clone(&embedder))
                        .with_recency_decay(config.recency_decay),
                    trigger: ReflectionTrigger::new(config.reflection_threshold),
                    plan: None,
                    generation: 0,
                };
                (id.clone(), mind)
            })
            .collect();
        Self {
            tick: 0,
            world: loaded.world,
            graph,
            grid: loaded.grid,
            layout: loaded.layout,
            agents: loaded.agents,
            minds,
            policy,
            retrieve_k: config.retrieve_k,
            plan_shape: PlanShape {
                hour_chunk: config.hour_chunk_ticks,
                action_chunk: config.action_chunk_ticks,
            },
        }
    }

    /// Policy from `config.policy`, hash embeddings of `config.embedding_dim`.
    pub fn from_config(loaded: LoadedWorld, config: &SimConfig) -> Self {
        let embedder: Rc<dyn Embedder> = Rc::new(HashEmbedder::new(config.embedding_dim));
        Self::new(loaded, config.policy.build(), embedder, config)
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn world(&self) -> &WorldTree {
        &self.world
    }

    pub fn agent(&self, agent_id: &str) -> Option<&AgentState> {
        self.agents.get(agent_id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.values()
    }

    pub fn mind(&self, agent_id: &str) -> Option<&AgentMind> {
        self.minds.get(agent_id)
    }

    pub fn layout(&self) -> &AreaLayout {
        &self.layout
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Advance one tick and return its snapshot.
    ///
    /// Agents are processed in sorted-id order. Events come out as all `MOVE`s,
    /// then all `SAY`s, then each agent's plan, memory, and reflection
    /// summaries.
    pub fn step(&mut self) -> Result<TickSnapshot, TickError> {
        let t = self.tick + 1;
        let world_err = move |source: WorldError| TickError::World { tick: t, source };
        let snapshot = self.world.clone();

        let mut actions: BTreeMap<String, Action> = BTreeMap::new();
        for (id, agent) in &self.agents {
            let targets = build_valid_targets(&snapshot, &self.graph, id).map_err(world_err)?;
            let step = self
                .minds
                .get(id)
                .and_then(|m| m.plan.as_ref())
                .and_then(|p| p.active(PlanLevel::Action, t))
                .map(|item| PlanStep {
                    description: item.description.clone(),
                    location: item.location.clone(),
                });
            let action = self
                .policy
                .decide_action(&snapshot, agent, &targets, step.as_ref())
                .coerce(&targets);
            tracing::debug!(tick = t, agent = %id, action = action.kind_str(), "Decided action");
            actions.insert(id.clone(), action);
        }

        let no_blocks = BTreeSet::new();
        let ctx = MoveContext {
            grid: &self.grid,
            layout: &self.layout,
            blocked: &no_blocks,
        };
        for (id, action) in &actions {
            let Action::Move { to } = action else {
                continue;
            };
            if let Some(agent) = self.agents.get_mut(id) {
                if !agent.is_traveling() {
                    start_move(agent, to, ctx);
                }
            }
        }

        let mut events = Vec::new();
        let mut arrivals: BTreeMap<String, Event> = BTreeMap::new();
        for (id, agent) in self.agents.iter_mut() {
            if let Some(event) =
                advance_movement(agent, &mut self.world, &self.layout).map_err(world_err)?
            {
                arrivals.insert(id.clone(), event.clone());
                events.push(event);
            }
        }

        let mut summaries = Vec::new();
        let mut prompter = Prompter::new(self.policy.as_mut());
        for (id, agent) in &self.agents {
            let mind = self
                .minds
                .get_mut(id)
                .ok_or_else(|| TickError::MissingMind(id.clone()))?;
            let world = &self.world;
            let display = |node_id: &str| world.name_of(node_id).unwrap_or(node_id).to_string();
            let location_name = display(&agent.location_id);

            let visible_agents = world
                .children_of_kind(&agent.location_id, NodeKind::Agent)
                .filter(|n| n.id() != id)
                .map(|n| n.name().to_string())
                .collect();
            let visible_objects = world
                .children_of_kind(&agent.location_id, NodeKind::Object)
                .map(|n| n.name().to_string())
                .collect();
            let observations =
                prompter.observations(&agent.name, &location_name, visible_agents, visible_objects);
            for text in &observations {
                remember(&mut prompter, mind, text, t, MemoryKind::Observation, Vec::new());
            }

            match actions.get(id) {
                Some(Action::Say {
                    to_agent_id,
                    utterance,
                }) => {
                    let target_name = display(to_agent_id);
                    let utterance = prompter
                        .dialogue(&agent.name, &target_name)
                        .unwrap_or_else(|| utterance.clone());
                    let text = format!("{} says to {}: \"{}\".", agent.name, target_name, utterance);
                    remember(&mut prompter, mind, &text, t, MemoryKind::Action, Vec::new());
                    events.push(
                        Event::new(EventKind::Say)
                            .with("agent_id", id.as_str())
                            .with("to_agent_id", to_agent_id.as_str())
                            .with("utterance", utterance)
                            .with("area_id", agent.location_id.as_str()),
                    );
                }
                Some(Action::Interact { object_id, verb }) => {
                    let text = format!(
                        "{} {} {}.",
                        agent.name,
                        verb.present_tense(),
                        display(object_id)
                    );
                    remember(&mut prompter, mind, &text, t, MemoryKind::Action, Vec::new());
                }
                _ => {}
            }

            if let Some(event) = arrivals.get(id) {
                let text = format!(
                    "{} moved from {} to {}.",
                    agent.name,
                    display(event.field("from").unwrap_or_default()),
                    display(event.field("to").unwrap_or_default())
                );
                remember(&mut prompter, mind, &text, t, MemoryKind::Action, Vec::new());
            }

            if !mind.plan.as_ref().is_some_and(|p| p.is_active_at(t)) {
                rebuild_plan(&mut prompter, mind, agent, t, None, self.plan_shape);
            }

            let active = mind
                .plan
                .as_ref()
                .and_then(|p| p.active(PlanLevel::Action, t))
                .cloned();
            if let Some(item) = &active {
                summaries.push(
                    Event::new(EventKind::PlanSummary)
                        .with("agent_id", id.as_str())
                        .with("plan_id", item.id.as_str())
                        .with("level", item.level.as_str())
                        .with("start_tick", item.start_tick)
                        .with("end_tick", item.end_tick)
                        .with("location", item.location.as_str())
                        .with("description", item.description.as_str()),
                );
            }

            if let Some(first) = observations.first() {
                let current_plan = active.as_ref().map(|i| i.description.as_str());
                if let Some(reaction) = prompter.reaction(&agent.name, first, current_plan) {
                    let text = format!("{} decides to react: {}", agent.name, reaction);
                    remember(&mut prompter, mind, &text, t, MemoryKind::Reflection, Vec::new());
                    rebuild_plan(&mut prompter, mind, agent, t, Some(&reaction), self.plan_shape);
                }
            }

            let query = format!("{} at {}.", agent.name, location_name);
            let retrieved: Vec<MemoryRecord> = mind
                .memory
                .retrieve(&query, t, self.retrieve_k)
                .into_iter()
                .map(|hit| hit.record)
                .collect();
            summaries.push(
                Event::new(EventKind::MemorySummary)
                    .with("agent_id", id.as_str())
                    .with("total", mind.memory.len())
                    .with("latest", descriptions(mind.memory.latest(3)))
                    .with("retrieved", descriptions(&retrieved)),
            );

            if mind.trigger.should_reflect() {
                let insights = prompter.reflect(&agent.name, &retrieved);
                for insight in &insights {
                    remember(
                        &mut prompter,
                        mind,
                        &insight.text,
                        t,
                        MemoryKind::Reflection,
                        insight.links.clone(),
                    );
                }
                mind.trigger.reset();
                tracing::debug!(tick = t, agent = %id, insights = insights.len(), "Reflected");
                summaries.push(
                    Event::new(EventKind::ReflectionSummary)
                        .with("agent_id", id.as_str())
                        .with("count", insights.len())
                        .with(
                            "items",
                            insights.iter().map(|i| i.text.clone()).collect::<Vec<_>>(),
                        ),
                );
            }
        }

        events.extend(summaries);
        self.tick = t;
        tracing::debug!(tick = t, events = events.len(), "Tick complete");
        Ok(TickSnapshot::new(t, self.world.clone(), events))
    }
}

fn descriptions(records: &[MemoryRecord]) -> Vec<String> {
    records.iter().map(|r| r.description.clone()).collect()
}

/// Score, store, and (except for plans) feed the reflection trigger.
fn remember(
    prompter: &mut Prompter<'_>,
    mind: &mut AgentMind,
    text: &str,
    tick: Tick,
    kind: MemoryKind,
    links: Vec<String>,
) {
    let importance = prompter.importance(text, kind);
    mind.memory.append(text, tick, importance, kind, links);
    if kind != MemoryKind::Plan {
        mind.trigger.record_importance(importance);
    }
}

/// Replace the agent's hierarchy with a fresh one starting at `tick`.
fn rebuild_plan(
    prompter: &mut Prompter<'_>,
    mind: &mut AgentMind,
    agent: &AgentState,
    tick: Tick,
    context: Option<&str>,
    shape: PlanShape,
) {
    mind.generation += 1;
    let day = prompter.day_plan(
        &agent.agent_id,
        &agent.name,
        tick,
        context,
        &agent.patrol_route,
        mind.generation,
    );
    for item in &day {
        remember(prompter, mind, &item.description, tick, MemoryKind::Plan, Vec::new());
    }
    let plan = prompter.hierarchy(&agent.agent_id, day, shape, mind.generation);
    tracing::info!(
        agent = %agent.agent_id,
        tick,
        generation = mind.generation,
        items = plan.day.len(),
        reaction = context.is_some(),
        "Built day plan"
    );
    mind.plan = Some(plan);
}

/// Drive `simulation` one tick per `next()`.
///
/// `ticks = None` runs without bound. After a fatal error the runner yields
/// that error once and then stops.
pub fn run_ticks(simulation: Simulation, ticks: Option<u64>) -> TickRunner {
    TickRunner {
        simulation,
        remaining: ticks,
        failed: false,
    }
}

pub struct TickRunner {
    simulation: Simulation,
    remaining: Option<u64>,
    failed: bool,
}

impl TickRunner {
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn into_simulation(self) -> Simulation {
        self.simulation
    }
}

impl Iterator for TickRunner {
    type Item = Result<TickSnapshot, TickError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == Some(0) {
            return None;
        }
        if let Some(n) = self.remaining.as_mut() {
            *n -= 1;
        }
        let result = self.simulation.step();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl FusedIterator for TickRunner {}
