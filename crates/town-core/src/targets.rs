use std::collections::BTreeSet;

use crate::{AreaGraph, NodeKind, WorldError, WorldTree};

/// Tick-scoped ids an agent's action may legally reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidTargets {
    pub locations: BTreeSet<String>,
    pub objects: BTreeSet<String>,
    pub agents: BTreeSet<String>,
}

/// Compute the targets for `agent_id` against a world snapshot.
///
/// Locations are every area reachable from the agent's area in `graph`.
/// Objects and agents must resolve to the same area as the agent.
pub fn build_valid_targets(
    world: &WorldTree,
    graph: &AreaGraph,
    agent_id: &str,
) -> Result<ValidTargets, WorldError> {
    let Some(area) = world.resolve_area(agent_id)? else {
        return Ok(ValidTargets::default());
    };

    let mut targets = ValidTargets {
        locations: graph.reachable_from(area).into_iter().collect(),
        ..ValidTargets::default()
    };

    for node in world.nodes() {
        let bucket = match node.kind() {
            NodeKind::Object => &mut targets.objects,
            NodeKind::Agent if node.id() != agent_id => &mut targets.agents,
            _ => continue,
        };
        if world.resolve_area(node.id())? == Some(area) {
            bucket.insert(node.id().to_string());
        }
    }
    Ok(targets)
}
