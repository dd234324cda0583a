//! Tile-level movement: one tile per tick, re-parenting through the world tree.

use std::collections::BTreeSet;

use town_core::{AgentState, Event, EventKind, Tile, Travel, WorldError, WorldTree};

use crate::{Bounds, TileGrid};

fn usable(grid: &TileGrid, tile: Tile, blocked: &BTreeSet<Tile>) -> bool {
    grid.is_walkable(tile) && !blocked.contains(&tile)
}

/// First walkable, unblocked interior tile in row-major order.
pub fn spawn_tile(grid: &TileGrid, bounds: Bounds, blocked: &BTreeSet<Tile>) -> Tile {
    bounds
        .interior_tiles()
        .find(|t| usable(grid, *t, blocked))
        .unwrap_or_else(|| bounds.interior_origin())
}

/// Walkable tile closest to the bounds' center; ties by row, then column.
pub fn representative_tile(grid: &TileGrid, bounds: Bounds, blocked: &BTreeSet<Tile>) -> Tile {
    let center = bounds.center();
    bounds
        .tiles()
        .filter(|t| usable(grid, *t, blocked))
        .min_by_key(|t| (t.manhattan(center), t.y, t.x))
        .unwrap_or_else(|| bounds.interior_origin())
}

/// Everything movement needs to turn an area id into tiles.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub grid: &'a TileGrid,
    pub layout: &'a crate::AreaLayout,
    pub blocked: &'a BTreeSet<Tile>,
}

/// Request a move to `destination`. Returns whether a path was stored.
///
/// Already being in the destination, having a path in flight, an unbounded
/// destination, or an empty path all leave the agent untouched.
pub fn start_move(agent: &mut AgentState, destination: &str, ctx: MoveContext<'_>) -> bool {
    if agent.location_id == destination || agent.is_traveling() {
        return false;
    }
    let Some(bounds) = ctx.layout.bounds(destination) else {
        tracing::debug!(agent = %agent.agent_id, destination, "Destination has no bounds");
        return false;
    };
    let goal = representative_tile(ctx.grid, bounds, ctx.blocked);
    let path = ctx.grid.find_path(agent.position, goal, ctx.blocked);
    if path.is_empty() {
        tracing::debug!(
            agent = %agent.agent_id,
            destination,
            from = ?agent.position,
            to = ?goal,
            "No path; move not started"
        );
        return false;
    }
    agent.path = path.into();
    agent.travel = Some(Travel {
        origin: agent.location_id.clone(),
        destination: destination.to_string(),
    });
    true
}

/// Step one tile along the stored path.
///
/// Crossing into a different bounded area re-parents the agent. When the
/// path runs out, the recorded travel pair becomes a `MOVE` event.
pub fn advance_movement(
    agent: &mut AgentState,
    world: &mut WorldTree,
    layout: &crate::AreaLayout,
) -> Result<Option<Event>, WorldError> {
    let Some(next) = agent.path.pop_front() else {
        return Ok(None);
    };
    agent.position = next;

    if let Some(area) = layout.area_at(next) {
        if area != agent.location_id {
            world.move_agent(&agent.agent_id, area)?;
            agent.location_id = area.to_string();
        }
    }

    if !agent.path.is_empty() {
        return Ok(None);
    }
    Ok(agent.travel.take().map(|travel| {
        Event::new(EventKind::Move)
            .with("agent_id", agent.agent_id.as_str())
            .with("from", travel.origin)
            .with("to", travel.destination)
    }))
}
