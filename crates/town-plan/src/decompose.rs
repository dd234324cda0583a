use town_core::Tick;

use crate::{PlanItem, PlanLevel};

/// Split each parent into consecutive chunks of at most `chunk_size` ticks.
///
/// Child ids extend the parent id (`"{parent}.{n}"`). Parent links are then
/// computed from tick ranges with [`assign_parents`].
pub fn decompose(parents: &[PlanItem], chunk_size: Tick, level: PlanLevel) -> Vec<PlanItem> {
    let chunk_size = chunk_size.max(1);
    let mut children = Vec::new();
    for parent in parents {
        let mut current = parent.start_tick;
        let mut n = 0usize;
        while current < parent.end_tick {
            let end = current.saturating_add(chunk_size).min(parent.end_tick);
            children.push(PlanItem {
                id: format!("{}.{n}", parent.id),
                start_tick: current,
                end_tick: end,
                location: parent.location.clone(),
                description: parent.description.clone(),
                level,
                parent_id: None,
            });
            current = end;
            n += 1;
        }
    }
    assign_parents(&mut children, parents);
    children
}

/// Point every child at the first parent whose range encloses it, or `None`.
pub fn assign_parents(children: &mut [PlanItem], parents: &[PlanItem]) {
    for child in children.iter_mut() {
        child.parent_id = parents
            .iter()
            .find(|p| p.encloses(child))
            .map(|p| p.id.clone());
    }
}

/// The item whose half-open range contains `tick`.
pub fn active_item(items: &[PlanItem], tick: Tick) -> Option<&PlanItem> {
    items.iter().find(|item| item.contains_tick(tick))
}

/// Whether `items` tile `[start, end)` exactly: sorted, gap-free, no overlap,
/// and every item at least one tick long.
pub fn covers_range(items: &[PlanItem], start: Tick, end: Tick) -> bool {
    let mut cursor = start;
    for item in items {
        if item.start_tick != cursor || item.end_tick <= item.start_tick {
            return false;
        }
        cursor = item.end_tick;
    }
    cursor == end
}
