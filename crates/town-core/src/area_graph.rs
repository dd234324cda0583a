use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::WorldTree;

/// Explicit inter-area links: area id -> (portal label -> destination area id).
pub type Portals = BTreeMap<String, BTreeMap<String, String>>;

/// Undirected adjacency between area-typed nodes.
///
/// Edges come from containment (area inside area) and from portals. Both are
/// treated as undirected for reachability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl AreaGraph {
    pub fn build(world: &WorldTree, portals: &Portals) -> Self {
        let mut graph = Self::default();
        for node in world.nodes().filter(|n| n.kind().is_area()) {
            graph.edges.entry(node.id().to_string()).or_default();
            let Some(parent_id) = node.parent_id() else {
                continue;
            };
            if world.node(parent_id).is_some_and(|p| p.kind().is_area()) {
                graph.link(node.id(), parent_id);
            }
        }
        for (area_id, links) in portals {
            for destination in links.values() {
                graph.link(area_id, destination);
            }
        }
        graph
    }

    fn link(&mut self, a: &str, b: &str) {
        self.edges
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.edges
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    pub fn contains(&self, area_id: &str) -> bool {
        self.edges.contains_key(area_id)
    }

    pub fn neighbors(&self, area_id: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(area_id)
            .into_iter()
            .flat_map(|n| n.iter().map(String::as_str))
    }

    /// Breadth-first reachability from `start`, including `start` itself.
    ///
    /// Neighbors are visited in sorted-id order; the returned vector is in
    /// visit order.
    pub fn reachable_from(&self, start: &str) -> Vec<String> {
        if !self.contains(start) {
            return Vec::new();
        }
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        seen.insert(start.to_string());
        queue.push_back(start.to_string());
        while let Some(current) = queue.pop_front() {
            for n in self.neighbors(&current) {
                if seen.insert(n.to_string()) {
                    queue.push_back(n.to_string());
                }
            }
            order.push(current);
        }
        order
    }
}
