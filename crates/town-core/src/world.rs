use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::WorldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Area,
    SubArea,
    Object,
    Agent,
}

impl NodeKind {
    /// Areas and sub-areas are both "area-typed" for containment and resolution.
    pub fn is_area(self) -> bool {
        matches!(self, NodeKind::Area | NodeKind::SubArea)
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Agent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldNode {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    parent_id: Option<String>,
    children: Vec<String>,
}

impl WorldNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parent_id: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }
}

/// Ownership hierarchy of areas, sub-areas, objects and agents.
///
/// Parent links and child lists are kept in sync by construction: nodes are
/// attached once through [`WorldTree::attach`] while the world is built, and
/// afterwards [`WorldTree::move_agent`] is the only mutation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldTree {
    root_id: String,
    nodes: BTreeMap<String, WorldNode>,
}

impl WorldTree {
    /// Create a tree holding only its root area.
    pub fn new(root: WorldNode) -> Self {
        let root_id = root.id.clone();
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id.clone(), root);
        Self { root_id, nodes }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn node(&self, id: &str) -> Option<&WorldNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in sorted-id order.
    pub fn nodes(&self) -> impl Iterator<Item = &WorldNode> {
        self.nodes.values()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &WorldNode> {
        self.nodes.values().filter(move |n| n.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    /// Direct children of `parent_id` with the given kind, in child-list order.
    pub fn children_of_kind<'a>(
        &'a self,
        parent_id: &str,
        kind: NodeKind,
    ) -> impl Iterator<Item = &'a WorldNode> + 'a {
        self.nodes
            .get(parent_id)
            .map(|p| p.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |c| self.nodes.get(c))
            .filter(move |n| n.kind == kind)
    }

    /// Display name of the area holding `node_id`, falling back to the raw id.
    pub fn area_name(&self, node_id: &str) -> String {
        match self.resolve_area(node_id) {
            Ok(Some(area)) => self.name_of(area).unwrap_or(area).to_string(),
            _ => node_id.to_string(),
        }
    }

    /// Insert `node` as the last child of `parent_id`.
    pub fn attach(&mut self, node: WorldNode, parent_id: &str) -> Result<(), WorldError> {
        if self.nodes.contains_key(&node.id) {
            return Err(WorldError::DuplicateNode(node.id));
        }
        let parent = self
            .nodes
            .get(parent_id)
            .ok_or_else(|| WorldError::UnknownNode(parent_id.to_string()))?;
        check_nesting(&node, parent)?;

        let mut node = node;
        node.parent_id = Some(parent_id.to_string());
        node.children.clear();
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(id);
        }
        Ok(())
    }

    /// Walk parent links until an area-typed node is found.
    ///
    /// Returns `Ok(None)` when the chain reaches the root without an area.
    /// A dangling parent link or a cycle is a fatal configuration error.
    pub fn resolve_area(&self, node_id: &str) -> Result<Option<&str>, WorldError> {
        let mut current = node_id;
        let mut steps = 0usize;
        loop {
            let node = self
                .nodes
                .get(current)
                .ok_or_else(|| WorldError::BrokenChain {
                    from: node_id.to_string(),
                    missing: current.to_string(),
                })?;
            if node.kind.is_area() {
                return Ok(Some(node.id.as_str()));
            }
            let Some(parent) = node.parent_id.as_deref() else {
                return Ok(None);
            };
            steps += 1;
            if steps > self.nodes.len() {
                return Err(WorldError::Cycle(node_id.to_string()));
            }
            current = parent;
        }
    }

    /// Re-parent an agent. Both sides of the link change together; all
    /// checks run before anything is touched.
    pub fn move_agent(&mut self, agent_id: &str, new_parent_id: &str) -> Result<(), WorldError> {
        let agent = self
            .nodes
            .get(agent_id)
            .ok_or_else(|| WorldError::UnknownNode(agent_id.to_string()))?;
        if agent.kind != NodeKind::Agent {
            return Err(WorldError::NotAnAgent(agent_id.to_string()));
        }
        let new_parent = self
            .nodes
            .get(new_parent_id)
            .ok_or_else(|| WorldError::UnknownNode(new_parent_id.to_string()))?;
        if !new_parent.kind.is_area() {
            return Err(WorldError::NotAnArea(new_parent_id.to_string()));
        }
        let old_parent_id = agent.parent_id.clone();
        if old_parent_id.as_deref() == Some(new_parent_id) {
            return Ok(());
        }
        if let Some(old) = old_parent_id.as_deref() {
            if !self.nodes.contains_key(old) {
                return Err(WorldError::BrokenChain {
                    from: agent_id.to_string(),
                    missing: old.to_string(),
                });
            }
        }

        if let Some(old) = old_parent_id.as_deref().and_then(|id| self.nodes.get_mut(id)) {
            old.children.retain(|c| c != agent_id);
        }
        if let Some(parent) = self.nodes.get_mut(new_parent_id) {
            if !parent.children.iter().any(|c| c == agent_id) {
                parent.children.push(agent_id.to_string());
            }
        }
        if let Some(agent) = self.nodes.get_mut(agent_id) {
            agent.parent_id = Some(new_parent_id.to_string());
        }
        Ok(())
    }

    /// Check every ownership invariant: rooted, loop-free, links agree in
    /// both directions, and nesting rules hold.
    pub fn validate(&self) -> Result<(), WorldError> {
        let root = self
            .nodes
            .get(&self.root_id)
            .ok_or_else(|| WorldError::UnknownNode(self.root_id.clone()))?;
        if root.parent_id.is_some() {
            return Err(WorldError::RootHasParent(self.root_id.clone()));
        }
        if !root.kind.is_area() {
            return Err(WorldError::NotAnArea(self.root_id.clone()));
        }

        for (key, node) in &self.nodes {
            if key != &node.id {
                return Err(WorldError::KeyMismatch {
                    key: key.clone(),
                    id: node.id.clone(),
                });
            }
            match node.parent_id.as_deref() {
                None if node.id != self.root_id => {
                    return Err(WorldError::Orphan(node.id.clone()));
                }
                None => {}
                Some(parent_id) => {
                    let parent = self.nodes.get(parent_id).ok_or_else(|| {
                        WorldError::BrokenChain {
                            from: node.id.clone(),
                            missing: parent_id.to_string(),
                        }
                    })?;
                    check_nesting(node, parent)?;
                    let listed = parent.children.iter().filter(|c| **c == node.id).count();
                    if listed != 1 {
                        return Err(WorldError::LinkMismatch {
                            child: node.id.clone(),
                            parent: parent_id.to_string(),
                        });
                    }
                }
            }
            for child_id in &node.children {
                let child = self.nodes.get(child_id).ok_or_else(|| WorldError::BrokenChain {
                    from: node.id.clone(),
                    missing: child_id.clone(),
                })?;
                if child.parent_id.as_deref() != Some(node.id.as_str()) {
                    return Err(WorldError::LinkMismatch {
                        child: child_id.clone(),
                        parent: node.id.clone(),
                    });
                }
            }
        }

        // Every node must be reachable from the root exactly once.
        let mut seen = BTreeSet::new();
        let mut stack = vec![self.root_id.as_str()];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(WorldError::Cycle(id.to_string()));
            }
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().map(String::as_str));
            }
        }
        if seen.len() != self.nodes.len() {
            let stray = self
                .nodes
                .keys()
                .find(|k| !seen.contains(k.as_str()))
                .cloned()
                .unwrap_or_default();
            return Err(WorldError::Cycle(stray));
        }
        Ok(())
    }
}

fn check_nesting(node: &WorldNode, parent: &WorldNode) -> Result<(), WorldError> {
    if !parent.kind.is_area() {
        return Err(WorldError::InvalidNesting {
            child: node.id.clone(),
            parent: parent.id.clone(),
        });
    }
    if node.kind == NodeKind::Area && parent.kind == NodeKind::SubArea {
        return Err(WorldError::InvalidNesting {
            child: node.id.clone(),
            parent: parent.id.clone(),
        });
    }
    Ok(())
}
