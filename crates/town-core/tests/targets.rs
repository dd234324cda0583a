use std::collections::BTreeMap;

use serde_json::json;
use town_core::{
    build_valid_targets, Action, AreaGraph, InteractVerb, NodeKind, Portals, WorldNode, WorldTree,
};

fn world() -> WorldTree {
    let mut w = WorldTree::new(WorldNode::new("world", "World", NodeKind::Area));
    for (id, name) in [("cafe", "Cafe"), ("park", "Park"), ("street", "Street")] {
        w.attach(WorldNode::new(id, name, NodeKind::Area), "world")
            .unwrap();
    }
    w.attach(WorldNode::new("bench", "Bench", NodeKind::Object), "park")
        .unwrap();
    w.attach(WorldNode::new("lamp", "Lamp", NodeKind::Object), "street")
        .unwrap();
    w.attach(WorldNode::new("ada", "Ada", NodeKind::Agent), "street")
        .unwrap();
    w.attach(WorldNode::new("byron", "Byron", NodeKind::Agent), "street")
        .unwrap();
    w.attach(WorldNode::new("cleo", "Cleo", NodeKind::Agent), "park")
        .unwrap();
    w
}

#[test]
fn targets_collect_reachable_areas_and_colocated_entities() {
    let w = world();
    let graph = AreaGraph::build(&w, &Portals::new());
    let targets = build_valid_targets(&w, &graph, "ada").unwrap();

    let locations: Vec<_> = targets.locations.iter().map(String::as_str).collect();
    assert_eq!(locations, vec!["cafe", "park", "street", "world"]);
    assert_eq!(targets.objects.iter().collect::<Vec<_>>(), vec!["lamp"]);
    assert_eq!(targets.agents.iter().collect::<Vec<_>>(), vec!["byron"]);
}

#[test]
fn portals_connect_otherwise_disjoint_areas() {
    let mut w = WorldTree::new(WorldNode::new("root", "Root", NodeKind::Area));
    w.attach(WorldNode::new("a", "A", NodeKind::Area), "root").unwrap();
    w.attach(WorldNode::new("a1", "A1", NodeKind::SubArea), "a").unwrap();
    w.attach(WorldNode::new("b", "B", NodeKind::Area), "root").unwrap();

    let mut portals = Portals::new();
    portals.insert(
        "a1".to_string(),
        BTreeMap::from([("door".to_string(), "b".to_string())]),
    );
    let graph = AreaGraph::build(&w, &portals);

    assert!(graph.neighbors("b").any(|n| n == "a1"));
    assert_eq!(graph.reachable_from("a1"), vec!["a1", "a", "b", "root"]);
}

#[test]
fn out_of_scope_references_coerce_to_idle() {
    let w = world();
    let graph = AreaGraph::build(&w, &Portals::new());
    let targets = build_valid_targets(&w, &graph, "ada").unwrap();

    let mv = Action::Move {
        to: "moon".to_string(),
    };
    assert_eq!(mv.coerce(&targets), Action::Idle);

    let interact = Action::Interact {
        object_id: "bench".to_string(),
        verb: InteractVerb::Use,
    };
    assert_eq!(interact.coerce(&targets), Action::Idle);

    let say = Action::Say {
        to_agent_id: "byron".to_string(),
        utterance: "hi".to_string(),
    };
    assert_eq!(say.clone().coerce(&targets), say);
}

#[test]
fn action_schema_requires_matching_argument_block() {
    let ok = json!({"kind": "MOVE", "move": {"to_location_id": "park"}});
    assert_eq!(
        Action::from_json(&ok),
        Some(Action::Move {
            to: "park".to_string()
        })
    );

    let mixed = json!({"kind": "MOVE", "say": {"to_agent_id": "b", "utterance": "x"}});
    assert_eq!(Action::from_json(&mixed), None);

    let idle_with_args = json!({"kind": "IDLE", "move": {"to_location_id": "park"}});
    assert_eq!(Action::from_json(&idle_with_args), None);

    let unknown_field = json!({"kind": "IDLE", "why": "tired"});
    assert_eq!(Action::from_json(&unknown_field), None);

    let bad_verb = json!({"kind": "INTERACT", "interact": {"object_id": "lamp", "verb": "EAT"}});
    assert_eq!(Action::from_json(&bad_verb), None);

    let say = Action::Say {
        to_agent_id: "byron".to_string(),
        utterance: "hello".to_string(),
    };
    assert_eq!(Action::from_json(&say.to_json()), Some(say));
}
