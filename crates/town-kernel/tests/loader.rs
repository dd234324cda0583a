mod common;

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use town_core::{NodeKind, Tile};
use town_kernel::{load_world, LoadError};

use common::{two_characters, two_room_dir, two_room_world, write_world, MAP};

fn load_with(world: serde_json::Value, characters: serde_json::Value) -> Result<(), LoadError> {
    let dir = TempDir::new().unwrap();
    write_world(dir.path(), &world, &characters, MAP);
    load_world(dir.path()).map(|_| ())
}

#[test]
fn loads_rooms_agents_and_grid() {
    let dir = two_room_dir();
    let loaded = load_world(dir.path()).unwrap();

    assert_eq!(loaded.world.root_id(), "world");
    assert_eq!(loaded.world.node("x").unwrap().kind(), NodeKind::Area);
    assert_eq!(loaded.world.node("ada").unwrap().parent_id(), Some("x"));
    assert_eq!(loaded.grid.width(), 5);
    assert_eq!(loaded.grid.height(), 3);

    let ada = &loaded.agents["ada"];
    assert_eq!(ada.location_id, "x");
    assert_eq!(ada.position, Tile::new(1, 1));
    assert_eq!(ada.patrol_route, vec!["x".to_string()]);
    assert!(loaded.world.validate().is_ok());
}

#[test]
fn default_names_are_title_cased() {
    let world = json!({
        "rooms": [
            { "id": "town_square", "bounds": { "x": 0, "y": 0, "width": 2, "height": 3 } },
            { "id": "y", "bounds": { "x": 3, "y": 0, "width": 2, "height": 3 } }
        ]
    });
    let characters = json!({ "characters": [{ "id": "ada", "start_room_id": "town_square" }] });
    let dir = TempDir::new().unwrap();
    write_world(dir.path(), &world, &characters, MAP);

    let loaded = load_world(dir.path()).unwrap();
    assert_eq!(loaded.world.name_of("town_square"), Some("Town_Square"));
    assert_eq!(loaded.world.name_of("ada"), Some("Ada"));
}

#[test]
fn nested_rooms_become_sub_areas() {
    let world = json!({
        "rooms": [
            { "id": "closet", "parent_id": "x", "bounds": { "x": 1, "y": 1, "width": 1, "height": 1 } },
            { "id": "x", "bounds": { "x": 0, "y": 0, "width": 2, "height": 3 } }
        ]
    });
    let dir = TempDir::new().unwrap();
    write_world(dir.path(), &world, &json!({}), MAP);

    let loaded = load_world(dir.path()).unwrap();
    assert_eq!(loaded.world.node("closet").unwrap().kind(), NodeKind::SubArea);
    assert_eq!(loaded.world.node("closet").unwrap().parent_id(), Some("x"));
}

#[test]
fn objects_are_placed_by_room_or_position() {
    let mut world = two_room_world();
    world["objects"] = json!([
        { "id": "bench", "room_id": "y" },
        { "id": "lamp", "name": "Old Lamp", "position": { "x": 1, "y": 1 } }
    ]);
    let dir = TempDir::new().unwrap();
    write_world(dir.path(), &world, &json!({ "characters": [] }), MAP);

    let loaded = load_world(dir.path()).unwrap();
    assert_eq!(loaded.world.node("bench").unwrap().parent_id(), Some("y"));
    assert_eq!(loaded.world.node("lamp").unwrap().parent_id(), Some("x"));
    assert_eq!(loaded.world.name_of("lamp"), Some("Old Lamp"));
    assert!(loaded.grid.is_occupied(Tile::new(1, 1)));
    assert!(!loaded.grid.is_walkable(Tile::new(1, 1)));
}

#[test]
fn portals_are_kept_per_room() {
    let mut world = two_room_world();
    world["rooms"][0]["portals"] = json!({ "east door": "y" });
    let dir = TempDir::new().unwrap();
    write_world(dir.path(), &world, &two_characters(), MAP);

    let loaded = load_world(dir.path()).unwrap();
    assert_eq!(loaded.portals["x"]["east door"], "y");
}

#[test]
fn rejects_dangling_portal() {
    let mut world = two_room_world();
    world["rooms"][0]["portals"] = json!({ "trapdoor": "cellar" });
    let err = load_with(world, two_characters()).unwrap_err();
    assert!(matches!(err, LoadError::DanglingPortal { target, .. } if target == "cellar"));
}

#[test]
fn rejects_duplicate_ids() {
    let characters = json!({ "characters": [{ "id": "x", "start_room_id": "y" }] });
    let err = load_with(two_room_world(), characters).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateId(id) if id == "x"));
}

#[test]
fn rejects_unknown_start_and_patrol_rooms() {
    let characters = json!({ "characters": [{ "id": "ada", "start_room_id": "attic" }] });
    let err = load_with(two_room_world(), characters).unwrap_err();
    assert!(matches!(err, LoadError::UnknownStartRoom { room, .. } if room == "attic"));

    let characters = json!({
        "characters": [{ "id": "ada", "start_room_id": "x", "patrol_route": ["x", "attic"] }]
    });
    let err = load_with(two_room_world(), characters).unwrap_err();
    assert!(matches!(err, LoadError::UnknownPatrolRoom { room, .. } if room == "attic"));
}

#[test]
fn rejects_unknown_parent_and_cycles() {
    let world = json!({
        "rooms": [{ "id": "x", "parent_id": "nowhere", "bounds": { "x": 0, "y": 0, "width": 2, "height": 3 } }]
    });
    let err = load_with(world, json!({})).unwrap_err();
    assert!(matches!(err, LoadError::UnknownParent { parent, .. } if parent == "nowhere"));

    let world = json!({
        "rooms": [
            { "id": "a", "parent_id": "b", "bounds": { "x": 0, "y": 0, "width": 2, "height": 3 } },
            { "id": "b", "parent_id": "a", "bounds": { "x": 3, "y": 0, "width": 2, "height": 3 } }
        ]
    });
    let err = load_with(world, json!({})).unwrap_err();
    assert!(matches!(err, LoadError::RoomCycle(_)));
}

#[test]
fn rejects_objects_outside_rooms() {
    let mut world = two_room_world();
    world["objects"] = json!([{ "id": "rock", "position": { "x": 2, "y": 1 } }]);
    let err = load_with(world, json!({})).unwrap_err();
    assert!(matches!(err, LoadError::ObjectOutsideRooms(id) if id == "rock"));
}

#[test]
fn reports_missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let err = load_world(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));

    std::fs::write(dir.path().join("world.json"), "{ not json").unwrap();
    std::fs::write(dir.path().join("characters.json"), "{}").unwrap();
    let err = load_world(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
}

#[test]
fn demo_town_loads() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../worlds/town");
    let loaded = load_world(&dir).unwrap();
    assert!(loaded.agents.len() >= 2);
    assert!(loaded.world.validate().is_ok());
    for agent in loaded.agents.values() {
        assert_eq!(loaded.layout.area_at(agent.position), Some(agent.location_id.as_str()));
    }
}

#[test]
fn rejects_object_positioned_outside_its_room() {
    let mut world = two_room_world();
    world["objects"] = json!([{ "id": "crate", "room_id": "y", "position": { "x": 1, "y": 1 } }]);
    let err = load_with(world, json!({})).unwrap_err();
    assert!(
        matches!(err, LoadError::ObjectOutsideRoom { object, room } if object == "crate" && room == "y")
    );

    let mut world = two_room_world();
    world["objects"] = json!([{ "id": "crate", "room_id": "y", "position": { "x": 3, "y": 1 } }]);
    let dir = TempDir::new().unwrap();
    write_world(dir.path(), &world, &json!({}), MAP);
    let loaded = load_world(dir.path()).unwrap();
    assert_eq!(loaded.world.node("crate").unwrap().parent_id(), Some("y"));
    assert!(loaded.grid.is_occupied(Tile::new(3, 1)));
}
