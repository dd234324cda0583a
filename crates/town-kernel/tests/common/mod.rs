#![allow(dead_code)]

use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;

pub const MAP: &str = "#####\n#.+.#\n#####\n";

/// Two rooms joined by a door tile; `ada` and `bo` both start in `x`.
pub fn two_room_world() -> Value {
    json!({
        "rooms": [
            { "id": "x", "name": "X", "bounds": { "x": 0, "y": 0, "width": 2, "height": 3 } },
            { "id": "y", "name": "Y", "bounds": { "x": 3, "y": 0, "width": 2, "height": 3 } }
        ]
    })
}

pub fn two_characters() -> Value {
    json!({
        "characters": [
            { "id": "ada", "name": "Ada", "start_room_id": "x" },
            { "id": "bo", "name": "Bo", "start_room_id": "x" }
        ]
    })
}

pub fn write_world(dir: &Path, world: &Value, characters: &Value, map: &str) {
    std::fs::write(dir.join("world.json"), world.to_string()).unwrap();
    std::fs::write(dir.join("characters.json"), characters.to_string()).unwrap();
    std::fs::write(dir.join("world.map"), map).unwrap();
}

pub fn two_room_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_world(dir.path(), &two_room_world(), &two_characters(), MAP);
    dir
}
