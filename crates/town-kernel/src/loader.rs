//! World loading from a directory of JSON files plus an ASCII map.
//!
//! ```text
//! <dir>/world.json       map_file, rooms[], objects[]
//! <dir>/characters.json  characters[]
//! <dir>/<map_file>       one line per grid row
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use town_core::{AgentState, NodeKind, Portals, Tile, WorldError, WorldNode, WorldTree};
use town_nav::{spawn_tile, AreaLayout, Bounds, TileGrid};

pub const ROOT_ID: &str = "world";
pub const WORLD_FILE: &str = "world.json";
pub const CHARACTERS_FILE: &str = "characters.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate id `{0}`")]
    DuplicateId(String),

    #[error("room `{room}` names unknown parent `{parent}`")]
    UnknownParent { room: String, parent: String },

    #[error("rooms form a parent cycle through `{0}`")]
    RoomCycle(String),

    #[error("portal `{label}` in room `{room}` leads to unknown room `{target}`")]
    DanglingPortal {
        room: String,
        label: String,
        target: String,
    },

    #[error("object `{0}` is not inside any room")]
    ObjectOutsideRooms(String),

    #[error("object `{object}` is positioned outside its room `{room}`")]
    ObjectOutsideRoom { object: String, room: String },

    #[error("object `{object}` names unknown room `{room}`")]
    UnknownObjectRoom { object: String, room: String },

    #[error("character `{character}` starts in undefined room `{room}`")]
    UnknownStartRoom { character: String, room: String },

    #[error("character `{character}` patrols undefined room `{room}`")]
    UnknownPatrolRoom { character: String, room: String },

    #[error(transparent)]
    World(#[from] WorldError),
}

#[derive(Debug, Deserialize)]
struct WorldFile {
    #[serde(default = "default_map_file")]
    map_file: String,
    #[serde(default)]
    rooms: Vec<RoomDef>,
    #[serde(default)]
    objects: Vec<ObjectDef>,
}

fn default_map_file() -> String {
    "world.map".to_string()
}

#[derive(Debug, Deserialize)]
struct RoomDef {
    id: String,
    name: Option<String>,
    bounds: Bounds,
    parent_id: Option<String>,
    #[serde(default)]
    portals: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ObjectDef {
    id: String,
    name: Option<String>,
    room_id: Option<String>,
    position: Option<Tile>,
}

#[derive(Debug, Default, Deserialize)]
struct CharactersFile {
    #[serde(default)]
    characters: Vec<CharacterDef>,
}

#[derive(Debug, Deserialize)]
struct CharacterDef {
    id: String,
    name: Option<String>,
    start_room_id: String,
    #[serde(default)]
    patrol_route: Vec<String>,
}

/// Everything the simulation needs, built and validated.
#[derive(Debug, Clone)]
pub struct LoadedWorld {
    pub world: WorldTree,
    pub grid: TileGrid,
    pub layout: AreaLayout,
    pub portals: Portals,
    pub agents: BTreeMap<String, AgentState>,
}

/// `"town_square"` → `"Town_Square"`.
fn title_case(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut boundary = true;
    for c in id.chars() {
        if boundary {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        boundary = !c.is_alphanumeric();
    }
    out
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), LoadError> {
    let mut seen = BTreeSet::new();
    seen.insert(ROOT_ID);
    for id in ids {
        if !seen.insert(id) {
            return Err(LoadError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

/// Attach rooms parent-first. Rooms nested in another room become sub-areas.
fn attach_rooms(world: &mut WorldTree, rooms: &[RoomDef]) -> Result<(), LoadError> {
    let known: BTreeSet<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
    for room in rooms {
        if let Some(parent) = room.parent_id.as_deref() {
            if parent != ROOT_ID && !known.contains(parent) {
                return Err(LoadError::UnknownParent {
                    room: room.id.clone(),
                    parent: parent.to_string(),
                });
            }
        }
    }

    let mut pending: Vec<&RoomDef> = rooms.iter().collect();
    while !pending.is_empty() {
        let before = pending.len();
        let mut waiting = Vec::new();
        for room in pending {
            let parent = room.parent_id.as_deref().unwrap_or(ROOT_ID);
            if !world.contains(parent) {
                waiting.push(room);
                continue;
            }
            let kind = if parent == ROOT_ID {
                NodeKind::Area
            } else {
                NodeKind::SubArea
            };
            let name = room.name.clone().unwrap_or_else(|| title_case(&room.id));
            world.attach(WorldNode::new(room.id.as_str(), name, kind), parent)?;
        }
        if waiting.len() == before {
            return Err(LoadError::RoomCycle(waiting[0].id.clone()));
        }
        pending = waiting;
    }
    Ok(())
}

/// Load and validate the world stored in `dir`.
pub fn load_world(dir: &Path) -> Result<LoadedWorld, LoadError> {
    let world_file: WorldFile = read_json(&dir.join(WORLD_FILE))?;
    let characters: CharactersFile = read_json(&dir.join(CHARACTERS_FILE))?;

    let map_path = dir.join(&world_file.map_file);
    let map_text = std::fs::read_to_string(&map_path).map_err(|source| LoadError::Read {
        path: map_path.clone(),
        source,
    })?;
    let mut grid = TileGrid::from_text(&map_text);

    check_unique(
        world_file
            .rooms
            .iter()
            .map(|r| r.id.as_str())
            .chain(world_file.objects.iter().map(|o| o.id.as_str()))
            .chain(characters.characters.iter().map(|c| c.id.as_str())),
    )?;

    let mut world = WorldTree::new(WorldNode::new(ROOT_ID, "World", NodeKind::Area));
    attach_rooms(&mut world, &world_file.rooms)?;

    let layout: AreaLayout = world_file
        .rooms
        .iter()
        .map(|r| (r.id.clone(), r.bounds))
        .collect();

    let mut portals = Portals::new();
    for room in &world_file.rooms {
        for (label, target) in &room.portals {
            if layout.bounds(target).is_none() && target != ROOT_ID {
                return Err(LoadError::DanglingPortal {
                    room: room.id.clone(),
                    label: label.clone(),
                    target: target.clone(),
                });
            }
        }
        if !room.portals.is_empty() {
            portals.insert(room.id.clone(), room.portals.clone());
        }
    }

    for object in &world_file.objects {
        let room = match (&object.room_id, object.position) {
            (Some(room), position) => {
                let Some(bounds) = layout.bounds(room) else {
                    return Err(LoadError::UnknownObjectRoom {
                        object: object.id.clone(),
                        room: room.clone(),
                    });
                };
                if position.is_some_and(|pos| !bounds.contains(pos)) {
                    return Err(LoadError::ObjectOutsideRoom {
                        object: object.id.clone(),
                        room: room.clone(),
                    });
                }
                room.clone()
            }
            (None, Some(pos)) => layout
                .area_at(pos)
                .map(str::to_string)
                .ok_or_else(|| LoadError::ObjectOutsideRooms(object.id.clone()))?,
            (None, None) => return Err(LoadError::ObjectOutsideRooms(object.id.clone())),
        };
        if let Some(pos) = object.position {
            grid.set_occupied(pos, true);
        }
        let name = object.name.clone().unwrap_or_else(|| title_case(&object.id));
        world.attach(
            WorldNode::new(object.id.as_str(), name, NodeKind::Object),
            &room,
        )?;
    }

    let no_blocks = BTreeSet::new();
    let mut agents = BTreeMap::new();
    for character in &characters.characters {
        let Some(bounds) = layout.bounds(&character.start_room_id) else {
            return Err(LoadError::UnknownStartRoom {
                character: character.id.clone(),
                room: character.start_room_id.clone(),
            });
        };
        if let Some(room) = character
            .patrol_route
            .iter()
            .find(|r| layout.bounds(r).is_none())
        {
            return Err(LoadError::UnknownPatrolRoom {
                character: character.id.clone(),
                room: room.clone(),
            });
        }

        let name = character
            .name
            .clone()
            .unwrap_or_else(|| title_case(&character.id));
        world.attach(
            WorldNode::new(character.id.as_str(), name.as_str(), NodeKind::Agent),
            &character.start_room_id,
        )?;
        let spawn = spawn_tile(&grid, bounds, &no_blocks);
        let agent = AgentState::new(
            character.id.as_str(),
            name,
            character.start_room_id.as_str(),
            spawn,
        )
        .with_patrol_route(character.patrol_route.clone());
        agents.insert(character.id.clone(), agent);
    }

    world.validate()?;
    tracing::info!(
        dir = %dir.display(),
        rooms = world_file.rooms.len(),
        objects = world_file.objects.len(),
        agents = agents.len(),
        "Loaded world"
    );

    Ok(LoadedWorld {
        world,
        grid,
        layout,
        portals,
        agents,
    })
}
