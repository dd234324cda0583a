//! Tile grid, A* pathfinding, and area layout for agent movement.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod grid;
pub mod layout;
pub mod movement;

pub use grid::{TileGrid, WALKABLE_TILES};
pub use layout::{AreaLayout, Bounds};
pub use movement::{
    advance_movement, representative_tile, spawn_tile, start_move, MoveContext,
};
