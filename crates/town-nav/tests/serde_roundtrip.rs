#![cfg(feature = "serde")]

use std::collections::BTreeSet;

use town_core::Tile;
use town_nav::{AreaLayout, Bounds, TileGrid};

fn walled_yard() -> TileGrid {
    let mut grid = TileGrid::from_lines(&["#######", "#..#..#", "#..+..#", "#######"]);
    grid.set_occupied(Tile::new(1, 1), true);
    grid
}

#[test]
fn tile_grid_roundtrips_via_serde() {
    let grid = walled_yard();

    let json = serde_json::to_string(&grid).expect("serialize grid");
    let grid2: TileGrid = serde_json::from_str(&json).expect("deserialize grid");

    assert_eq!(grid, grid2);
    assert!(grid2.is_occupied(Tile::new(1, 1)));

    let start = Tile::new(1, 2);
    let goal = Tile::new(5, 1);
    let none = BTreeSet::new();
    let path1 = grid.find_path(start, goal, &none);
    let path2 = grid2.find_path(start, goal, &none);
    assert!(!path1.is_empty());
    assert_eq!(path1, path2);
}

#[test]
fn area_layout_roundtrips_via_serde() {
    let layout: AreaLayout = [
        ("west".to_string(), Bounds::new(0, 0, 3, 4)),
        ("east".to_string(), Bounds::new(3, 0, 4, 4)),
        ("nook".to_string(), Bounds::new(4, 1, 1, 1)),
    ]
    .into_iter()
    .collect();

    let json = serde_json::to_string(&layout).expect("serialize layout");
    let layout2: AreaLayout = serde_json::from_str(&json).expect("deserialize layout");

    assert_eq!(layout, layout2);
    assert_eq!(layout2.area_at(Tile::new(4, 1)), Some("nook"));
    assert_eq!(layout2.bounds("west"), Some(Bounds::new(0, 0, 3, 4)));
}
