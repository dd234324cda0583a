use std::collections::BTreeSet;

use town_core::Tile;
use town_nav::TileGrid;

fn open(width: usize, height: usize) -> TileGrid {
    let row = ".".repeat(width);
    let lines = vec![row; height];
    TileGrid::from_lines(&lines)
}

#[test]
fn same_tile_yields_empty_path() {
    let grid = open(4, 4);
    let a = Tile::new(1, 1);
    assert!(grid.find_path(a, a, &BTreeSet::new()).is_empty());
}

#[test]
fn solid_wall_yields_empty_path() {
    let grid = TileGrid::from_lines(&["..#..", "..#..", "..#.."]);
    let path = grid.find_path(Tile::new(0, 1), Tile::new(4, 1), &BTreeSet::new());
    assert!(path.is_empty());
}

#[test]
fn path_routes_through_gap_and_excludes_start() {
    // Vertical wall with a single gap at y = 2.
    let grid = TileGrid::from_lines(&["..#..", "..#..", ".....", "..#..", "..#.."]);
    let start = Tile::new(0, 0);
    let goal = Tile::new(4, 4);
    let path = grid.find_path(start, goal, &BTreeSet::new());

    assert_eq!(path.len() as u32, start.manhattan(goal));
    assert_ne!(path.first().copied(), Some(start));
    assert_eq!(path.last().copied(), Some(goal));
    assert!(path.contains(&Tile::new(2, 2)));
    for pair in path.windows(2) {
        assert_eq!(pair[0].manhattan(pair[1]), 1);
    }
}

#[test]
fn path_is_deterministic_for_same_input() {
    let grid = open(10, 10);
    let start = Tile::new(1, 1);
    let goal = Tile::new(8, 8);

    let a = grid.find_path(start, goal, &BTreeSet::new());
    let b = grid.find_path(start, goal, &BTreeSet::new());
    assert_eq!(a, b);
    assert_eq!(a.len(), 14);
}

#[test]
fn blocked_and_occupied_tiles_are_avoided() {
    let mut grid = TileGrid::from_lines(&["...", "...", "..."]);
    let start = Tile::new(0, 1);
    let goal = Tile::new(2, 1);

    grid.set_occupied(Tile::new(1, 1), true);
    assert!(!grid.is_walkable(Tile::new(1, 1)));
    let path = grid.find_path(start, goal, &BTreeSet::new());
    assert_eq!(path.len(), 4);
    assert!(!path.contains(&Tile::new(1, 1)));

    let blocked = BTreeSet::from([Tile::new(1, 0), Tile::new(1, 2)]);
    assert!(grid.find_path(start, goal, &blocked).is_empty());
    assert!(grid.find_path(start, Tile::new(1, 0), &blocked).is_empty());
}

#[test]
fn ragged_lines_are_padded_and_unknown_chars_block() {
    let grid = TileGrid::from_lines(&[".+=", ",", "T;:"]);
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 3);
    assert!(grid.is_walkable(Tile::new(1, 0)));
    assert!(grid.is_walkable(Tile::new(2, 0)));
    assert!(grid.is_walkable(Tile::new(0, 1)));
    assert!(!grid.is_walkable(Tile::new(1, 1)));
    assert!(!grid.is_walkable(Tile::new(0, 2)));
    assert!(!grid.is_walkable(Tile::new(-1, 0)));
    assert!(!grid.is_walkable(Tile::new(3, 0)));
}
