use core::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use town_core::Tile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Map characters an agent may stand on: floor variants, doorways, and
/// decorative-but-passable symbols.
pub const WALKABLE_TILES: [char; 6] = ['.', ',', ';', ':', '+', '='];

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    tile: Tile,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, Tile, u64) {
        (self.f, self.g, self.tile, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Fixed-size rectangular character grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileGrid {
    width: i32,
    height: i32,
    cells: Vec<char>,
    occupied: Vec<bool>,
}

impl TileGrid {
    /// Build a grid from map lines. Short lines are padded with spaces.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let width = lines
            .iter()
            .map(|l| l.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let height = lines.len();
        let mut cells = Vec::with_capacity(width * height);
        for line in lines {
            let mut row: Vec<char> = line.as_ref().chars().collect();
            row.resize(width, ' ');
            cells.extend(row);
        }
        Self {
            width: width as i32,
            height: height as i32,
            occupied: vec![false; cells.len()],
            cells,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        Self::from_lines(&lines)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, tile: Tile) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    fn idx(&self, tile: Tile) -> Option<usize> {
        if !self.in_bounds(tile) {
            return None;
        }
        Some((tile.y * self.width + tile.x) as usize)
    }

    fn tile_from_idx(&self, idx: usize) -> Tile {
        let idx = idx as i32;
        Tile::new(idx % self.width, idx / self.width)
    }

    pub fn char_at(&self, tile: Tile) -> Option<char> {
        self.idx(tile).map(|i| self.cells[i])
    }

    /// Mark a tile as holding a placed object.
    pub fn set_occupied(&mut self, tile: Tile, occupied: bool) {
        if let Some(idx) = self.idx(tile) {
            self.occupied[idx] = occupied;
        }
    }

    pub fn is_occupied(&self, tile: Tile) -> bool {
        self.idx(tile).map(|i| self.occupied[i]).unwrap_or(false)
    }

    /// Walkable iff the character is whitelisted and no object sits on it.
    pub fn is_walkable(&self, tile: Tile) -> bool {
        self.idx(tile)
            .map(|i| WALKABLE_TILES.contains(&self.cells[i]) && !self.occupied[i])
            .unwrap_or(false)
    }

    fn passable(&self, tile: Tile, blocked: &BTreeSet<Tile>) -> bool {
        self.is_walkable(tile) && !blocked.contains(&tile)
    }

    fn neighbors(tile: Tile) -> [Tile; 4] {
        // Fixed order for determinism: N, E, S, W.
        [
            Tile::new(tile.x, tile.y - 1),
            Tile::new(tile.x + 1, tile.y),
            Tile::new(tile.x, tile.y + 1),
            Tile::new(tile.x - 1, tile.y),
        ]
    }

    /// A* over 4-connected walkable tiles with unit step cost.
    ///
    /// The returned path excludes `start` and ends at `goal`. It is empty when
    /// `start == goal`, when either endpoint is not passable, or when the goal
    /// is unreachable.
    pub fn find_path(&self, start: Tile, goal: Tile, blocked: &BTreeSet<Tile>) -> Vec<Tile> {
        if start == goal {
            return Vec::new();
        }
        if !self.passable(start, blocked) || !self.passable(goal, blocked) {
            return Vec::new();
        }
        let (Some(start_idx), Some(goal_idx)) = (self.idx(start), self.idx(goal)) else {
            return Vec::new();
        };

        let grid_len = self.cells.len();
        let mut g_score = vec![u32::MAX; grid_len];
        let mut came_from: Vec<Option<usize>> = vec![None; grid_len];
        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        g_score[start_idx] = 0;
        open.push(OpenNode {
            f: start.manhattan(goal),
            g: 0,
            tile: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if node.tile == goal {
                return self.reconstruct(&came_from, start_idx, goal_idx);
            }

            let Some(node_idx) = self.idx(node.tile) else {
                continue;
            };
            if node.g != g_score[node_idx] {
                // Stale heap entry.
                continue;
            }

            for n in Self::neighbors(node.tile) {
                if !self.passable(n, blocked) {
                    continue;
                }
                let Some(n_idx) = self.idx(n) else { continue };

                let tentative_g = node.g.saturating_add(1);
                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(node_idx);
                g_score[n_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(n.manhattan(goal)),
                    g: tentative_g,
                    tile: n,
                    tie,
                });
                tie += 1;
            }
        }

        Vec::new()
    }

    fn reconstruct(&self, came_from: &[Option<usize>], start: usize, goal: usize) -> Vec<Tile> {
        let mut out = Vec::new();
        let mut current = goal;
        while current != start {
            out.push(self.tile_from_idx(current));
            match came_from[current] {
                Some(prev) => current = prev,
                None => break,
            }
        }
        out.reverse();
        out
    }
}
