use std::collections::BTreeMap;

use town_core::Tile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle of tiles, `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= self.x
            && tile.y >= self.y
            && tile.x < self.x + self.width
            && tile.y < self.y + self.height
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    /// Integer center, rounded towards the top-left.
    pub fn center(&self) -> Tile {
        Tile::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Top-left tile inside the wall ring.
    pub fn interior_origin(&self) -> Tile {
        Tile::new(self.x + 1, self.y + 1)
    }

    /// Every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Tile::new(x, y)))
    }

    /// Tiles strictly inside the wall ring, row-major.
    pub fn interior_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (self.y + 1..self.y + self.height - 1).flat_map(move |y| {
            (self.x + 1..self.x + self.width - 1).map(move |x| Tile::new(x, y))
        })
    }
}

/// Area id → tile bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AreaLayout {
    bounds: BTreeMap<String, Bounds>,
}

impl AreaLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, area_id: impl Into<String>, bounds: Bounds) {
        self.bounds.insert(area_id.into(), bounds);
    }

    pub fn bounds(&self, area_id: &str) -> Option<Bounds> {
        self.bounds.get(area_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Bounds)> {
        self.bounds.iter().map(|(id, b)| (id.as_str(), *b))
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Innermost bounded area containing `tile`.
    ///
    /// Nested sub-areas win over their enclosing area because they are
    /// smaller; equal sizes fall back to id order.
    pub fn area_at(&self, tile: Tile) -> Option<&str> {
        self.bounds
            .iter()
            .filter(|(_, b)| b.contains(tile))
            .min_by(|(a_id, a), (b_id, b)| a.area().cmp(&b.area()).then_with(|| a_id.cmp(b_id)))
            .map(|(id, _)| id.as_str())
    }
}

impl FromIterator<(String, Bounds)> for AreaLayout {
    fn from_iter<I: IntoIterator<Item = (String, Bounds)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().collect(),
        }
    }
}
