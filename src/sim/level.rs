/// Built-in level geometry.
///
/// ## Side-scroll grid
///   64 × 30 tiles of 16 px. Rows below row 25 are ground, the rest air.
///   Collision uses the scalar `ground_y`, not the tiles.
///
/// ## Overhead room
///   400 × 300 px, tiled at 16 px (ceil → 25 × 19 tiles).
///   The outer ring of tiles is wall, the interior floor.
///   Collision uses the fixed `WALL_INSET`, not the tiles.
///
/// Both levels are built once and kept for the whole session; switching
/// modes swaps which one is active, never rebuilds them.

use crate::domain::physics::Arena;
use crate::domain::tile::{Tile, TILE_SIZE};

pub const SIDE_WIDTH_TILES: usize = 64;
pub const SIDE_HEIGHT_TILES: usize = 30;
/// Rows with an index strictly greater than this are ground.
pub const SIDE_GROUND_ROW: usize = 25;
pub const SIDE_GROUND_Y: f32 = 400.0;

pub const ROOM_WIDTH: f32 = 400.0;
pub const ROOM_HEIGHT: f32 = 300.0;
pub const WALL_INSET: f32 = 20.0;

/// Shared queries for both level kinds.
pub trait LevelGeometry {
    /// Level size in world pixels.
    fn pixel_size(&self) -> (f32, f32);
    /// Grid size in tiles (columns, rows).
    fn grid_size(&self) -> (usize, usize);
    /// Tile at (col, row). Out of range reads as `Air`.
    fn tile_at(&self, col: usize, row: usize) -> Tile;
    /// Collision description handed to actor physics.
    fn arena(&self) -> Arena;
}

fn tile_in(tiles: &[Vec<Tile>], col: usize, row: usize) -> Tile {
    tiles
        .get(row)
        .and_then(|r| r.get(col))
        .copied()
        .unwrap_or_default()
}

// ══════════════════════════════════════════════════════════════
// Side-scroll
// ══════════════════════════════════════════════════════════════

pub struct SideScrollLevel {
    pub width: usize,
    pub height: usize,
    pub ground_y: f32,
    tiles: Vec<Vec<Tile>>,
}

impl SideScrollLevel {
    pub fn new() -> Self {
        let tiles = (0..SIDE_HEIGHT_TILES)
            .map(|row| {
                let tile = if row > SIDE_GROUND_ROW { Tile::Ground } else { Tile::Air };
                vec![tile; SIDE_WIDTH_TILES]
            })
            .collect();
        SideScrollLevel {
            width: SIDE_WIDTH_TILES,
            height: SIDE_HEIGHT_TILES,
            ground_y: SIDE_GROUND_Y,
            tiles,
        }
    }
}

impl LevelGeometry for SideScrollLevel {
    fn pixel_size(&self) -> (f32, f32) {
        (self.width as f32 * TILE_SIZE, self.height as f32 * TILE_SIZE)
    }

    fn grid_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn tile_at(&self, col: usize, row: usize) -> Tile {
        tile_in(&self.tiles, col, row)
    }

    fn arena(&self) -> Arena {
        Arena::Side { ground_y: self.ground_y, width: self.pixel_size().0 }
    }
}

// ══════════════════════════════════════════════════════════════
// Overhead room
// ══════════════════════════════════════════════════════════════

pub struct OverheadRoom {
    pub room_width: f32,
    pub room_height: f32,
    pub wall: f32,
    cols: usize,
    rows: usize,
    tiles: Vec<Vec<Tile>>,
}

impl OverheadRoom {
    pub fn new() -> Self {
        let cols = (ROOM_WIDTH / TILE_SIZE).ceil() as usize;
        let rows = (ROOM_HEIGHT / TILE_SIZE).ceil() as usize;
        let tiles = (0..rows)
            .map(|y| {
                (0..cols)
                    .map(|x| {
                        let border = x == 0 || y == 0 || x + 1 == cols || y + 1 == rows;
                        if border { Tile::Wall } else { Tile::Floor }
                    })
                    .collect()
            })
            .collect();
        OverheadRoom {
            room_width: ROOM_WIDTH,
            room_height: ROOM_HEIGHT,
            wall: WALL_INSET,
            cols,
            rows,
            tiles,
        }
    }
}

impl LevelGeometry for OverheadRoom {
    fn pixel_size(&self) -> (f32, f32) {
        (self.room_width, self.room_height)
    }

    fn grid_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn tile_at(&self, col: usize, row: usize) -> Tile {
        tile_in(&self.tiles, col, row)
    }

    fn arena(&self) -> Arena {
        Arena::Room { width: self.room_width, height: self.room_height, wall: self.wall }
    }
}
