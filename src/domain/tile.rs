/// Tile types.
///
/// Tiles are descriptive: the side-scroll level collides against a
/// single ground height and the room against a fixed wall inset.
/// The grids exist for drawing and for geometry queries.

/// Edge length of one tile in world pixels (both levels).
pub const TILE_SIZE: f32 = 16.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Air,
    Ground, // side-scroll floor
    Wall,   // room perimeter
    Floor,  // room interior
}

impl Tile {
    /// Is this tile drawn at all? Air is left to the background color.
    pub fn is_visible(self) -> bool {
        !matches!(self, Tile::Air)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_the_default_and_invisible() {
        assert_eq!(Tile::default(), Tile::Air);
        assert!(!Tile::Air.is_visible());
        assert!(Tile::Floor.is_visible());
    }
}
