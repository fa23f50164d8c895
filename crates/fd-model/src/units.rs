use fd_core::Coord;
use fd_core::Dimension;
use fd_geom::Point2;
use serde::Deserialize;
use serde::Serialize;

/// Integer position on the map lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: Coord,
    pub y: Coord,
}

impl GridPoint {
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
    pub fn to_real(self) -> Point2 {
        Point2::new(self.x as f64, self.y as f64)
    }
}

/// Integer extent of a building footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: Dimension,
    pub height: Dimension,
}

/// Axis-aligned integer rectangle (top-left corner + extent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub position: GridPoint,
    pub size: GridSize,
}

/// Sprite offset of an office relative to its anchor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOffset {
    pub dx: Dimension,
    pub dy: Dimension,
}
