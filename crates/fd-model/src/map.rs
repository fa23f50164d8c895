use super::*;
use fd_core::LootType;
use fd_core::LootValue;
use fd_core::ROAD_ALIGNMENT;
use fd_core::Real;
use fd_geom::Rect2;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;

/// Opaque string identifier of a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(String);

impl MapId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MapId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl From<String> for MapId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Axis-aligned road segment with integer endpoints.
///
/// The navigable area is the segment's bounding box inflated by
/// [`ROAD_ALIGNMENT`] on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Road {
    start: GridPoint,
    end: GridPoint,
}

impl Road {
    pub fn horizontal(start: GridPoint, end_x: fd_core::Coord) -> Self {
        Self {
            start,
            end: GridPoint::new(end_x, start.y),
        }
    }
    pub fn vertical(start: GridPoint, end_y: fd_core::Coord) -> Self {
        Self {
            start,
            end: GridPoint::new(start.x, end_y),
        }
    }
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }
    pub fn start(&self) -> GridPoint {
        self.start
    }
    pub fn end(&self) -> GridPoint {
        self.end
    }
    /// Normalized navigable rectangle of this road.
    pub fn rect(&self) -> Rect2 {
        let (x0, x1) = minmax(self.start.x, self.end.x);
        let (y0, y1) = minmax(self.start.y, self.end.y);
        Rect2::new(
            x0 as Real - ROAD_ALIGNMENT,
            y0 as Real - ROAD_ALIGNMENT,
            x1 as Real + ROAD_ALIGNMENT,
            y1 as Real + ROAD_ALIGNMENT,
        )
    }
}

fn minmax(a: fd_core::Coord, b: fd_core::Coord) -> (fd_core::Coord, fd_core::Coord) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Informational building footprint. Not an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Building {
    bounds: GridRect,
}

impl Building {
    pub fn new(bounds: GridRect) -> Self {
        Self { bounds }
    }
    pub fn bounds(&self) -> GridRect {
        self.bounds
    }
}

/// Lost-and-found office. Sweeping through its radius deposits the bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Office {
    id: String,
    position: GridPoint,
    offset: GridOffset,
}

impl Office {
    pub fn new(id: String, position: GridPoint, offset: GridOffset) -> Self {
        Self {
            id,
            position,
            offset,
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn position(&self) -> GridPoint {
        self.position
    }
    pub fn offset(&self) -> GridOffset {
        self.offset
    }
}

/// Immutable geography of one game level.
#[derive(Debug, Clone)]
pub struct Map {
    id: MapId,
    name: String,
    roads: Vec<Road>,
    buildings: Vec<Building>,
    offices: Vec<Office>,
    office_ids: HashSet<String>,
    loot_values: Vec<LootValue>,
    frontend_loot_types: serde_json::Value,
    dog_speed: Real,
    bag_capacity: usize,
}

impl Map {
    pub fn new(id: MapId, name: String, dog_speed: Real, bag_capacity: usize) -> Self {
        Self {
            id,
            name,
            roads: Vec::new(),
            buildings: Vec::new(),
            offices: Vec::new(),
            office_ids: HashSet::new(),
            loot_values: Vec::new(),
            frontend_loot_types: serde_json::Value::Array(Vec::new()),
            dog_speed,
            bag_capacity,
        }
    }
    pub fn id(&self) -> &MapId {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }
    pub fn offices(&self) -> &[Office] {
        &self.offices
    }
    pub fn dog_speed(&self) -> Real {
        self.dog_speed
    }
    pub fn bag_capacity(&self) -> usize {
        self.bag_capacity
    }
    pub fn loot_type_count(&self) -> usize {
        self.loot_values.len()
    }
    pub fn loot_value(&self, kind: LootType) -> LootValue {
        self.loot_values
            .get(kind as usize)
            .copied()
            .unwrap_or_default()
    }
    /// Raw `lootTypes` array from the config, re-emitted verbatim to clients.
    pub fn frontend_loot_types(&self) -> &serde_json::Value {
        &self.frontend_loot_types
    }
    pub fn add_road(&mut self, road: Road) {
        self.roads.push(road);
    }
    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }
    pub fn add_office(&mut self, office: Office) -> anyhow::Result<()> {
        if !self.office_ids.insert(office.id().to_string()) {
            anyhow::bail!("duplicate office {} on map {}", office.id(), self.id);
        }
        self.offices.push(office);
        Ok(())
    }
    pub fn add_loot_value(&mut self, value: LootValue) {
        self.loot_values.push(value);
    }
    pub fn set_frontend_loot_types(&mut self, raw: serde_json::Value) {
        self.frontend_loot_types = raw;
    }
}
