use anyhow::Context;
use fd_core::Coord;
use fd_core::DEFAULT_BAG_CAPACITY;
use fd_core::DEFAULT_DOG_SPEED;
use fd_core::DEFAULT_RETIREMENT_SECS;
use fd_core::Dimension;
use fd_core::LootValue;
use fd_core::Real;
use fd_model::Building;
use fd_model::Game;
use fd_model::GridOffset;
use fd_model::GridPoint;
use fd_model::GridRect;
use fd_model::GridSize;
use fd_model::LootConfig;
use fd_model::Map;
use fd_model::Office;
use fd_model::Road;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Root of the JSON game config.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerConfig {
    #[serde(default = "default_dog_speed")]
    default_dog_speed: Real,
    #[serde(default = "default_bag_capacity")]
    default_bag_capacity: usize,
    /// Idle threshold in seconds.
    #[serde(default = "default_retirement")]
    dog_retirement_time: f64,
    loot_generator_config: GeneratorConfig,
    maps: Vec<MapConfig>,
}

fn default_dog_speed() -> Real {
    DEFAULT_DOG_SPEED
}
fn default_bag_capacity() -> usize {
    DEFAULT_BAG_CAPACITY
}
fn default_retirement() -> f64 {
    DEFAULT_RETIREMENT_SECS as f64
}

#[derive(Debug, Deserialize)]
struct GeneratorConfig {
    /// Base interval in seconds.
    period: f64,
    probability: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapConfig {
    id: String,
    name: String,
    dog_speed: Option<Real>,
    bag_capacity: Option<usize>,
    roads: Vec<RoadConfig>,
    #[serde(default)]
    buildings: Vec<BuildingConfig>,
    #[serde(default)]
    offices: Vec<OfficeConfig>,
    /// Kept verbatim: clients receive this array untouched, the engine only
    /// extracts each entry's `value`.
    #[serde(default)]
    loot_types: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RoadConfig {
    x0: Coord,
    y0: Coord,
    x1: Option<Coord>,
    y1: Option<Coord>,
}

#[derive(Debug, Deserialize)]
struct BuildingConfig {
    x: Coord,
    y: Coord,
    w: Dimension,
    h: Dimension,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfficeConfig {
    id: String,
    x: Coord,
    y: Coord,
    offset_x: Dimension,
    offset_y: Dimension,
}

/// Loads and validates the game config, producing a ready [`Game`].
pub fn load(path: &Path) -> anyhow::Result<Game> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    anyhow::ensure!(!raw.trim().is_empty(), "config file {} is empty", path.display());
    let config: ServerConfig =
        serde_json::from_str(&raw).with_context(|| "config file is not valid JSON")?;
    build(config)
}

fn build(config: ServerConfig) -> anyhow::Result<Game> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.loot_generator_config.probability),
        "loot probability must lie in [0, 1]"
    );
    anyhow::ensure!(
        config.loot_generator_config.period > 0.0,
        "loot period must be positive"
    );
    let mut game = Game::new(
        LootConfig {
            period: Duration::from_secs_f64(config.loot_generator_config.period),
            probability: config.loot_generator_config.probability,
        },
        Duration::from_secs_f64(config.dog_retirement_time),
    );
    let defaults = Defaults {
        dog_speed: config.default_dog_speed,
        bag_capacity: config.default_bag_capacity,
    };
    for map_config in config.maps {
        game.add_map(build_map(map_config, &defaults)?)?;
    }
    Ok(game)
}

struct Defaults {
    dog_speed: Real,
    bag_capacity: usize,
}

fn build_map(config: MapConfig, defaults: &Defaults) -> anyhow::Result<Map> {
    anyhow::ensure!(
        !config.roads.is_empty(),
        "map {} has no roads",
        config.id
    );
    let mut map = Map::new(
        config.id.as_str().into(),
        config.name,
        config.dog_speed.unwrap_or(defaults.dog_speed),
        config.bag_capacity.unwrap_or(defaults.bag_capacity),
    );
    for road in config.roads {
        let start = GridPoint::new(road.x0, road.y0);
        match (road.x1, road.y1) {
            (Some(x1), _) => map.add_road(Road::horizontal(start, x1)),
            (None, Some(y1)) => map.add_road(Road::vertical(start, y1)),
            (None, None) => anyhow::bail!("road on map {} has neither x1 nor y1", config.id),
        }
    }
    for building in config.buildings {
        map.add_building(Building::new(GridRect {
            position: GridPoint::new(building.x, building.y),
            size: GridSize {
                width: building.w,
                height: building.h,
            },
        }));
    }
    for office in config.offices {
        map.add_office(Office::new(
            office.id,
            GridPoint::new(office.x, office.y),
            GridOffset {
                dx: office.offset_x,
                dy: office.offset_y,
            },
        ))?;
    }
    for loot_type in &config.loot_types {
        let value = loot_type
            .get("value")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0) as LootValue;
        map.add_loot_value(value);
    }
    map.set_frontend_loot_types(serde_json::Value::Array(config.loot_types));
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"{
        "defaultDogSpeed": 3.0,
        "defaultBagCapacity": 2,
        "dogRetirementTime": 20.5,
        "lootGeneratorConfig": { "period": 5.0, "probability": 0.5 },
        "maps": [
            {
                "id": "map1",
                "name": "Town",
                "dogSpeed": 4.0,
                "roads": [
                    { "x0": 0, "y0": 0, "x1": 40 },
                    { "x0": 40, "y0": 0, "y1": 30 }
                ],
                "buildings": [ { "x": 5, "y": 5, "w": 30, "h": 20 } ],
                "offices": [ { "id": "o0", "x": 40, "y": 30, "offsetX": 5, "offsetY": 0 } ],
                "lootTypes": [
                    { "name": "key", "file": "key.obj", "value": 10 },
                    { "name": "wallet", "file": "wallet.obj", "value": 30 }
                ]
            },
            {
                "id": "map2",
                "name": "Village",
                "roads": [ { "x0": 0, "y0": 0, "y1": 10 } ]
            }
        ]
    }"#;

    fn load_str(raw: &str) -> anyhow::Result<Game> {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(raw.as_bytes()).expect("write config");
        load(file.path())
    }

    #[test]
    fn full_config_round_trip() {
        let game = load_str(CONFIG).expect("valid config");
        assert_eq!(game.retirement_time(), Duration::from_secs_f64(20.5));
        let town = game.find_map(&"map1".into()).expect("map1");
        assert_eq!(town.name(), "Town");
        assert_eq!(town.dog_speed(), 4.0);
        assert_eq!(town.bag_capacity(), 2);
        assert_eq!(town.roads().len(), 2);
        assert!(town.roads()[0].is_horizontal());
        assert!(town.roads()[1].is_vertical());
        assert_eq!(town.buildings().len(), 1);
        assert_eq!(town.offices().len(), 1);
        assert_eq!(town.loot_type_count(), 2);
        assert_eq!(town.loot_value(1), 30);
        let village = game.find_map(&"map2".into()).expect("map2");
        assert_eq!(village.dog_speed(), 3.0);
        assert_eq!(village.bag_capacity(), 2);
        assert_eq!(village.loot_type_count(), 0);
    }

    #[test]
    fn frontend_loot_types_survive_verbatim() {
        let game = load_str(CONFIG).expect("valid config");
        let town = game.find_map(&"map1".into()).expect("map1");
        let raw = town.frontend_loot_types();
        assert_eq!(raw[0]["name"], "key");
        assert_eq!(raw[1]["file"], "wallet.obj");
    }

    #[test]
    fn map_without_roads_is_rejected() {
        let raw = r#"{
            "lootGeneratorConfig": { "period": 5.0, "probability": 0.5 },
            "maps": [ { "id": "m", "name": "bare", "roads": [] } ]
        }"#;
        assert!(load_str(raw).is_err());
    }

    #[test]
    fn bad_probability_is_rejected() {
        let raw = r#"{
            "lootGeneratorConfig": { "period": 5.0, "probability": 1.5 },
            "maps": [ { "id": "m", "name": "m", "roads": [ { "x0": 0, "y0": 0, "x1": 1 } ] } ]
        }"#;
        assert!(load_str(raw).is_err());
    }

    #[test]
    fn empty_or_malformed_config_is_rejected() {
        assert!(load_str("").is_err());
        assert!(load_str("{ not json").is_err());
    }

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let raw = r#"{
            "lootGeneratorConfig": { "period": 1.0, "probability": 0.0 },
            "maps": [ { "id": "m", "name": "m", "roads": [ { "x0": 0, "y0": 0, "x1": 1 } ] } ]
        }"#;
        let game = load_str(raw).expect("valid config");
        let map = game.find_map(&"m".into()).expect("map");
        assert_eq!(map.dog_speed(), DEFAULT_DOG_SPEED);
        assert_eq!(map.bag_capacity(), DEFAULT_BAG_CAPACITY);
        assert_eq!(
            game.retirement_time(),
            Duration::from_secs(DEFAULT_RETIREMENT_SECS)
        );
    }
}
