//! Core type aliases, constants, and runtime utilities for fetchd.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the fetchd workspace.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Integer grid coordinate on the map lattice.
pub type Coord = i32;
/// Width/height/offset measured in grid units.
pub type Dimension = i32;
/// Continuous world coordinate and speed component.
pub type Real = f64;
/// Monotonic per-session dog identifier.
pub type DogId = u32;
/// Monotonic per-session loot identifier.
pub type LootId = u32;
/// Index into a map's loot catalog.
pub type LootType = u32;
/// Catalog value of a single loot item.
pub type LootValue = u32;
/// Accumulated deposit total of a dog.
pub type Score = u32;

// ============================================================================
// WORLD GEOMETRY PARAMETERS
// ============================================================================
/// Half-width added to each side of a road's center line.
pub const ROAD_ALIGNMENT: Real = 0.4;
/// Collision radius of a dog.
pub const DOG_WIDTH: Real = 0.6;
/// Collision radius of an office deposit zone.
pub const OFFICE_WIDTH: Real = 0.5;
/// Collision radius of a loot item (a point).
pub const LOOT_WIDTH: Real = 0.0;

// ============================================================================
// GAMEPLAY DEFAULTS
// These apply when the config file omits the corresponding field.
// ============================================================================
/// Dog speed in units per second.
pub const DEFAULT_DOG_SPEED: Real = 1.0;
/// Bag capacity in items.
pub const DEFAULT_BAG_CAPACITY: usize = 3;
/// Idle seconds before a dog is retired.
pub const DEFAULT_RETIREMENT_SECS: u64 = 60;

// ============================================================================
// API LIMITS
// ============================================================================
/// Length of a bearer token in hex characters.
pub const TOKEN_LENGTH: usize = 32;
/// Default and maximum page size of a leaderboard query.
pub const RECORDS_PAGE_LIMIT: usize = 100;
/// Per-connection request read deadline.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Fractional seconds of a time delta, for position integration.
pub fn seconds(dt: std::time::Duration) -> Real {
    dt.as_secs_f64()
}

/// Directory receiving per-run log files.
pub const LOG_DIR: &str = "logs";

/// Wires up process-wide logging: INFO and above on the terminal for
/// operators, full DEBUG detail into `logs/fetchd-<start>.log` for
/// post-mortems. Call once, before the server starts.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all(LOG_DIR).expect("create log directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let started = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock predates the epoch")
        .as_secs();
    let path = format!("{}/fetchd-{}.log", LOG_DIR, started);
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(&path).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("install combined logger");
}
