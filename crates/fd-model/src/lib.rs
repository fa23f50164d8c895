//! World model and deterministic game-state engine.
//!
//! Static geography loaded once at startup, and the per-map dynamic state
//! advanced tick by tick.
//!
//! ## Core Types
//!
//! - [`Map`] / [`Road`] / [`Building`] / [`Office`] — immutable geography
//! - [`Game`] — map registry, session registry, tick orchestration
//! - [`GameSession`] — dogs and loot bound to one map
//! - [`Dog`] — player avatar with motion, bag, and score
//! - [`LootGenerator`] — probabilistic spawn-count model
//!
//! ## Tick pipeline
//!
//! Per session and per tick: spawn loot, sweep every dog along its road,
//! run the collision kernel over loot + offices, then settle pickups and
//! deposits in chronological order.
mod dog;
mod game;
mod generator;
mod map;
mod session;
mod units;

pub use dog::*;
pub use game::*;
pub use generator::*;
pub use map::*;
pub use session::*;
pub use units::*;
