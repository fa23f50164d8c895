//! Planar geometry and the swept-circle collision kernel.
//!
//! ## Core Types
//!
//! - [`Point2`] / [`Vec2`] — continuous positions and velocities
//! - [`Rect2`] — normalized axis-aligned rectangles (road areas)
//! - [`Item`] / [`Gatherer`] / [`GatherEvent`] — collision kernel vocabulary
//!
//! The kernel itself is [`find_gather_events`]: a pure function that sweeps
//! every moving gatherer against every stationary item and reports hits in
//! chronological order.
mod gather;
mod point;

pub use gather::*;
pub use point::*;
