//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for read-only).
//! Run progress (level, score, combo) is passed in explicitly.

pub mod cleanup;
pub mod collision;
pub mod impact;
pub mod input;
pub mod level;
pub mod movement;
pub mod snapshot;
pub mod spawner;
