//! Simulation engine for Orson Cyber War.
//!
//! Owns the hecs ECS world, runs systems once per host frame,
//! and produces GameStateSnapshots for the renderer.

pub mod engine;
pub mod progress;
pub mod publisher;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use orson_core as core;

#[cfg(test)]
mod tests;
