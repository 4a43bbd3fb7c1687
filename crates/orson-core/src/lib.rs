//! Core types and definitions for the Orson Cyber War simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, notifications, state snapshots, configuration and
//! constants. It has no dependency on the ECS or any host framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
