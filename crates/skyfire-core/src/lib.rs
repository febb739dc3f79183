//! Core types and definitions for the SKYFIRE combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry helpers, enums, constants, the roster, commands, events and
//! the HUD snapshot. It has no threading and no simulation state.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod math;
pub mod state;
pub mod types;
