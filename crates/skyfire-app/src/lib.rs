//! Skyfire application shell.
//!
//! Wires the simulation to its game loop and render threads and exposes a
//! small control surface for the CLI.

pub mod autopilot;
pub mod control;
pub mod game_loop;
pub mod render_loop;
pub mod state;

pub use skyfire_core as core;
