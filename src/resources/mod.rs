//! Long-lived data shared with the simulation objects.
//!
//! Overview
//! - `drawsurface` – fill-only drawing API, colors, viewport sizing, recording surface
//! - `gameconfig` – INI-backed match and window settings
//! - `input` – channel that carries direction commands into the game
//! - `rng` – random source seam for maze generation
//! - `worldtime` – frame clock derived from host timestamps
pub mod drawsurface;
pub mod gameconfig;
pub mod input;
pub mod rng;
pub mod worldtime;
