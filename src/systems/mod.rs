//! Simulation systems.
//!
//! Submodules overview
//! - [`scheduler`] – the per-frame object scheduler and deferred registry
//! - [`maze`] – symmetric, solvable wall layout generation
//! - [`input`] – poll the keyboard into direction commands (`window` feature)
//! - [`render`] – raylib-backed draw surface (`window` feature)

#[cfg(feature = "window")]
pub mod input;
pub mod maze;
#[cfg(feature = "window")]
pub mod render;
pub mod scheduler;
