//! Event types crossing into the simulation.
//!
//! Submodules:
//! - [`input`] – direction commands and input-boundary validation errors
pub mod input;
