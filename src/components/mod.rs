//! Value types shared by the simulation objects.
//!
//! - [`cell`] – grid coordinate with a continuous position for animation
//! - [`direction`] – the four orthogonal moves and their input encodings
pub mod cell;
pub mod direction;
