//! Simulation objects driven by the scheduler.
pub mod gamemap;
pub mod snake;
pub mod wall;
