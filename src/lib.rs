//! Snake Duel library.
//!
//! The simulation core of a two-player snake game: a frame scheduler, maze
//! generation, the snake movement state machine and turn arbitration. It is
//! exposed as a library so it can be driven headless from tests and from any
//! host that supplies timestamps, input and a [`DrawSurface`].
//!
//! [`DrawSurface`]: resources::drawsurface::DrawSurface

pub mod components;
pub mod entities;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
