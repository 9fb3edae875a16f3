//! One match session.
//!
//! [`Game`] owns the scheduler, the map it spawned and the input queue. The
//! host calls [`Game::frame`] once per animation frame with its timestamp;
//! queued direction commands are applied first, then every object ticks.

use std::cell::RefCell;
use std::rc::Rc;

use crossbeam_channel::Sender;
use log::info;

use crate::entities::gamemap::{GameMap, MapConfig, MatchOutcome};
use crate::events::input::DirectionCommand;
use crate::resources::drawsurface::{DrawSurface, Viewport};
use crate::resources::input::InputQueue;
use crate::resources::rng::RandomSource;
use crate::systems::maze::MazeError;
use crate::systems::scheduler::{Registry, Scheduler};

pub struct Game {
    scheduler: Scheduler,
    map: Rc<RefCell<GameMap>>,
    input: InputQueue,
}

impl Game {
    /// Build a fresh match. Fails only when no solvable maze exists for
    /// `config`.
    pub fn new(config: MapConfig, rng: &mut dyn RandomSource) -> Result<Self, MazeError> {
        let mut scheduler = Scheduler::new();
        let map = GameMap::spawn(&mut scheduler, config, rng)?;
        info!(
            "New match: {}x{}, {} inner wall pairs, speed {}",
            config.rows, config.cols, config.inner_walls, config.snake_speed
        );
        Ok(Game {
            scheduler,
            map,
            input: InputQueue::new(),
        })
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.scheduler.set_time_scale(time_scale);
    }

    /// Producer handle for direction commands.
    pub fn input_sender(&self) -> Sender<DirectionCommand> {
        self.input.sender()
    }

    pub fn push_input(&self, command: DirectionCommand) {
        self.input.push(command);
    }

    /// Apply queued input, then run one scheduler tick.
    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn DrawSurface, viewport: Viewport) {
        {
            let map = self.map.borrow();
            for command in self.input.drain() {
                map.set_direction(command.snake, command.direction);
            }
        }
        self.scheduler.tick(timestamp_ms, surface, viewport);
    }

    pub fn map(&self) -> &Rc<RefCell<GameMap>> {
        &self.map
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.map.borrow().outcome()
    }

    /// Unregister every object the map created, walls first and the map
    /// itself last. Calling it again does nothing.
    pub fn end(&mut self) {
        let ids = self.map.borrow().object_ids();
        if ids.is_empty() {
            return;
        }
        for id in ids.into_iter().rev() {
            self.scheduler.unregister(id);
        }
        info!("Match ended: {:?}", self.map.borrow().outcome());
    }
}
