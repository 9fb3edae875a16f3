//! Channel carrying direction commands into the simulation.
//!
//! Input producers (the keyboard poller, tests, a future remote source) hold a
//! cloned [`Sender`] and push [`DirectionCommand`]s whenever they like. The
//! game drains the queue once per frame, before the scheduler ticks, so every
//! command lands between two ticks.
use crossbeam_channel::{Receiver, Sender, TryIter, unbounded};

use crate::events::input::DirectionCommand;

/// Unbounded multi-producer queue of [`DirectionCommand`]s.
#[derive(Debug)]
pub struct InputQueue {
    tx: Sender<DirectionCommand>,
    rx: Receiver<DirectionCommand>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<DirectionCommand>();
        InputQueue { tx, rx }
    }

    /// A new producer handle.
    pub fn sender(&self) -> Sender<DirectionCommand> {
        self.tx.clone()
    }

    /// Push a command from the owning side.
    pub fn push(&self, command: DirectionCommand) {
        // The receiver lives in `self`, so the channel cannot be disconnected.
        let _ = self.tx.send(command);
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> TryIter<'_, DirectionCommand> {
        self.rx.try_iter()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
