//! Per-frame object scheduler.
//!
//! The [`Scheduler`] owns an ordered list of live simulation objects and runs
//! each one's lifecycle once per host frame:
//!
//! 1. On an object's first tick, [`Tickable::start`] is called and `update`
//!    is skipped for that frame.
//! 2. On every later tick, the frame delta derived from consecutive host
//!    timestamps is passed to [`Tickable::update`].
//!
//! Objects are visited in registration order. Registration and removal
//! requested *during* a tick go through the [`Commands`] buffer in the
//! [`FrameContext`] and are applied after the traversal, so the list being
//! iterated never changes under the loop. Objects spawned that way run
//! `start()` on the following tick.
//!
//! Objects are shared as `Rc<RefCell<..>>` handles: the simulation is
//! single-threaded and a tick runs to completion before anything else can
//! touch the objects.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use smallvec::SmallVec;

use crate::resources::drawsurface::{DrawSurface, Viewport};
use crate::resources::worldtime::WorldTime;

/// Lifecycle interface of every simulation object.
pub trait Tickable {
    /// Called once, on the object's first tick.
    fn start(&mut self, _ctx: &mut FrameContext<'_>) {}

    /// Called on every tick after the first. `dt` is in seconds.
    fn update(&mut self, _dt: f32, _ctx: &mut FrameContext<'_>) {}

    /// Called when the object is removed from the scheduler.
    fn on_destroy(&mut self) {}

    /// Short label used in logs.
    fn name(&self) -> &'static str {
        "object"
    }
}

/// Shared handle to a scheduled object.
pub type ObjectHandle = Rc<RefCell<dyn Tickable>>;

/// Identity of a registered object, unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

/// Something objects can be registered with.
///
/// Implemented by [`Scheduler`] (immediate) and [`Commands`] (deferred until
/// the current tick finishes), so constructors register the same way whether
/// they run at setup or inside another object's `start`/`update`.
pub trait Registry {
    fn register(&mut self, object: ObjectHandle) -> ObjectId;
    fn unregister(&mut self, id: ObjectId);
}

/// Registrations and removals queued during a tick.
pub struct Commands {
    next_id: u64,
    spawned: Vec<(ObjectId, ObjectHandle)>,
    despawned: SmallVec<[ObjectId; 4]>,
}

impl Commands {
    fn starting_at(next_id: u64) -> Self {
        Commands {
            next_id,
            spawned: Vec::new(),
            despawned: SmallVec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.despawned.is_empty()
    }
}

impl Registry for Commands {
    fn register(&mut self, object: ObjectHandle) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.spawned.push((id, object));
        id
    }

    fn unregister(&mut self, id: ObjectId) {
        self.despawned.push(id);
    }
}

/// Everything an object may touch while it ticks.
pub struct FrameContext<'a> {
    /// Where to draw this frame.
    pub surface: &'a mut dyn DrawSurface,
    /// Current host viewport in pixels.
    pub viewport: Viewport,
    /// Deferred registry for objects created or destroyed this tick.
    pub commands: Commands,
}

struct Slot {
    id: ObjectId,
    object: ObjectHandle,
    started: bool,
}

/// Ordered registry of live objects plus the frame clock.
pub struct Scheduler {
    slots: Vec<Slot>,
    next_id: u64,
    time: WorldTime,
    frame_count: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_time(WorldTime::default())
    }

    pub fn with_time(time: WorldTime) -> Self {
        Scheduler {
            slots: Vec::new(),
            next_id: 0,
            time,
            frame_count: 0,
        }
    }

    pub fn time(&self) -> &WorldTime {
        &self.time
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time.time_scale = time_scale.max(0.0);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    /// Ids in visiting order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.slots.iter().map(|s| s.id)
    }

    /// Whether the object has already had its `start()`.
    pub fn is_started(&self, id: ObjectId) -> bool {
        self.slots.iter().any(|s| s.id == id && s.started)
    }

    /// Remove `id`, calling its `on_destroy`. Returns false if it was not live.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.slots.iter().position(|s| s.id == id) else {
            return false;
        };
        let slot = self.slots.remove(index);
        let mut object = slot.object.borrow_mut();
        debug!("Unregistered {} {:?}", object.name(), id);
        object.on_destroy();
        true
    }

    /// Run one frame: start new objects, update the others, then apply the
    /// registrations and removals they requested.
    pub fn tick(&mut self, timestamp_ms: f64, surface: &mut dyn DrawSurface, viewport: Viewport) {
        let dt = self.time.advance(timestamp_ms);
        self.frame_count += 1;

        let mut ctx = FrameContext {
            surface,
            viewport,
            commands: Commands::starting_at(self.next_id),
        };

        for slot in self.slots.iter_mut() {
            let mut object = slot.object.borrow_mut();
            if !slot.started {
                slot.started = true;
                object.start(&mut ctx);
            } else {
                object.update(dt, &mut ctx);
            }
        }

        let Commands {
            next_id,
            spawned,
            despawned,
        } = ctx.commands;
        self.next_id = next_id;
        for (id, object) in spawned {
            debug!("Registered {} {:?}", object.borrow().name(), id);
            self.slots.push(Slot {
                id,
                object,
                started: false,
            });
        }
        for id in despawned {
            self.remove(id);
        }
    }
}

impl Registry for Scheduler {
    fn register(&mut self, object: ObjectHandle) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        debug!("Registered {} {:?}", object.borrow().name(), id);
        self.slots.push(Slot {
            id,
            object,
            started: false,
        });
        id
    }

    fn unregister(&mut self, id: ObjectId) {
        self.remove(id);
    }
}
