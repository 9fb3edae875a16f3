/// Frame clock derived from the host's animation timestamps.
///
/// The host passes a monotonically increasing timestamp in milliseconds each
/// frame; [`WorldTime::advance`] turns it into a scaled delta in seconds.
#[derive(Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    last_timestamp: f64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            last_timestamp: 0.0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }

    /// Record a new host timestamp (ms) and return the scaled delta (s).
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let raw = ((timestamp_ms - self.last_timestamp) / 1000.0).max(0.0) as f32;
        self.last_timestamp = timestamp_ms;
        self.delta = raw * self.time_scale;
        self.elapsed += self.delta;
        self.delta
    }
}
