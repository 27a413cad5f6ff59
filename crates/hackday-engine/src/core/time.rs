/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

// Absorbs f32 step rounding so 60 steps of 1/60 land on a one-second timer.
const FIRE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    remaining: f64,
    /// `Some(interval)` for repeating timers.
    repeat: Option<f64>,
}

/// Monotonic session clock plus one-shot and repeating timers.
///
/// Timers never call back into game code. `advance` returns the IDs that
/// fired, in registration order, and the caller dispatches them. A cancelled
/// timer never shows up in a later `advance`.
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<TimerEntry>,
    next_id: u32,
    now: f64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the clock was created.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire once after `delay` seconds.
    pub fn after(&mut self, delay: f32) -> TimerId {
        self.insert(delay as f64, None)
    }

    /// Fire every `interval` seconds until cancelled.
    pub fn every(&mut self, interval: f32) -> TimerId {
        let interval = (interval as f64).max(FIRE_EPSILON);
        self.insert(interval, Some(interval))
    }

    fn insert(&mut self, delay: f64, repeat: Option<f64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            remaining: delay,
            repeat,
        });
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Advance the clock and collect every timer that came due.
    /// A repeating timer fires once per elapsed interval.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerId> {
        self.now += dt as f64;
        let mut fired = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining -= dt as f64;
            while entry.remaining <= FIRE_EPSILON {
                fired.push(entry.id);
                match entry.repeat {
                    Some(interval) => entry.remaining += interval,
                    None => return false,
                }
            }
            true
        });
        fired
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancel everything. The clock keeps its value.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn one_shot_fires_once() {
        let mut timers = Timers::new();
        let id = timers.after(0.5);
        assert!(timers.advance(0.25).is_empty());
        assert_eq!(timers.advance(0.25), vec![id]);
        assert!(timers.advance(1.0).is_empty());
        assert!(!timers.is_active(id));
    }

    #[test]
    fn sixty_fixed_steps_make_one_second() {
        let mut timers = Timers::new();
        let id = timers.every(1.0);
        let mut fired = 0;
        for _ in 0..60 {
            fired += timers.advance(1.0 / 60.0).iter().filter(|f| **f == id).count();
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn repeating_timer_catches_up_on_large_steps() {
        let mut timers = Timers::new();
        let id = timers.every(1.0);
        assert_eq!(timers.advance(3.0), vec![id, id, id]);
        assert!(timers.is_active(id));
    }

    #[test]
    fn fired_in_registration_order() {
        let mut timers = Timers::new();
        let a = timers.every(1.0);
        let b = timers.after(1.0);
        let c = timers.every(0.5);
        assert_eq!(timers.advance(1.0), vec![a, b, c, c]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        let id = timers.every(1.0);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance(5.0).is_empty());
    }

    #[test]
    fn clock_is_monotonic_across_clear() {
        let mut timers = Timers::new();
        timers.after(1.0);
        timers.advance(2.5);
        timers.clear();
        timers.advance(0.5);
        assert!((timers.now() - 3.0).abs() < 1e-9);
        assert!(timers.is_empty());
    }
}
