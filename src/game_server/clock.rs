//! Clock - Wall time to simulation delta
//!
//! Scheduling jitter can leave long gaps between ticks; the delta handed
//! to the integrator is capped so one late frame cannot teleport entities.

use std::time::Instant;

/// Default upper bound for a single integration step (seconds)
pub const MAX_DT: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct SimulationClock {
    last_tick: Instant,
    max_dt: f64,
}

impl SimulationClock {
    pub fn new(now: Instant, max_dt: f64) -> Self {
        Self { last_tick: now, max_dt }
    }

    /// Seconds since the previous tick, clamped to `[0, max_dt]`
    pub fn tick(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.clamp(elapsed)
    }

    pub fn clamp(&self, dt: f64) -> f64 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Restart measuring from `now`
    pub fn reset(&mut self, now: Instant) {
        self.last_tick = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn long_gap_is_clamped() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(start, MAX_DT);
        assert_eq!(clock.tick(start + Duration::from_secs(5)), MAX_DT);
    }

    #[test]
    fn short_gap_passes_through() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(start, MAX_DT);
        let dt = clock.tick(start + Duration::from_millis(25));
        assert!((dt - 0.025).abs() < 1e-9);
        let dt = clock.tick(start + Duration::from_millis(41));
        assert!((dt - 0.016).abs() < 1e-9);
    }

    #[test]
    fn time_going_backwards_gives_zero() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(start + Duration::from_millis(50), MAX_DT);
        assert_eq!(clock.tick(start), 0.0);
    }

    #[test]
    fn raw_deltas_are_sanitised() {
        let clock = SimulationClock::new(Instant::now(), MAX_DT);
        assert_eq!(clock.clamp(-1.0), 0.0);
        assert_eq!(clock.clamp(f64::NAN), 0.0);
        assert_eq!(clock.clamp(0.05), 0.05);
    }
}
