//! Fixed-timestep accumulator.
//!
//! Frames arrive with variable durations; physics advances in constant
//! sub-steps. [`FixedTimestep`] carries the unconsumed remainder from one
//! frame to the next so the number of sub-steps tracks elapsed time:
//!
//! ```
//! use runner_engine::timestep::FixedTimestep;
//!
//! let mut clock = FixedTimestep::new(0.01, 0.25);
//! assert_eq!(clock.advance(0.035), 3);
//! assert_eq!(clock.advance(0.01), 1);
//! assert!(clock.remainder() < 0.01);
//! ```

use tracing::warn;

/// Splits frame deltas into fixed sub-steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f64,
    max_frame_delta: f64,
    accumulator: f64,
    steps_taken: u64,
}

impl FixedTimestep {
    /// Create an accumulator with the given sub-step and per-frame clamp.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not positive and finite, or if `max_frame_delta`
    /// is smaller than `step`.
    pub fn new(step: f64, max_frame_delta: f64) -> Self {
        assert!(
            step > 0.0 && step.is_finite(),
            "fixed step must be positive and finite, got {step}"
        );
        assert!(
            max_frame_delta >= step && max_frame_delta.is_finite(),
            "max frame delta must be finite and at least one step, got {max_frame_delta}"
        );
        Self {
            step,
            max_frame_delta,
            accumulator: 0.0,
            steps_taken: 0,
        }
    }

    /// Add one frame's delta and return how many sub-steps to run now.
    ///
    /// The loop condition compares against the fixed step, so the remainder
    /// left behind is always smaller than one step. Deltas longer than the
    /// frame clamp are cut so a stalled frame cannot queue an unbounded
    /// backlog of sub-steps.
    pub fn advance(&mut self, delta: f64) -> u32 {
        let delta = if !delta.is_finite() || delta < 0.0 {
            warn!(delta, "ignoring invalid frame delta");
            0.0
        } else if delta > self.max_frame_delta {
            warn!(
                delta,
                clamp = self.max_frame_delta,
                "frame delta exceeds clamp, dropping backlog"
            );
            self.max_frame_delta
        } else {
            delta
        };

        self.accumulator += delta;
        let mut steps = 0u32;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        self.steps_taken += steps as u64;
        steps
    }

    /// The fixed sub-step in seconds.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Unconsumed time carried into the next frame.
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }

    /// Total sub-steps handed out since creation.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Simulated time consumed so far, computed as `steps * step` rather
    /// than by repeated addition.
    pub fn sim_time(&self) -> f64 {
        self.steps_taken as f64 * self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_shorter_than_step_carries_over() {
        let mut ts = FixedTimestep::new(0.1, 1.0);
        assert_eq!(ts.advance(0.04), 0);
        assert_eq!(ts.advance(0.04), 0);
        assert_eq!(ts.advance(0.04), 1);
        assert!((ts.remainder() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn sixty_hz_frames_at_300hz_steps() {
        let mut ts = FixedTimestep::new(1.0 / 300.0, 0.25);
        let mut total = 0;
        for _ in 0..60 {
            total += ts.advance(1.0 / 60.0);
        }
        // 1 second of frames; floating-point remainder may hold back one step.
        assert!((299..=300).contains(&total), "got {total}");
        assert_eq!(ts.steps_taken(), total as u64);
    }

    #[test]
    fn zero_delta_takes_no_steps() {
        let mut ts = FixedTimestep::new(0.01, 0.25);
        assert_eq!(ts.advance(0.0), 0);
        assert_eq!(ts.remainder(), 0.0);
    }

    #[test]
    fn negative_and_nan_deltas_are_ignored() {
        let mut ts = FixedTimestep::new(0.01, 0.25);
        assert_eq!(ts.advance(-1.0), 0);
        assert_eq!(ts.advance(f64::NAN), 0);
        assert_eq!(ts.remainder(), 0.0);
    }

    #[test]
    fn long_frame_is_clamped() {
        let mut ts = FixedTimestep::new(0.01, 0.1);
        let steps = ts.advance(5.0);
        assert!((9..=10).contains(&steps), "got {steps}");
        assert!(ts.remainder() < 0.01);
    }

    #[test]
    fn sim_time_is_steps_times_step() {
        let mut ts = FixedTimestep::new(0.1, 1.0);
        for _ in 0..1000 {
            ts.advance(0.1);
        }
        assert_eq!(ts.sim_time(), ts.steps_taken() as f64 * 0.1);
    }

    #[test]
    #[should_panic(expected = "fixed step must be positive")]
    fn zero_step_panics() {
        let _ = FixedTimestep::new(0.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "fixed step must be positive")]
    fn negative_step_panics() {
        let _ = FixedTimestep::new(-0.01, 1.0);
    }

    #[test]
    #[should_panic(expected = "max frame delta")]
    fn clamp_below_step_panics() {
        let _ = FixedTimestep::new(0.1, 0.01);
    }
}
