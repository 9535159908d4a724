//! Fixed-timestep accumulator.
//!
//! Frame times vary; the physics step wants a constant `dt`. The
//! [`FixedTimestep`] banks each frame's delta and pays it out in whole steps.
//! Frame deltas are capped (0.25 s by default) so one long stall doesn't
//! queue up seconds of catch-up steps.

/// Converts variable frame deltas into a count of fixed steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_frame_delta: f32,
    accumulator: f32,
    /// Fixed steps handed out so far.
    steps_taken: u64,
}

impl FixedTimestep {
    /// # Panics
    ///
    /// Panics if `step` isn't a positive finite number.
    pub fn new(step: f32) -> Self {
        assert!(
            step.is_finite() && step > 0.0,
            "fixed step must be positive and finite, got {step}"
        );
        Self {
            step,
            max_frame_delta: 0.25,
            accumulator: 0.0,
            steps_taken: 0,
        }
    }

    /// Cap on how much of one frame's delta gets banked.
    pub fn with_max_frame_delta(mut self, max: f32) -> Self {
        self.max_frame_delta = max;
        self
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Bank `frame_dt`, capped. Negative or non-finite deltas bank nothing.
    pub fn bank(&mut self, frame_dt: f32) {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt.min(self.max_frame_delta);
        }
    }

    /// Whether a whole step is banked.
    pub fn is_due(&self) -> bool {
        self.accumulator >= self.step
    }

    /// Pay one step out of the bank, if one is due. Call after the step has
    /// actually run.
    pub fn consume(&mut self) -> bool {
        if !self.is_due() {
            return false;
        }
        self.accumulator -= self.step;
        self.steps_taken += 1;
        true
    }

    /// Bank `frame_dt` and pay out every step that is due, returning the
    /// count. For callers whose steps can't fail.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.bank(frame_dt);
        let mut due = 0;
        while self.consume() {
            due += 1;
        }
        due
    }

    /// Time banked toward the next step, as a fraction of a step.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Drop any banked time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banks_partial_steps() {
        let mut ts = FixedTimestep::new(0.1);
        assert_eq!(ts.accumulate(0.05), 0);
        assert_eq!(ts.accumulate(0.06), 1);
        assert!((ts.alpha() - 0.1).abs() < 1e-4);
        assert_eq!(ts.steps_taken(), 1);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut ts = FixedTimestep::new(0.125);
        // 5 s stall only buys 0.25 s of simulation.
        assert_eq!(ts.accumulate(5.0), 2);
        let mut ts = FixedTimestep::new(0.125).with_max_frame_delta(1.0);
        assert_eq!(ts.accumulate(5.0), 8);
    }

    #[test]
    fn ignores_bad_deltas() {
        let mut ts = FixedTimestep::new(0.1);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn reset_drops_banked_time() {
        let mut ts = FixedTimestep::new(0.1);
        ts.accumulate(0.09);
        ts.reset();
        assert_eq!(ts.accumulate(0.02), 0);
    }

    #[test]
    fn steps_count_only_once_consumed() {
        let mut ts = FixedTimestep::new(0.125);
        ts.bank(0.25);
        assert!(ts.is_due());
        assert_eq!(ts.steps_taken(), 0);
        assert!(ts.consume());
        assert!(ts.consume());
        assert!(!ts.consume());
        assert_eq!(ts.steps_taken(), 2);
    }

    #[test]
    #[should_panic(expected = "fixed step must be positive")]
    fn zero_step_panics() {
        FixedTimestep::new(0.0);
    }
}
