//! Frame timing and run state for the variable-step loop

use crate::consts::MAX_FRAME_DT;

/// Turns `requestAnimationFrame` timestamps (ms) into kernel deltas (s)
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`
    ///
    /// The first call after construction or `reset` returns 0: there is no
    /// previous timestamp to measure from. The cap keeps a backgrounded tab
    /// from teleporting balls through the floor when it comes back.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);

        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Forget the previous timestamp (next delta is 0)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Whether the animation loop should keep scheduling frames
///
/// `Paused` is the page sitting in the back/forward cache and may resume.
/// `Stopped` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Running,
    Paused,
    Stopped,
}

impl LoopState {
    #[inline]
    pub fn is_running(self) -> bool {
        self == LoopState::Running
    }

    /// Suspend a running loop; a stopped loop stays stopped
    pub fn pause(&mut self) {
        if *self == LoopState::Running {
            *self = LoopState::Paused;
        }
    }

    /// Returns `true` if the loop went from paused back to running
    pub fn resume(&mut self) -> bool {
        if *self == LoopState::Paused {
            *self = LoopState::Running;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        *self = LoopState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta(123456.0), 0.0);
        assert!((clock.delta(123472.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::default();
        clock.delta(1000.0);
        assert_eq!(clock.delta(900.0), 0.0);
        // Measured from the latest timestamp afterwards
        assert!((clock.delta(950.0) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_long_gap_is_capped() {
        let mut clock = FrameClock::new(0.1);
        clock.delta(0.0);
        assert_eq!(clock.delta(5000.0), 0.1);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::default();
        clock.delta(10.0);
        clock.reset();
        assert_eq!(clock.delta(5000.0), 0.0);
    }

    #[test]
    fn test_paused_loop_resumes() {
        let mut state = LoopState::default();
        assert!(state.is_running());

        state.pause();
        assert_eq!(state, LoopState::Paused);
        assert!(!state.is_running());

        assert!(state.resume());
        assert!(state.is_running());
        // Resuming a running loop does not schedule a second frame chain
        assert!(!state.resume());
    }

    #[test]
    fn test_stopped_loop_never_resumes() {
        let mut state = LoopState::default();
        state.stop();
        state.pause();
        assert_eq!(state, LoopState::Stopped);
        assert!(!state.resume());

        let mut paused = LoopState::Paused;
        paused.stop();
        assert!(!paused.resume());
    }
}
