//! Speed mapping and wall-clock progress pacing.

/// Slowest user speed setting.
pub const MIN_SPEED: u8 = 1;
/// Fastest user speed setting.
pub const MAX_SPEED: u8 = 10;
/// Speed setting that reveals at the nominal rate.
pub const NORMAL_SPEED: u8 = 5;
/// Characters revealed per second at [`NORMAL_SPEED`].
pub const BASE_CHARS_PER_SECOND: f64 = 5.0;

/// Map a 1..=10 speed setting to a rate multiplier.
///
/// Linear: 0.2 at speed 1, 1.0 at speed 5, 2.0 at speed 10.
#[inline]
pub fn speed_factor(speed: u8) -> f64 {
    0.2 + (f64::from(speed) - 1.0) * 0.2
}

/// Characters revealed per millisecond at `speed`.
#[inline]
pub fn chars_per_ms(speed: u8) -> f64 {
    BASE_CHARS_PER_SECOND * speed_factor(speed) / 1000.0
}

/// Progress gained over `delta_ms` for content of `effective_length` units.
///
/// ```rust
/// use textreveal_core::timing::progress_increment;
///
/// // 10 units at 5 chars/s: one second reveals half the content.
/// let step = progress_increment(1000.0, 5, 10);
/// assert!((step - 0.5).abs() < 1e-12);
/// ```
pub fn progress_increment(delta_ms: f64, speed: u8, effective_length: usize) -> f64 {
    delta_ms * chars_per_ms(speed) / effective_length.max(1) as f64
}

/// Wall-clock time in milliseconds for a full reveal at `speed`.
pub fn estimated_duration_ms(speed: u8, effective_length: usize) -> f64 {
    effective_length.max(1) as f64 / chars_per_ms(speed)
}

/// Whether the timing controller has seen a timestamp yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimingState {
    /// No timestamp recorded
    #[default]
    Idle,
    /// A previous timestamp is recorded
    Running,
}

/// Turns a stream of monotonic timestamps into frame deltas.
///
/// ## Example
///
/// ```rust
/// use textreveal_core::timing::{TimingController, TimingState};
///
/// let mut timing = TimingController::new();
/// assert_eq!(timing.delta(1000.0), 0.0);
/// assert_eq!(timing.state(), TimingState::Running);
/// assert_eq!(timing.delta(1016.0), 16.0);
///
/// timing.reset();
/// assert_eq!(timing.state(), TimingState::Idle);
/// assert_eq!(timing.delta(5000.0), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TimingController {
    last_timestamp: Option<f64>,
}

impl TimingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call; 0 on the first call after
    /// construction or reset. A timestamp earlier than the previous one
    /// yields 0.
    pub fn delta(&mut self, timestamp_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        delta
    }

    /// Forget the last timestamp.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }

    #[inline]
    pub fn state(&self) -> TimingState {
        match self.last_timestamp {
            Some(_) => TimingState::Running,
            None => TimingState::Idle,
        }
    }

    /// The last recorded timestamp, if any.
    #[inline]
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}
