//! Playback engine for live, wall-clock driven reveals.

use crate::icons::IconSource;
use crate::metrics::effective_length;
use crate::render::{render_progress, RenderOptions};
use crate::surface::{Surface, SurfaceError};
use crate::timing::{self, TimingController, MAX_SPEED, MIN_SPEED, NORMAL_SPEED};

/// What happens when a reveal completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Stop at full progress
    #[default]
    Once,
    /// Rewind to the start and keep playing
    Loop,
}

/// Current state of the playback engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Never started, or restarted from scratch
    #[default]
    Idle,
    /// Advancing on each tick
    Playing,
    /// Halted; progress is kept
    Paused,
}

/// Platform-agnostic playback engine for progressive text reveals.
///
/// The engine owns the animation progress and does not schedule anything
/// itself. The host calls `tick()` once per display refresh while
/// `is_playing()` is true; stopping is simply not requesting the next tick.
///
/// ## Example
///
/// ```rust
/// use textreveal_core::{AnimationEngine, IconRegistry, PlaybackState};
///
/// let icons = IconRegistry::material();
/// let mut engine = AnimationEngine::new(5);
/// engine.set_content("Hello", &icons); // 5 units at 5 chars/s
///
/// engine.play();
/// assert_eq!(engine.state(), PlaybackState::Playing);
///
/// // Drive from the host's frame clock
/// assert!(!engine.tick(0.0));
/// assert!(!engine.tick(500.0));
/// assert!((engine.progress() - 0.5).abs() < 1e-9);
/// assert!(engine.tick(1000.0));
/// assert_eq!(engine.state(), PlaybackState::Paused);
/// ```
#[derive(Clone, Debug)]
pub struct AnimationEngine {
    /// Reveal progress in [0, 1]
    progress: f64,
    /// Wall-clock bookkeeping; reset together with progress
    timing: TimingController,
    /// Speed setting (1-10)
    speed: u8,
    /// Effective length of the current content
    effective_length: usize,
    /// Current playback state
    state: PlaybackState,
    /// Loop mode
    loop_mode: LoopMode,
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(NORMAL_SPEED)
    }
}

impl AnimationEngine {
    /// Create an idle engine at the given speed (clamped to 1-10).
    pub fn new(speed: u8) -> Self {
        Self {
            progress: 0.0,
            timing: TimingController::new(),
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            effective_length: 0,
            state: PlaybackState::Idle,
            loop_mode: LoopMode::Once,
        }
    }

    /// Set the content being revealed, measuring its effective length.
    pub fn set_content(&mut self, markup: &str, icons: &dyn IconSource) {
        self.effective_length = effective_length(markup, icons);
    }

    /// Set the effective length directly.
    pub fn set_effective_length(&mut self, units: usize) {
        self.effective_length = units;
    }

    #[inline]
    pub fn effective_length(&self) -> usize {
        self.effective_length
    }

    /// Set the speed setting (clamped to 1-10).
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    #[inline]
    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    #[inline]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if the engine wants another tick.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current progress in [0, 1].
    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Jump to a progress value (clamped to [0, 1]).
    pub fn seek(&mut self, progress: f64) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    /// Start or resume playback.
    ///
    /// Playing a finished reveal rewinds it first.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        if self.progress >= 1.0 {
            self.rewind();
        }
        self.state = PlaybackState::Playing;
    }

    /// Pause playback, keeping progress.
    ///
    /// The timing delta is reset so time spent paused is not counted.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            self.timing.reset();
        }
    }

    /// Toggle play/pause.
    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Idle | PlaybackState::Paused => self.play(),
        }
    }

    /// Reset progress and timing, keeping the playback state.
    pub fn restart(&mut self) {
        self.rewind();
    }

    /// Return to the initial idle state.
    pub fn reset(&mut self) {
        self.rewind();
        self.state = PlaybackState::Idle;
    }

    fn rewind(&mut self) {
        self.progress = 0.0;
        self.timing.reset();
    }

    /// Advance by a frame timestamp from the host clock.
    ///
    /// Returns true when this tick completed the reveal.
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        let delta = self.timing.delta(timestamp_ms);
        self.advance(delta)
    }

    /// Advance by an explicit elapsed time.
    ///
    /// Returns true when this step completed the reveal. Does nothing
    /// unless playing.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }

        let step = timing::progress_increment(delta_ms, self.speed, self.effective_length);
        self.progress = (self.progress + step).min(1.0);
        if self.progress < 1.0 {
            return false;
        }

        match self.loop_mode {
            LoopMode::Once => {
                self.state = PlaybackState::Paused;
                self.timing.reset();
                tracing::trace!("reveal complete");
            }
            LoopMode::Loop => {
                self.rewind();
                tracing::trace!("reveal complete, looping");
            }
        }
        true
    }

    /// Wall-clock time in milliseconds for a full reveal.
    pub fn estimated_duration_ms(&self) -> f64 {
        timing::estimated_duration_ms(self.speed, self.effective_length)
    }

    /// Render `markup` at the current progress.
    pub fn render_frame(
        &self,
        surface: &mut dyn Surface,
        markup: &str,
        options: &RenderOptions,
        icons: &dyn IconSource,
    ) -> Result<usize, SurfaceError> {
        render_progress(surface, markup, self.progress, options, icons)
    }

    /// Render `markup` at an explicit progress without touching engine state.
    pub fn render_frame_at(
        &self,
        surface: &mut dyn Surface,
        markup: &str,
        progress: f64,
        options: &RenderOptions,
        icons: &dyn IconSource,
    ) -> Result<usize, SurfaceError> {
        render_progress(surface, markup, progress, options, icons)
    }
}
