//! Deterministic frame sampling for offline export.
//!
//! Live playback advances by wall-clock deltas, so its frame count depends on
//! the display. Export instead takes a fixed number of evenly spaced progress
//! samples with one constant delay, so the exported animation is the same on
//! every machine.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use crate::color::Rgb;
use crate::config::AnimationConfig;
use crate::data::Bitmap;
use crate::icons::IconSource;
use crate::render::{render_progress, RenderOptions};
use crate::surface::{ExportSurface, SurfaceError};
use crate::timing::{MAX_SPEED, MIN_SPEED, NORMAL_SPEED};

/// Export quality tier, trading frame count for output size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }

    /// GIF quantizer speed for this tier (1 = best colors, 30 = fastest).
    pub fn encoder_speed(self) -> i32 {
        match self {
            Quality::Low => 30,
            Quality::Medium => 10,
            Quality::High => 1,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a quality tier name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export quality {0:?} (expected low, medium or high)")]
pub struct ParseQualityError(pub String);

impl FromStr for Quality {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            _ => Err(ParseQualityError(s.to_string())),
        }
    }
}

/// Error raised by a frame sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("frame rejected: {0}")]
    Rejected(String),

    #[error("frame is {actual:?} but the sink expects {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[cfg(feature = "gif")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Error that aborts an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("surface failed during export: {0}")]
    Surface(#[from] SurfaceError),

    #[error("frame sink failed at frame {frame}: {source}")]
    Sink {
        frame: usize,
        #[source]
        source: SinkError,
    },
}

/// Consumer of exported frames, typically an encoder.
pub trait FrameSink {
    /// What `finish` produces.
    type Artifact;

    /// Accept one frame shown for `delay_ms` milliseconds.
    fn accept(&mut self, bitmap: &Bitmap, delay_ms: u32) -> Result<(), SinkError>;

    /// Complete the output.
    fn finish(self) -> Result<Self::Artifact, SinkError>
    where
        Self: Sized;
}

/// Frame-count calibration for one quality tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityBand {
    /// Frame count at the reference speed
    pub base_frames: u32,
    pub min_frames: u32,
    pub max_frames: u32,
}

/// Calibration constants for export sampling.
///
/// These are tuning parameters; override any of them to change how exports
/// are paced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerTuning {
    pub low: QualityBand,
    pub medium: QualityBand,
    pub high: QualityBand,
    /// Per-frame delay at the reference speed, in milliseconds
    pub base_delay_ms: f64,
    /// Smallest delay ever emitted, in milliseconds
    pub min_delay_ms: u32,
    /// Delays are rounded to a multiple of this, in milliseconds. GIF
    /// stores delays in centiseconds, so the default is 10; 0 or 1 keeps
    /// millisecond precision.
    pub delay_step_ms: u32,
    /// Speed at which `base_frames` and `base_delay_ms` apply
    pub reference_speed: u8,
}

impl Default for SamplerTuning {
    fn default() -> Self {
        Self {
            low: QualityBand {
                base_frames: 20,
                min_frames: 10,
                max_frames: 50,
            },
            medium: QualityBand {
                base_frames: 40,
                min_frames: 20,
                max_frames: 100,
            },
            high: QualityBand {
                base_frames: 60,
                min_frames: 30,
                max_frames: 150,
            },
            base_delay_ms: 30.0,
            // Browsers stretch GIF delays below 20ms to 100ms
            min_delay_ms: 20,
            delay_step_ms: 10,
            reference_speed: NORMAL_SPEED,
        }
    }
}

impl SamplerTuning {
    pub fn band(&self, quality: Quality) -> QualityBand {
        match quality {
            Quality::Low => self.low,
            Quality::Medium => self.medium,
            Quality::High => self.high,
        }
    }
}

/// One export frame: render at `progress`, show for `delay_ms`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub progress: f64,
    pub delay_ms: u32,
}

/// Everything an export needs besides the surface, sink and icons.
#[derive(Clone, Debug)]
pub struct ExportRequest<'a> {
    pub markup: &'a str,
    pub options: RenderOptions,
    pub background: Rgb,
    /// Speed setting (1-10)
    pub speed: u8,
    pub quality: Quality,
}

impl<'a> ExportRequest<'a> {
    /// Build a request from user configuration, centered on the canvas.
    pub fn from_config(config: &'a AnimationConfig) -> Self {
        Self {
            markup: &config.text,
            options: config.render_options(),
            background: config.palette().background,
            speed: config.speed(),
            quality: config.export_quality,
        }
    }
}

/// Derives export samples and drives the renderer once per sample.
///
/// ## Example
///
/// ```rust
/// use textreveal_core::{FrameSampler, Quality};
///
/// let sampler = FrameSampler::default();
/// let samples = sampler.samples(5, Quality::Medium);
///
/// assert_eq!(samples.len(), 41);
/// assert_eq!(samples[0].progress, 0.0);
/// assert_eq!(samples[40].progress, 1.0);
/// assert!(samples.iter().all(|s| s.delay_ms == 30));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameSampler {
    tuning: SamplerTuning,
}

impl FrameSampler {
    pub fn new(tuning: SamplerTuning) -> Self {
        Self { tuning }
    }

    #[inline]
    pub fn tuning(&self) -> &SamplerTuning {
        &self.tuning
    }

    /// Number of progress steps for an export.
    ///
    /// Faster speeds take fewer, larger steps: the base count is scaled by
    /// `sqrt(reference / speed)` and clamped to the tier's band.
    pub fn total_frames(&self, speed: u8, quality: Quality) -> u32 {
        let band = self.tuning.band(quality);
        let ratio = f64::from(self.tuning.reference_speed) / f64::from(clamp_speed(speed));
        let frames = (f64::from(band.base_frames) * ratio.sqrt()).round() as u32;
        frames.clamp(band.min_frames, band.max_frames.max(band.min_frames)).max(1)
    }

    /// Constant per-frame delay in milliseconds.
    ///
    /// The scaled base delay is rounded to the nearest `delay_step_ms` so a
    /// sink that stores coarser delays plays the same duration the samples
    /// advertise, then floored at `min_delay_ms`.
    pub fn frame_delay_ms(&self, speed: u8) -> u32 {
        let ratio = f64::from(self.tuning.reference_speed) / f64::from(clamp_speed(speed));
        let step = f64::from(self.tuning.delay_step_ms.max(1));
        let delay = ((self.tuning.base_delay_ms * ratio / step).round() * step).max(0.0) as u32;
        delay.max(self.tuning.min_delay_ms)
    }

    /// Samples at `i / total_frames` for `i = 0..=total_frames`.
    pub fn samples(&self, speed: u8, quality: Quality) -> Vec<Sample> {
        let total = self.total_frames(speed, quality);
        let delay_ms = self.frame_delay_ms(speed);
        (0..=total)
            .map(|i| Sample {
                progress: f64::from(i) / f64::from(total),
                delay_ms,
            })
            .collect()
    }

    /// Render every sample and hand each frame to `sink`.
    ///
    /// For each sample the surface is cleared to the background, the markup
    /// is rendered at the sample's progress, and the snapshot is passed to
    /// the sink. `on_progress` receives the completed fraction after each
    /// frame. The first failure aborts the export; the caller decides what
    /// to do with frames already accepted. Returns the number of frames.
    pub fn export<S, K>(
        &self,
        surface: &mut S,
        sink: &mut K,
        request: &ExportRequest<'_>,
        icons: &dyn IconSource,
        mut on_progress: impl FnMut(f64),
    ) -> Result<usize, ExportError>
    where
        S: ExportSurface,
        K: FrameSink,
    {
        let samples = self.begin(request);
        let total = samples.len();
        for (index, sample) in samples.iter().enumerate() {
            export_frame(surface, sink, request, icons, index, sample)?;
            on_progress((index + 1) as f64 / total as f64);
        }
        tracing::debug!(frames = total, "export finished");
        Ok(total)
    }

    /// Same as [`export`](Self::export), awaiting `yield_now()` between
    /// frames so a cooperative host scheduler can run.
    ///
    /// Frames are still rendered strictly in order.
    pub async fn export_yielding<S, K, Y, Fut>(
        &self,
        surface: &mut S,
        sink: &mut K,
        request: &ExportRequest<'_>,
        icons: &dyn IconSource,
        mut on_progress: impl FnMut(f64),
        mut yield_now: Y,
    ) -> Result<usize, ExportError>
    where
        S: ExportSurface,
        K: FrameSink,
        Y: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let samples = self.begin(request);
        let total = samples.len();
        for (index, sample) in samples.iter().enumerate() {
            export_frame(surface, sink, request, icons, index, sample)?;
            on_progress((index + 1) as f64 / total as f64);
            if index + 1 < total {
                yield_now().await;
            }
        }
        tracing::debug!(frames = total, "export finished");
        Ok(total)
    }

    fn begin(&self, request: &ExportRequest<'_>) -> Vec<Sample> {
        let samples = self.samples(request.speed, request.quality);
        tracing::debug!(
            frames = samples.len(),
            delay_ms = samples.first().map(|s| s.delay_ms),
            speed = request.speed,
            quality = %request.quality,
            "export started"
        );
        samples
    }
}

fn clamp_speed(speed: u8) -> u8 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

fn export_frame<S, K>(
    surface: &mut S,
    sink: &mut K,
    request: &ExportRequest<'_>,
    icons: &dyn IconSource,
    index: usize,
    sample: &Sample,
) -> Result<(), ExportError>
where
    S: ExportSurface,
    K: FrameSink,
{
    surface.clear_and_fill(request.background)?;
    render_progress(surface, request.markup, sample.progress, &request.options, icons)?;
    let bitmap = surface.snapshot()?;
    tracing::trace!(frame = index, progress = sample.progress, "frame rendered");
    sink.accept(&bitmap, sample.delay_ms).map_err(|source| {
        tracing::warn!(frame = index, error = %source, "frame sink rejected frame");
        ExportError::Sink {
            frame: index,
            source,
        }
    })
}
