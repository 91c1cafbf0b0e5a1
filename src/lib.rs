//! # textreveal-core
//!
//! Progressive text reveal animation with inline icons.
//!
//! This crate provides platform-agnostic logic for:
//! - Parsing text with `[icon:<name>]` markers into segments
//! - Measuring content in reveal units (one per character, one per icon)
//! - Rendering the prefix of content that matches an animation progress
//! - Pacing live playback from a host frame clock
//! - Sampling a fixed, reproducible frame sequence for export
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for data structures
//! - `toml` - Load [`AnimationConfig`] from TOML
//! - `web` - Enable web/WASM canvas rendering support
//! - `gif` - GIF frame sink backed by the `image` crate
//!
//! ## Example
//!
//! ```rust
//! use textreveal_core::{
//!     render_progress, AnimationEngine, FrameSampler, IconRegistry, Quality,
//!     RecordingSurface, RenderOptions,
//! };
//!
//! let icons = IconRegistry::material();
//! let markup = "Hi [icon:star] there";
//!
//! // Live playback: the host calls tick() once per display refresh
//! let mut engine = AnimationEngine::new(5);
//! engine.set_content(markup, &icons);
//! engine.play();
//! engine.tick(0.0);
//! engine.tick(16.0);
//!
//! let mut surface = RecordingSurface::new();
//! engine.render_frame(&mut surface, markup, &RenderOptions::default(), &icons).unwrap();
//!
//! // Export: a fixed set of progress samples
//! let samples = FrameSampler::default().samples(5, Quality::Medium);
//! assert_eq!(samples.last().unwrap().progress, 1.0);
//!
//! // Rendering is a pure function of progress
//! let mut surface = RecordingSurface::new();
//! let options = RenderOptions::default();
//! let drawn = render_progress(&mut surface, markup, 1.0, &options, &icons).unwrap();
//! assert_eq!(drawn, 10);
//! ```

mod animation;
mod color;
mod config;
mod data;
pub mod export;
#[cfg(feature = "gif")]
mod gif;
mod icons;
mod markup;
mod metrics;
mod recording;
pub mod render;
mod surface;
pub mod timing;

pub use animation::{AnimationEngine, LoopMode, PlaybackState};
pub use color::{css_rgb, parse_color, Palette, Rgb, CSS_NAMED_COLORS};
pub use config::AnimationConfig;
pub use data::{Bitmap, Segment};
pub use export::{
    ExportError, ExportRequest, FrameSampler, FrameSink, ParseQualityError, Quality, QualityBand,
    Sample, SamplerTuning, SinkError,
};
pub use icons::{
    GlyphIcon, Icon, IconRegistry, IconSource, MATERIAL_ICONS_FAMILY, MATERIAL_ICON_IDS,
};
pub use markup::{parse_lines, parse_markup};
pub use metrics::{effective_length, segments_length, visible_units};
pub use recording::{DrawCommand, RecordingSurface};
pub use render::{
    measure_segments, render_progress, render_static, RenderOptions, LINE_HEIGHT_RATIO,
};
pub use surface::{Align, Baseline, ExportSurface, Surface, SurfaceError};
pub use timing::{TimingController, TimingState};

#[cfg(feature = "gif")]
pub use gif::GifSink;

#[cfg(feature = "web")]
pub use render::web::{render_to_canvas, CanvasSurface};
