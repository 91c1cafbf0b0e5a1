//! Progress-driven rendering of markup onto a [`Surface`].

use crate::color::Rgb;
use crate::data::Segment;
use crate::icons::IconSource;
use crate::markup::{parse_lines, parse_markup};
use crate::metrics::{segments_length, visible_units};
use crate::surface::{Align, Baseline, Surface, SurfaceError};

/// Line height as a ratio of font size for multi-line rendering.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Per-call rendering configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// CSS-style font family list
    pub font_family: String,
    /// Font size in pixels; also the side length of icon glyphs
    pub font_size: f64,
    /// Fill color for text and icons
    pub color: Rgb,
    /// Anchor x in pixels
    pub x: f64,
    /// Anchor y in pixels
    pub y: f64,
    /// Horizontal alignment relative to `x`
    pub align: Align,
    /// Text baseline relative to `y`
    pub baseline: Baseline,
}

impl RenderOptions {
    /// Create options with the given font size and default everything else.
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    /// Get the line height for multi-line rendering.
    #[inline]
    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_RATIO
    }

    /// Vertical offset applied to icons so their center sits on the text's
    /// apparent mid-line. Icons are always drawn middle-aligned.
    #[inline]
    pub fn icon_offset(&self) -> f64 {
        match self.baseline {
            Baseline::Top => self.font_size / 2.0,
            Baseline::Middle => 0.0,
            Baseline::Alphabetic | Baseline::Bottom => -self.font_size / 3.0,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            font_size: 36.0,
            color: (0, 0, 0),
            x: 0.0,
            y: 0.0,
            align: Align::Start,
            baseline: Baseline::Top,
        }
    }
}

/// Render the prefix of `markup` that corresponds to `progress`.
///
/// `progress` is clamped to `[0, 1]` and mapped to a floored number of
/// reveal units. Text is revealed character by character; icons are atomic.
/// Returns the number of units drawn.
///
/// ## Example
///
/// ```rust
/// use textreveal_core::{render_progress, IconRegistry, RecordingSurface, RenderOptions};
///
/// let icons = IconRegistry::material();
/// let mut surface = RecordingSurface::new();
/// let options = RenderOptions::new(20.0);
///
/// let markup = "Hi [icon:star] there";
/// let drawn = render_progress(&mut surface, markup, 0.5, &options, &icons).unwrap();
/// assert_eq!(drawn, 5);
/// // "Hi ", the star ligature, then the space before "there"
/// assert_eq!(surface.drawn_text(), "Hi star ");
/// ```
pub fn render_progress(
    surface: &mut dyn Surface,
    markup: &str,
    progress: f64,
    options: &RenderOptions,
    icons: &dyn IconSource,
) -> Result<usize, SurfaceError> {
    let segments = parse_markup(markup, icons);
    let budget = visible_units(segments_length(&segments), progress);
    if budget == 0 {
        return Ok(0);
    }
    draw_segments(surface, &segments, budget, options, options.y, icons)
}

/// Render complete multi-line markup without progress clipping.
///
/// Lines are split on `\n` and each is parsed and drawn independently,
/// `line_height()` apart, starting at `options.y`.
pub fn render_static(
    surface: &mut dyn Surface,
    markup: &str,
    options: &RenderOptions,
    icons: &dyn IconSource,
) -> Result<(), SurfaceError> {
    let line_height = options.line_height();
    for (index, segments) in parse_lines(markup, icons).iter().enumerate() {
        if segments.is_empty() {
            continue;
        }
        let y = options.y + index as f64 * line_height;
        draw_segments(surface, segments, usize::MAX, options, y, icons)?;
    }
    Ok(())
}

/// Full, unclipped width of `segments` in the options' font.
///
/// Icons measure exactly one font size wide.
pub fn measure_segments(
    surface: &mut dyn Surface,
    segments: &[Segment],
    options: &RenderOptions,
) -> Result<f64, SurfaceError> {
    surface.set_font(&options.font_family, options.font_size)?;
    let mut width = 0.0;
    for segment in segments {
        width += match segment {
            Segment::Text(content) => surface.measure_text_width(content)?,
            Segment::Icon(_) => options.font_size,
        };
    }
    Ok(width)
}

fn draw_segments(
    surface: &mut dyn Surface,
    segments: &[Segment],
    budget: usize,
    options: &RenderOptions,
    y: f64,
    icons: &dyn IconSource,
) -> Result<usize, SurfaceError> {
    let mut cursor = match options.align {
        Align::Start => options.x,
        Align::Center => options.x - measure_segments(surface, segments, options)? / 2.0,
        Align::End => options.x - measure_segments(surface, segments, options)?,
    };
    let icon_y = y + options.icon_offset();
    let mut consumed = 0;

    for segment in segments {
        if consumed >= budget {
            break;
        }
        match segment {
            Segment::Text(content) => {
                let take = content.chars().count().min(budget - consumed);
                if take == 0 {
                    break;
                }
                let visible = char_prefix(content, take);
                // Icons may have switched fonts since the last text run.
                surface.set_font(&options.font_family, options.font_size)?;
                surface.fill_text(visible, cursor, y, options.baseline, options.color)?;
                cursor += surface.measure_text_width(visible)?;
                consumed += take;
            }
            Segment::Icon(id) => {
                if let Some(icon) = icons.lookup(id) {
                    icon.draw(surface, cursor, icon_y, options.font_size, options.color)?;
                }
                cursor += options.font_size;
                consumed += 1;
            }
        }
    }
    Ok(consumed)
}

/// The first `count` characters of `s`.
fn char_prefix(s: &str, count: usize) -> &str {
    match s.char_indices().nth(count) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Web-specific rendering implementation.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use crate::color::css_rgb;
    use crate::data::Bitmap;
    use crate::surface::ExportSurface;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    fn js_error(operation: &'static str) -> impl Fn(JsValue) -> SurfaceError {
        move |err| SurfaceError::Operation {
            operation,
            message: format!("{err:?}"),
        }
    }

    /// [`Surface`] over an HTML canvas 2D context.
    #[derive(Clone, Debug)]
    pub struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasSurface {
        /// Acquire the 2D context of `canvas`.
        pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
            let ctx = canvas
                .get_context("2d")
                .map_err(|_| SurfaceError::Unavailable("failed to get 2d context".into()))?
                .ok_or_else(|| SurfaceError::Unavailable("no 2d context available".into()))?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| {
                    SurfaceError::Unavailable("failed to cast to CanvasRenderingContext2d".into())
                })?;
            Ok(Self { ctx })
        }

        /// The underlying 2D context.
        pub fn context(&self) -> &CanvasRenderingContext2d {
            &self.ctx
        }
    }

    impl Surface for CanvasSurface {
        fn set_font(&mut self, family: &str, size: f64) -> Result<(), SurfaceError> {
            self.ctx.set_font(&format!("{}px {}", size, family));
            Ok(())
        }

        fn measure_text_width(&self, text: &str) -> Result<f64, SurfaceError> {
            self.ctx
                .measure_text(text)
                .map(|metrics| metrics.width())
                .map_err(js_error("measureText"))
        }

        fn fill_text(
            &mut self,
            text: &str,
            x: f64,
            y: f64,
            baseline: Baseline,
            color: Rgb,
        ) -> Result<(), SurfaceError> {
            self.ctx.set_text_baseline(baseline.as_str());
            self.ctx.set_fill_style_str(&css_rgb(color));
            self.ctx.fill_text(text, x, y).map_err(js_error("fillText"))
        }

        fn clear_and_fill(&mut self, color: Rgb) -> Result<(), SurfaceError> {
            let (width, height) = self.size();
            self.ctx.set_fill_style_str(&css_rgb(color));
            self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
            Ok(())
        }
    }

    impl ExportSurface for CanvasSurface {
        fn size(&self) -> (u32, u32) {
            self.ctx
                .canvas()
                .map(|canvas| (canvas.width(), canvas.height()))
                .unwrap_or((0, 0))
        }

        fn snapshot(&self) -> Result<Bitmap, SurfaceError> {
            let (width, height) = self.size();
            let image = self
                .ctx
                .get_image_data(0.0, 0.0, width as f64, height as f64)
                .map_err(js_error("getImageData"))?;
            Ok(Bitmap::new(image.width(), image.height(), image.data().0))
        }
    }

    /// Clear `canvas` to `background` and render `markup` at `progress`.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// use textreveal_core::render::web::render_to_canvas;
    ///
    /// let canvas: web_sys::HtmlCanvasElement = // ... get canvas element
    /// render_to_canvas(&canvas, "Hi [icon:star]", 0.5, &options, (255, 255, 255), &icons)?;
    /// ```
    pub fn render_to_canvas(
        canvas: &HtmlCanvasElement,
        markup: &str,
        progress: f64,
        options: &RenderOptions,
        background: Rgb,
        icons: &dyn IconSource,
    ) -> Result<usize, SurfaceError> {
        let mut surface = CanvasSurface::from_canvas(canvas)?;
        surface.clear_and_fill(background)?;
        render_progress(&mut surface, markup, progress, options, icons)
    }

    /// Resolve on the next microtask, letting the browser process events.
    pub async fn yield_to_event_loop() {
        let promise = js_sys::Promise::resolve(&JsValue::NULL);
        // A resolved promise cannot reject.
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::{IconRegistry, MATERIAL_ICONS_FAMILY};
    use crate::recording::{DrawCommand, RecordingSurface};

    const EPS: f64 = 1e-9;

    fn texts(surface: &RecordingSurface) -> Vec<(String, f64, f64, String)> {
        surface
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, x, y, font, .. } => {
                    Some((text.clone(), *x, *y, font.clone()))
                }
                DrawCommand::Clear { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_half_progress_reveals_five_units() {
        let icons = IconRegistry::material();
        let mut surface = RecordingSurface::new();
        let options = RenderOptions::new(10.0);

        let markup = "Hi [icon:star] there";
        let drawn = render_progress(&mut surface, markup, 0.5, &options, &icons).unwrap();
        assert_eq!(drawn, 5);

        let cmds = texts(&surface);
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0].0, "Hi ");
        assert!((cmds[0].1 - 0.0).abs() < EPS);
        // Icon after 3 chars * 6px
        assert_eq!(cmds[1].0, "star");
        assert_eq!(cmds[1].3, MATERIAL_ICONS_FAMILY);
        assert!((cmds[1].1 - 18.0).abs() < EPS);
        // Top baseline: icon centered half a font size below the origin
        assert!((cmds[1].2 - 5.0).abs() < EPS);
        // Text resumes one font size later, in the text font
        assert_eq!(cmds[2].0, " ");
        assert!((cmds[2].1 - 28.0).abs() < EPS);
        assert_eq!(cmds[2].3, "Arial, sans-serif");
    }

    #[test]
    fn test_fallback_marker_revealed_as_text() {
        let icons = IconRegistry::material();
        let mut surface = RecordingSurface::new();
        let options = RenderOptions::new(10.0);

        let drawn = render_progress(&mut surface, "[icon:unknown]", 0.5, &options, &icons).unwrap();
        assert_eq!(drawn, 7);
        assert_eq!(surface.drawn_text(), "[icon:u");
    }

    #[test]
    fn test_zero_and_full_progress() {
        let icons = IconRegistry::material();
        let options = RenderOptions::new(10.0);

        let mut surface = RecordingSurface::new();
        assert_eq!(render_progress(&mut surface, "abc", 0.0, &options, &icons).unwrap(), 0);
        assert!(surface.commands().is_empty());

        assert_eq!(render_progress(&mut surface, "", 1.0, &options, &icons).unwrap(), 0);
        assert!(surface.commands().is_empty());

        assert_eq!(render_progress(&mut surface, "abc", 1.0, &options, &icons).unwrap(), 3);
        assert_eq!(surface.drawn_text(), "abc");

        surface.reset();
        assert_eq!(render_progress(&mut surface, "abc", 7.5, &options, &icons).unwrap(), 3);
    }

    #[test]
    fn test_floor_semantics_on_single_unit() {
        let icons = IconRegistry::material();
        let options = RenderOptions::new(10.0);
        let mut surface = RecordingSurface::new();

        assert_eq!(render_progress(&mut surface, "x", 0.999999, &options, &icons).unwrap(), 0);
        assert!(surface.commands().is_empty());
        assert_eq!(render_progress(&mut surface, "x", 1.0, &options, &icons).unwrap(), 1);
        assert_eq!(surface.drawn_text(), "x");
    }

    #[test]
    fn test_no_state_leaks_between_calls() {
        let icons = IconRegistry::material();
        let options = RenderOptions::new(10.0);
        let markup = "ab [icon:home] cd";

        let mut first = RecordingSurface::new();
        render_progress(&mut first, markup, 0.0, &options, &icons).unwrap();
        let mut scratch = RecordingSurface::new();
        render_progress(&mut scratch, markup, 1.0, &options, &icons).unwrap();
        let mut again = RecordingSurface::new();
        render_progress(&mut again, markup, 0.0, &options, &icons).unwrap();
        assert_eq!(first.commands(), again.commands());

        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        render_progress(&mut a, markup, 0.6, &options, &icons).unwrap();
        render_progress(&mut b, markup, 0.6, &options, &icons).unwrap();
        assert_eq!(a.commands(), b.commands());
    }

    #[test]
    fn test_icon_is_atomic_and_stops_when_budget_spent() {
        let icons = IconRegistry::material();
        let options = RenderOptions::new(10.0);
        let mut surface = RecordingSurface::new();

        // 4 units total; 0.5 -> 2 units: "a" and the icon, not "b"
        let drawn = render_progress(&mut surface, "a[icon:star]bc", 0.5, &options, &icons).unwrap();
        assert_eq!(drawn, 2);
        assert_eq!(surface.drawn_text(), "astar");

        // 0.25 -> 1 unit: only "a"
        surface.reset();
        render_progress(&mut surface, "a[icon:star]bc", 0.25, &options, &icons).unwrap();
        assert_eq!(surface.drawn_text(), "a");
    }

    #[test]
    fn test_alignment_uses_full_width() {
        let icons = IconRegistry::material();
        let mut options = RenderOptions::new(10.0);
        options.x = 100.0;

        // Full width: "ab" = 12px + icon 10px = 22px
        options.align = Align::Center;
        let mut surface = RecordingSurface::new();
        render_progress(&mut surface, "ab[icon:star]", 0.34, &options, &icons).unwrap();
        let cmds = texts(&surface);
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].0, "a");
        assert!((cmds[0].1 - 89.0).abs() < EPS);

        options.align = Align::End;
        let mut surface = RecordingSurface::new();
        render_progress(&mut surface, "ab[icon:star]", 1.0, &options, &icons).unwrap();
        let cmds = texts(&surface);
        assert!((cmds[0].1 - 78.0).abs() < EPS);
        assert!((cmds[1].1 - 90.0).abs() < EPS);
    }

    #[test]
    fn test_icon_vertical_offsets() {
        let icons = IconRegistry::material();
        let mut options = RenderOptions::new(12.0);
        options.y = 50.0;

        for (baseline, expected) in [
            (Baseline::Top, 56.0),
            (Baseline::Middle, 50.0),
            (Baseline::Alphabetic, 46.0),
            (Baseline::Bottom, 46.0),
        ] {
            options.baseline = baseline;
            let mut surface = RecordingSurface::new();
            render_progress(&mut surface, "[icon:star]", 1.0, &options, &icons).unwrap();
            let cmds = texts(&surface);
            assert!((cmds[0].2 - expected).abs() < EPS, "{baseline:?}");
        }
    }

    /// Surface whose `fill_text` fails on the given call.
    struct FlakySurface {
        inner: RecordingSurface,
        fills: usize,
        fail_on: usize,
    }

    impl Surface for FlakySurface {
        fn set_font(&mut self, family: &str, size: f64) -> Result<(), SurfaceError> {
            self.inner.set_font(family, size)
        }

        fn measure_text_width(&self, text: &str) -> Result<f64, SurfaceError> {
            self.inner.measure_text_width(text)
        }

        fn fill_text(
            &mut self,
            text: &str,
            x: f64,
            y: f64,
            baseline: Baseline,
            color: Rgb,
        ) -> Result<(), SurfaceError> {
            self.fills += 1;
            if self.fills == self.fail_on {
                return Err(SurfaceError::Operation {
                    operation: "fillText",
                    message: "context lost".into(),
                });
            }
            self.inner.fill_text(text, x, y, baseline, color)
        }

        fn clear_and_fill(&mut self, color: Rgb) -> Result<(), SurfaceError> {
            self.inner.clear_and_fill(color)
        }
    }

    #[test]
    fn test_surface_error_stops_render() {
        let icons = IconRegistry::material();
        let options = RenderOptions::new(10.0);
        let mut surface = FlakySurface {
            inner: RecordingSurface::new(),
            fills: 0,
            fail_on: 2,
        };

        // Second fill is the icon; the trailing text is never drawn
        let err = render_progress(&mut surface, "ab [icon:star] cd", 1.0, &options, &icons)
            .unwrap_err();
        assert_eq!(
            err,
            SurfaceError::Operation {
                operation: "fillText",
                message: "context lost".into(),
            }
        );
        assert_eq!(surface.fills, 2);
        assert_eq!(surface.inner.drawn_text(), "ab ");
    }

    #[test]
    fn test_render_static_multiline() {
        let icons = IconRegistry::material();
        let mut options = RenderOptions::new(10.0);
        options.y = 5.0;
        let mut surface = RecordingSurface::new();

        render_static(&mut surface, "one\n\n[icon:star] three", &options, &icons).unwrap();
        let cmds = texts(&surface);
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0].0, "one");
        assert!((cmds[0].2 - 5.0).abs() < EPS);
        assert_eq!(cmds[1].0, "star");
        // Third line: 5 + 2 * 12, icon offset +5 for top baseline
        assert!((cmds[1].2 - 34.0).abs() < EPS);
        assert_eq!(cmds[2].0, " three");
        assert!((cmds[2].1 - 10.0).abs() < EPS);
        assert!((cmds[2].2 - 29.0).abs() < EPS);
    }

    #[test]
    fn test_measure_segments() {
        let icons = IconRegistry::material();
        let options = RenderOptions::new(10.0);
        let mut surface = RecordingSurface::new();
        let segments = parse_markup("abc[icon:star]", &icons);
        let width = measure_segments(&mut surface, &segments, &options).unwrap();
        assert!((width - 28.0).abs() < EPS);
    }

    #[test]
    fn test_char_prefix() {
        assert_eq!(char_prefix("héllo", 2), "hé");
        assert_eq!(char_prefix("abc", 10), "abc");
        assert_eq!(char_prefix("abc", 0), "");
    }

    #[test]
    fn test_line_height() {
        let options = RenderOptions::new(10.0);
        assert!((options.line_height() - 12.0).abs() < EPS);
    }
}
