//! Drawing-surface capability consumed by the renderer.
//!
//! The core never touches pixels. Everything it draws goes through the
//! [`Surface`] trait, which a host implements over its canvas of choice
//! (an HTML canvas with the `web` feature, a rasterizer, or the
//! [`RecordingSurface`](crate::RecordingSurface) used in tests).

use crate::color::Rgb;
use crate::data::Bitmap;

/// Error raised by a drawing-surface primitive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The underlying drawing context could not be obtained.
    #[error("drawing context unavailable: {0}")]
    Unavailable(String),

    /// A drawing primitive failed.
    #[error("{operation} failed: {message}")]
    Operation {
        operation: &'static str,
        message: String,
    },
}

/// Horizontal alignment of a rendered line relative to its anchor x.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Line starts at the anchor
    #[default]
    Start,
    /// Line is centered on the anchor
    Center,
    /// Line ends at the anchor
    End,
}

/// Vertical baseline mode for text, mirroring canvas `textBaseline`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Baseline {
    #[default]
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

impl Baseline {
    /// The canvas `textBaseline` keyword for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Baseline::Top => "top",
            Baseline::Middle => "middle",
            Baseline::Alphabetic => "alphabetic",
            Baseline::Bottom => "bottom",
        }
    }
}

/// Text drawing primitives a host surface must provide.
pub trait Surface {
    /// Select the font used by subsequent measure and fill calls.
    fn set_font(&mut self, family: &str, size: f64) -> Result<(), SurfaceError>;

    /// Width in pixels of `text` in the current font.
    fn measure_text_width(&self, text: &str) -> Result<f64, SurfaceError>;

    /// Draw `text` with its origin at `(x, y)`.
    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        baseline: Baseline,
        color: Rgb,
    ) -> Result<(), SurfaceError>;

    /// Clear the whole surface to a solid color.
    fn clear_and_fill(&mut self, color: Rgb) -> Result<(), SurfaceError>;
}

/// A surface whose current contents can be captured for export.
pub trait ExportSurface: Surface {
    /// Surface size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Capture the current contents as an RGBA bitmap.
    fn snapshot(&self) -> Result<Bitmap, SurfaceError>;
}
