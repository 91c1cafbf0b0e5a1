//! Headless surface that records draw commands.

use crate::color::Rgb;
use crate::surface::{Baseline, Surface, SurfaceError};

/// A single recorded draw call.
///
/// This is a platform-agnostic representation of what was drawn.
/// Each consumer can replay these commands on their rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Surface cleared to a solid color
    Clear { color: Rgb },
    /// Text drawn at a position
    Text {
        text: String,
        x: f64,
        y: f64,
        font: String,
        size: f64,
        baseline: Baseline,
        color: Rgb,
    },
}

/// A [`Surface`] that measures text with monospace metrics and records
/// every draw call instead of rasterizing.
///
/// ## Example
///
/// ```rust
/// use textreveal_core::{RecordingSurface, Surface};
///
/// let mut surface = RecordingSurface::new();
/// surface.set_font("monospace", 10.0).unwrap();
/// // 3 characters * 10px * 0.6
/// assert_eq!(surface.measure_text_width("abc").unwrap(), 18.0);
/// ```
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    /// Character width as a ratio of font size (typically 0.6 for monospace)
    pub char_width_ratio: f64,
    font: String,
    size: f64,
    commands: Vec<DrawCommand>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            font: "monospace".to_string(),
            size: 10.0,
            commands: Vec::new(),
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands recorded so far, in call order.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text of every `Text` command, concatenated in call order.
    pub fn drawn_text(&self) -> String {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                DrawCommand::Clear { .. } => None,
            })
            .collect()
    }

    /// Forget recorded commands, keeping the current font.
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn set_font(&mut self, family: &str, size: f64) -> Result<(), SurfaceError> {
        self.font = family.to_string();
        self.size = size;
        Ok(())
    }

    fn measure_text_width(&self, text: &str) -> Result<f64, SurfaceError> {
        Ok(text.chars().count() as f64 * self.size * self.char_width_ratio)
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        baseline: Baseline,
        color: Rgb,
    ) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            font: self.font.clone(),
            size: self.size,
            baseline,
            color,
        });
        Ok(())
    }

    fn clear_and_fill(&mut self, color: Rgb) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Clear { color });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new();
        surface.clear_and_fill((255, 255, 255)).unwrap();
        surface.set_font("serif", 20.0).unwrap();
        surface.fill_text("ab", 1.0, 2.0, Baseline::Top, (0, 0, 0)).unwrap();
        surface.fill_text("c", 3.0, 2.0, Baseline::Top, (0, 0, 0)).unwrap();

        assert_eq!(surface.commands().len(), 3);
        assert_eq!(surface.commands()[0], DrawCommand::Clear { color: (255, 255, 255) });
        assert_eq!(surface.drawn_text(), "abc");

        surface.reset();
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_measure_counts_chars_not_bytes() {
        let mut surface = RecordingSurface::new();
        surface.set_font("serif", 10.0).unwrap();
        assert_eq!(surface.measure_text_width("").unwrap(), 0.0);
        assert!((surface.measure_text_width("héé").unwrap() - 18.0).abs() < 1e-9);
    }
}
