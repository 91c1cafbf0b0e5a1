use crate::color::Palette;
use crate::export::Quality;
use crate::render::RenderOptions;
use crate::surface::{Align, Baseline};
use crate::timing::{MAX_SPEED, MIN_SPEED};

/// User-facing animation settings.
///
/// Every field has a default, so partial documents deserialize cleanly.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AnimationConfig {
    /// Markup to reveal
    pub text: String,
    /// CSS-style font family list
    pub font: String,
    pub font_size: f64,
    /// Text color string (`#RRGGBB`, `#RGB` or a color name)
    pub color: String,
    pub background_color: String,
    /// Speed setting (1-10)
    pub animation_speed: u8,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub export_quality: Quality,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            text: "Hello World!".to_string(),
            font: "Arial, sans-serif".to_string(),
            font_size: 36.0,
            color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            animation_speed: 5,
            canvas_width: 800,
            canvas_height: 400,
            export_quality: Quality::Medium,
        }
    }
}

impl AnimationConfig {
    /// Parse a TOML document into `AnimationConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// The speed setting clamped to 1-10.
    pub fn speed(&self) -> u8 {
        self.animation_speed.clamp(MIN_SPEED, MAX_SPEED)
    }

    /// Parsed text/background colors.
    ///
    /// Falls back to black text on white when a value is invalid.
    pub fn palette(&self) -> Palette {
        Palette::from_strings(&self.color, &self.background_color)
    }

    /// Options for rendering centered on the canvas.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            font_family: self.font.clone(),
            font_size: self.font_size,
            color: self.palette().foreground,
            x: f64::from(self.canvas_width) / 2.0,
            y: f64::from(self.canvas_height) / 2.0,
            align: Align::Center,
            baseline: Baseline::Middle,
        }
    }
}
