//! Icon resources referenced from markup.

use std::collections::BTreeMap;
use std::fmt;

use crate::color::Rgb;
use crate::surface::{Baseline, Surface, SurfaceError};

/// A drawable square icon glyph.
pub trait Icon {
    /// Draw the icon with its left edge at `x` and vertical center at `y`.
    fn draw(
        &self,
        surface: &mut dyn Surface,
        x: f64,
        y: f64,
        size: f64,
        color: Rgb,
    ) -> Result<(), SurfaceError>;
}

impl<F> Icon for F
where
    F: Fn(&mut dyn Surface, f64, f64, f64, Rgb) -> Result<(), SurfaceError>,
{
    fn draw(
        &self,
        surface: &mut dyn Surface,
        x: f64,
        y: f64,
        size: f64,
        color: Rgb,
    ) -> Result<(), SurfaceError> {
        self(surface, x, y, size, color)
    }
}

/// Lookup capability handed to the parser and renderer.
pub trait IconSource {
    /// Find the icon registered under `id`.
    fn lookup(&self, id: &str) -> Option<&dyn Icon>;

    /// Returns `true` when `id` resolves to an icon.
    fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }
}

/// An icon drawn as a ligature in an icon font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphIcon {
    /// Font family providing the ligature
    pub family: String,
    /// Text that the font turns into the glyph
    pub ligature: String,
}

impl GlyphIcon {
    pub fn new(family: impl Into<String>, ligature: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            ligature: ligature.into(),
        }
    }
}

impl Icon for GlyphIcon {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        x: f64,
        y: f64,
        size: f64,
        color: Rgb,
    ) -> Result<(), SurfaceError> {
        surface.set_font(&self.family, size)?;
        surface.fill_text(&self.ligature, x, y, Baseline::Middle, color)
    }
}

/// Font family of the stock icon set.
pub const MATERIAL_ICONS_FAMILY: &str = "'Material Icons'";

/// Ids registered by [`IconRegistry::material`].
#[rustfmt::skip]
pub const MATERIAL_ICON_IDS: [&str; 47] = [
    "face", "favorite", "home", "settings", "star",
    "delete", "check_circle", "warning", "error",
    "mail", "phone", "person", "help", "info",
    "favorite_border", "schedule", "event", "cloud",
    "search", "sentiment_satisfied", "thumb_up",
    "add", "close", "refresh", "menu", "more_vert",
    "share", "send", "notifications", "done",
    "bookmark", "shopping_cart", "lock", "public",
    "access_time", "attach_file", "camera", "edit",
    "location_on", "mic", "play_arrow", "pause", "stop",
    "brightness_high", "wb_sunny", "nightlight", "flash_on",
];

/// Owned set of icons addressable by id.
///
/// ```rust
/// use textreveal_core::{IconRegistry, IconSource};
///
/// let icons = IconRegistry::material();
/// assert!(icons.contains("star"));
/// assert!(!icons.contains("Star"));
/// ```
#[derive(Default)]
pub struct IconRegistry {
    icons: BTreeMap<String, Box<dyn Icon>>,
}

impl IconRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the stock Material Icons set.
    pub fn material() -> Self {
        let mut registry = Self::new();
        for id in MATERIAL_ICON_IDS {
            registry.register(id, GlyphIcon::new(MATERIAL_ICONS_FAMILY, id));
        }
        tracing::debug!(count = registry.len(), "registered material icons");
        registry
    }

    /// Register `icon` under `id`, replacing any previous entry.
    pub fn register(&mut self, id: impl Into<String>, icon: impl Icon + 'static) {
        let id = id.into();
        tracing::trace!(%id, "register icon");
        self.icons.insert(id, Box::new(icon));
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.icons.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl IconSource for IconRegistry {
    fn lookup(&self, id: &str) -> Option<&dyn Icon> {
        self.icons.get(id).map(|icon| icon.as_ref())
    }
}

impl fmt::Debug for IconRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconRegistry")
            .field("ids", &self.icons.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};

    #[test]
    fn test_material_set() {
        let icons = IconRegistry::material();
        assert_eq!(icons.len(), MATERIAL_ICON_IDS.len());
        assert!(icons.contains("thumb_up"));
        assert!(icons.contains("flash_on"));
        assert!(!icons.contains("unknown"));
        assert!(!icons.contains(""));
    }

    #[test]
    fn test_glyph_icon_draws_ligature() {
        let icons = IconRegistry::material();
        let mut surface = RecordingSurface::new();
        let icon = icons.lookup("star").unwrap();
        icon.draw(&mut surface, 5.0, 50.0, 24.0, (255, 0, 0)).unwrap();

        assert_eq!(
            surface.commands(),
            &[DrawCommand::Text {
                text: "star".to_string(),
                x: 5.0,
                y: 50.0,
                font: MATERIAL_ICONS_FAMILY.to_string(),
                size: 24.0,
                baseline: Baseline::Middle,
                color: (255, 0, 0),
            }]
        );
    }

    #[test]
    fn test_closure_icon_and_replacement() {
        let mut icons = IconRegistry::new();
        assert!(icons.is_empty());
        icons.register("dot", GlyphIcon::new("serif", "."));
        icons.register(
            "dot",
            |surface: &mut dyn Surface, x: f64, y: f64, _size: f64, color: Rgb| {
                surface.fill_text("*", x, y, Baseline::Middle, color)
            },
        );
        assert_eq!(icons.len(), 1);
        assert_eq!(icons.ids().collect::<Vec<_>>(), vec!["dot"]);

        let mut surface = RecordingSurface::new();
        icons
            .lookup("dot")
            .unwrap()
            .draw(&mut surface, 1.0, 2.0, 8.0, (0, 0, 0))
            .unwrap();
        assert!(matches!(
            &surface.commands()[0],
            DrawCommand::Text { text, .. } if text == "*"
        ));
    }

    #[test]
    fn test_debug_lists_ids() {
        let mut icons = IconRegistry::new();
        icons.register("b", GlyphIcon::new("f", "b"));
        icons.register("a", GlyphIcon::new("f", "a"));
        assert_eq!(format!("{icons:?}"), r#"IconRegistry { ids: ["a", "b"] }"#);
    }
}
