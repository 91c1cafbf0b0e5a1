//! Color parsing for text and background configuration values.

/// An RGB color as `(r, g, b)`.
pub type Rgb = (u8, u8, u8);

/// Foreground/background pair used by playback and export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Rgb,
    pub background: Rgb,
}

/// Parse a color string into an RGB tuple.
///
/// Accepts what an HTML color input or a hand-edited config produces:
/// `#RRGGBB`, the `#RGB` shorthand, or a CSS color keyword from
/// [`CSS_NAMED_COLORS`]. Case-insensitive, surrounding whitespace ignored.
///
/// ```rust
/// use textreveal_core::parse_color;
///
/// assert_eq!(parse_color("#ff8000"), Some((255, 128, 0)));
/// assert_eq!(parse_color("White"), Some((255, 255, 255)));
/// assert_eq!(parse_color("rebeccapurple"), Some((102, 51, 153)));
/// assert_eq!(parse_color("chartreuse-ish"), None);
/// ```
pub fn parse_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    match s.strip_prefix('#') {
        Some(digits) => parse_hex_digits(digits),
        None => named_color(s),
    }
}

/// Format a color as a CSS `rgb(r,g,b)` string.
pub fn css_rgb(color: Rgb) -> String {
    let (r, g, b) = color;
    format!("rgb({r},{g},{b})")
}

/// CSS color keywords accepted by [`parse_color`], sorted by name.
pub const CSS_NAMED_COLORS: [(&str, Rgb); 32] = [
    ("aqua", (0, 255, 255)),
    ("beige", (245, 245, 220)),
    ("black", (0, 0, 0)),
    ("blue", (0, 0, 255)),
    ("brown", (165, 42, 42)),
    ("crimson", (220, 20, 60)),
    ("cyan", (0, 255, 255)),
    ("darkblue", (0, 0, 139)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("fuchsia", (255, 0, 255)),
    ("gold", (255, 215, 0)),
    ("gray", (128, 128, 128)),
    ("green", (0, 128, 0)),
    ("grey", (128, 128, 128)),
    ("indigo", (75, 0, 130)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("lime", (0, 255, 0)),
    ("magenta", (255, 0, 255)),
    ("maroon", (128, 0, 0)),
    ("navy", (0, 0, 128)),
    ("olive", (128, 128, 0)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("purple", (128, 0, 128)),
    ("rebeccapurple", (102, 51, 153)),
    ("red", (255, 0, 0)),
    ("silver", (192, 192, 192)),
    ("teal", (0, 128, 128)),
    ("white", (255, 255, 255)),
    ("yellow", (255, 255, 0)),
];

fn named_color(name: &str) -> Option<Rgb> {
    let name = name.to_ascii_lowercase();
    CSS_NAMED_COLORS
        .binary_search_by(|(candidate, _)| (*candidate).cmp(name.as_str()))
        .ok()
        .map(|index| CSS_NAMED_COLORS[index].1)
}

fn parse_hex_digits(digits: &str) -> Option<Rgb> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    let channel = |shift: u32, mask: u32| ((value >> shift) & mask) as u8;
    match digits.len() {
        // Each shorthand nibble repeats: #abc == #aabbcc
        3 => Some((channel(8, 0xf) * 17, channel(4, 0xf) * 17, channel(0, 0xf) * 17)),
        6 => Some((channel(16, 0xff), channel(8, 0xff), channel(0, 0xff))),
        _ => None,
    }
}

impl Palette {
    /// Parse foreground and background color strings into a `Palette`.
    /// Falls back to black text on a white background for invalid values.
    pub fn from_strings(fg: &str, bg: &str) -> Self {
        Self {
            foreground: parse_color(fg).unwrap_or((0, 0, 0)),
            background: parse_color(bg).unwrap_or((255, 255, 255)),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: (0, 0, 0),
            background: (255, 255, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("black"),    Some((0, 0, 0)));
        assert_eq!(parse_color("white"),    Some((255, 255, 255)));
        assert_eq!(parse_color("green"),    Some((0, 128, 0)));
        assert_eq!(parse_color("grey"),     Some((128, 128, 128)));
        assert_eq!(parse_color("brown"),    Some((165, 42, 42)));
        assert_eq!(parse_color("Navy"),     Some((0, 0, 128)));
        assert_eq!(parse_color("  RED \n"), Some((255, 0, 0)));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color("#000000"), Some((0, 0, 0)));
        assert_eq!(parse_color("#FF0000"), Some((255, 0, 0)));
        assert_eq!(parse_color("#abc"),    Some((170, 187, 204)));
        assert_eq!(parse_color("  #fff "), Some((255, 255, 255)));
    }

    #[test]
    fn invalid_colors() {
        assert_eq!(parse_color(""),         None);
        assert_eq!(parse_color("#"),        None);
        assert_eq!(parse_color("#zz"),      None);
        assert_eq!(parse_color("#12345"),   None);
        assert_eq!(parse_color("#+12"),     None);
        assert_eq!(parse_color("#ééé"),     None);
        assert_eq!(parse_color("rgb(1,2,3)"), None);
    }

    #[test]
    fn named_table_is_sorted() {
        assert!(CSS_NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
        for (name, rgb) in CSS_NAMED_COLORS {
            assert_eq!(parse_color(name), Some(rgb), "{name}");
        }
    }

    #[test]
    fn palette_fallback() {
        let palette = Palette::from_strings("invalid", "alsobad");
        assert_eq!(palette, Palette::default());

        let palette = Palette::from_strings("#f6f6f6", "#1a1a2e");
        assert_eq!(palette.foreground, (246, 246, 246));
        assert_eq!(palette.background, (26, 26, 46));
    }

    #[test]
    fn css_formatting() {
        assert_eq!(css_rgb((255, 255, 255)), "rgb(255,255,255)");
        assert_eq!(css_rgb((26, 26, 46)), "rgb(26,26,46)");
    }
}
