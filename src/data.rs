//! Core data structures shared by rendering and export.

use crate::color::Rgb;

/// A typed unit of parsed markup.
///
/// Segments appear in document order. Each character of a `Text` segment and
/// each `Icon` segment counts as exactly one reveal unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// A run of plain characters
    Text(String),
    /// A reference to a registered icon id
    Icon(String),
}

impl Segment {
    /// Number of reveal units this segment contributes.
    #[inline]
    pub fn units(&self) -> usize {
        match self {
            Segment::Text(content) => content.chars().count(),
            Segment::Icon(_) => 1,
        }
    }
}

/// A captured RGBA frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA data as flat array (width * height * 4)
    /// Layout: [r0, g0, b0, a0, r1, g1, b1, a1, ...]
    pub rgba: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from raw RGBA data.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    /// Create an opaque bitmap filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let (r, g, b) = color;
        let rgba = [r, g, b, 255].repeat(width as usize * height as usize);
        Self { width, height, rgba }
    }

    /// Get the RGBA value at the given position.
    ///
    /// Returns None if position is out of bounds.
    #[inline]
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
