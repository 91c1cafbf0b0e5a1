//! GIF frame sink backed by the `image` crate.

use std::io::Write;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::data::Bitmap;
use crate::export::{FrameSink, Quality, SinkError};

/// Encodes exported frames into a looping GIF written to `W`.
///
/// ## Example
///
/// ```rust,ignore
/// let mut out = Vec::new();
/// let mut sink = GifSink::new(&mut out, 800, 400, Quality::Medium)?;
/// FrameSampler::default().export(&mut surface, &mut sink, &request, &icons, |_| {})?;
/// sink.finish()?;
/// std::fs::write("animation.gif", out)?;
/// ```
pub struct GifSink<W: Write> {
    encoder: GifEncoder<W>,
    width: u32,
    height: u32,
    frames: usize,
}

impl<W: Write> GifSink<W> {
    /// Start a GIF of the given size. `quality` picks the quantizer effort.
    pub fn new(writer: W, width: u32, height: u32, quality: Quality) -> Result<Self, SinkError> {
        let mut encoder = GifEncoder::new_with_speed(writer, quality.encoder_speed());
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self {
            encoder,
            width,
            height,
            frames: 0,
        })
    }

    /// Frames encoded so far.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames
    }
}

impl<W: Write> FrameSink for GifSink<W> {
    /// Number of frames written.
    type Artifact = usize;

    fn accept(&mut self, bitmap: &Bitmap, delay_ms: u32) -> Result<(), SinkError> {
        if (bitmap.width, bitmap.height) != (self.width, self.height) {
            return Err(SinkError::SizeMismatch {
                expected: (self.width, self.height),
                actual: (bitmap.width, bitmap.height),
            });
        }
        let buffer = RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.rgba.clone())
            .ok_or_else(|| SinkError::Rejected("bitmap data shorter than its dimensions".into()))?;
        let frame = Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        self.encoder.encode_frame(frame)?;
        self.frames += 1;
        Ok(())
    }

    fn finish(self) -> Result<usize, SinkError> {
        let frames = self.frames;
        // Dropping the encoder writes the GIF trailer.
        drop(self.encoder);
        tracing::debug!(frames, "gif finished");
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_gif() {
        let mut out = Vec::new();
        {
            let mut sink = GifSink::new(&mut out, 2, 2, Quality::Low).unwrap();
            sink.accept(&Bitmap::filled(2, 2, (255, 255, 255)), 30).unwrap();
            sink.accept(&Bitmap::filled(2, 2, (0, 0, 0)), 30).unwrap();
            assert_eq!(sink.frame_count(), 2);
            assert_eq!(sink.finish().unwrap(), 2);
        }
        assert!(out.starts_with(b"GIF89a"));
        assert_eq!(out.last(), Some(&0x3b));
    }

    #[test]
    fn test_rejects_wrong_size() {
        let mut out = Vec::new();
        let mut sink = GifSink::new(&mut out, 4, 4, Quality::Medium).unwrap();
        let err = sink.accept(&Bitmap::filled(2, 2, (0, 0, 0)), 30).unwrap_err();
        assert!(matches!(
            err,
            SinkError::SizeMismatch {
                expected: (4, 4),
                actual: (2, 2)
            }
        ));

        let err = sink.accept(&Bitmap::new(4, 4, vec![0; 8]), 30).unwrap_err();
        assert!(matches!(err, SinkError::Rejected(_)));
        assert_eq!(sink.frame_count(), 0);
    }
}
