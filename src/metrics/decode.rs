use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::{ImageDecoder, ImageFormat, ImageReader};

/// Reads intrinsic pixel dimensions from encoded image bytes.
///
/// Only headers are parsed where the format allows it.
pub fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let format = image::guess_format(bytes).ok();

    // Animated GIFs report the logical screen size, which is what gets drawn.
    let (width, height) = if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes)).context("Failed to decode GIF header")?;
        decoder.dimensions()
    } else {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .context("Failed to guess image format")?
            .into_dimensions()
            .context("Failed to read dimensions")?
    };

    if width == 0 || height == 0 {
        return Err(anyhow!("Image reports empty dimensions {}x{}", width, height));
    }
    Ok((width, height))
}
