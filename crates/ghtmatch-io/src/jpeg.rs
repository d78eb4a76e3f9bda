//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale files
//! decode to 8 bpp, color files to 32 bpp RGB. Writing is not supported.

use crate::{IoError, IoResult};
use ghtmatch_core::{Pix, PixMut, PixelDepth, color};
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::Read;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// A `Pix` at 8 bpp (grayscale) or 32 bpp (RGB or CMYK).
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG header".to_string()))?;

    let (width, height) = (info.width as u32, info.height as u32);
    let depth = match info.pixel_format {
        PixelFormat::L8 | PixelFormat::L16 => PixelDepth::Bit8,
        PixelFormat::RGB24 | PixelFormat::CMYK32 => PixelDepth::Bit32,
    };
    let bytes_per_pixel = match info.pixel_format {
        PixelFormat::L8 => 1,
        PixelFormat::L16 => 2,
        PixelFormat::RGB24 => 3,
        PixelFormat::CMYK32 => 4,
    };
    let expected = width as usize * height as usize * bytes_per_pixel;
    if pixels.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG buffer holds {} bytes, expected {}",
            pixels.len(),
            expected
        )));
    }

    let mut pix_mut = PixMut::new(width, height, depth)?;
    for (dst, px) in pix_mut
        .data_mut()
        .iter_mut()
        .zip(pixels.chunks_exact(bytes_per_pixel))
    {
        *dst = match info.pixel_format {
            PixelFormat::L8 => px[0] as u32,
            // big-endian 16-bit samples keep their high byte
            PixelFormat::L16 => px[0] as u32,
            PixelFormat::RGB24 => color::compose_rgb(px[0], px[1], px[2]),
            PixelFormat::CMYK32 => {
                // Adobe CMYK is stored inverted
                let k = px[3] as u32;
                let ch = |c: u8| ((c as u32 * k + 127) / 255) as u8;
                color::compose_rgb(ch(px[0]), ch(px[1]), ch(px[2]))
            }
        };
    }

    Ok(pix_mut.into())
}
