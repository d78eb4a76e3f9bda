//! PNG image format support
//!
//! Decoding maps every PNG color type onto the three depths the matcher
//! works with:
//!
//! | PNG                     | Pix                    |
//! |-------------------------|------------------------|
//! | gray, 1 bit             | 1 bpp                  |
//! | gray, 2/4/8/16 bit      | 8 bpp (rescaled)       |
//! | gray + alpha            | 32 bpp, spp 4          |
//! | RGB / RGBA              | 32 bpp, spp 3 / 4      |
//! | indexed                 | 32 bpp via the palette |

use crate::{IoError, IoResult};
use ghtmatch_core::{Pix, PixMut, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Extract the `x`-th sample of `bits` bits from a packed row.
#[inline]
fn packed_sample(row: &[u8], x: usize, bits: usize) -> u8 {
    match bits {
        8 => row[x],
        16 => row[2 * x],
        _ => {
            let per_byte = 8 / bits;
            let shift = 8 - bits * (x % per_byte + 1);
            (row[x / per_byte] >> shift) & ((1u8 << bits) - 1)
        }
    }
}

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let (width, height) = (info.width, info.height);
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;
    let palette = info.palette.as_ref().map(|p| p.to_vec());

    let (pix_depth, spp) = match color_type {
        ColorType::Grayscale if bit_depth == BitDepth::One => (PixelDepth::Bit1, 1),
        ColorType::Grayscale => (PixelDepth::Bit8, 1),
        ColorType::GrayscaleAlpha => (PixelDepth::Bit32, 4),
        ColorType::Rgb => (PixelDepth::Bit32, 3),
        ColorType::Rgba => (PixelDepth::Bit32, 4),
        ColorType::Indexed => (PixelDepth::Bit32, 3),
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let mut pix_mut = PixMut::new(width, height, pix_depth)?;
    pix_mut.set_spp(spp);

    let bytes_per_row = output_info.line_size;
    let bits = bit_depth as usize;
    // 16-bit samples keep their high byte
    let step = if bits == 16 { 2 } else { 1 };
    let gray_scale = match bits {
        2 => 85,
        4 => 17,
        _ => 1,
    };

    for y in 0..height {
        let row_start = y as usize * bytes_per_row;
        let row = &buf[row_start..row_start + bytes_per_row];
        let dst = pix_mut.row_mut(y);
        for (x, d) in dst.iter_mut().enumerate() {
            *d = match color_type {
                ColorType::Grayscale if bits == 1 => packed_sample(row, x, 1) as u32,
                ColorType::Grayscale => packed_sample(row, x, bits) as u32 * gray_scale,
                ColorType::GrayscaleAlpha => {
                    let i = x * 2 * step;
                    let (g, a) = (row[i], row[i + step]);
                    color::compose_rgb(g, g, g) & !0xff | a as u32
                }
                ColorType::Rgb => {
                    let i = x * 3 * step;
                    color::compose_rgb(row[i], row[i + step], row[i + 2 * step])
                }
                ColorType::Rgba => {
                    let i = x * 4 * step;
                    let a = row[i + 3 * step];
                    color::compose_rgb(row[i], row[i + step], row[i + 2 * step]) & !0xff
                        | a as u32
                }
                ColorType::Indexed => {
                    let idx = packed_sample(row, x, bits) as usize;
                    let p = palette
                        .as_deref()
                        .and_then(|p| p.get(3 * idx..3 * idx + 3))
                        .ok_or_else(|| {
                            IoError::InvalidData(format!("palette index {} out of range", idx))
                        })?;
                    color::compose_rgb(p[0], p[1], p[2])
                }
            };
        }
    }

    Ok(pix_mut.into())
}

/// Write a PNG image
///
/// 1 bpp is written as 1-bit grayscale, 8 bpp as 8-bit grayscale and
/// 32 bpp as RGB (RGBA when `spp == 4`).
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, bit_depth, bytes_per_row) = match pix.depth() {
        PixelDepth::Bit1 => (ColorType::Grayscale, BitDepth::One, width.div_ceil(8)),
        PixelDepth::Bit8 => (ColorType::Grayscale, BitDepth::Eight, width),
        PixelDepth::Bit32 if pix.spp() == 4 => (ColorType::Rgba, BitDepth::Eight, width * 4),
        PixelDepth::Bit32 => (ColorType::Rgb, BitDepth::Eight, width * 3),
    };
    let bytes_per_row = bytes_per_row as usize;

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);
    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = vec![0u8; bytes_per_row * height as usize];
    for y in 0..height {
        let out = &mut data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for (x, &val) in pix.row(y).iter().enumerate() {
            match color_type {
                ColorType::Grayscale if bit_depth == BitDepth::One => {
                    if val != 0 {
                        out[x / 8] |= 0x80 >> (x % 8);
                    }
                }
                ColorType::Grayscale => out[x] = val as u8,
                ColorType::Rgb => {
                    let (r, g, b) = color::extract_rgb(val);
                    out[x * 3..x * 3 + 3].copy_from_slice(&[r, g, b]);
                }
                _ => {
                    let (r, g, b) = color::extract_rgb(val);
                    out[x * 4..x * 4 + 4].copy_from_slice(&[r, g, b, (val & 0xff) as u8]);
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(pix: &Pix) -> Pix {
        let mut buffer = Vec::new();
        write_png(pix, &mut buffer).unwrap();
        read_png(Cursor::new(buffer)).unwrap()
    }

    #[test]
    fn test_png_roundtrip_grayscale() {
        let mut pm = PixMut::new(10, 10, PixelDepth::Bit8).unwrap();
        for y in 0..10 {
            for x in 0..10 {
                pm.set_pixel(x, y, (x + y) * 10).unwrap();
            }
        }
        let pix: Pix = pm.into();
        let pix2 = roundtrip(&pix);
        assert_eq!(pix2.depth(), PixelDepth::Bit8);
        assert_eq!(pix2.data(), pix.data());
    }

    #[test]
    fn test_png_roundtrip_binary() {
        let data: Vec<u32> = (0..11 * 3).map(|i| (i % 3 == 0) as u32).collect();
        let pix = Pix::from_data(11, 3, PixelDepth::Bit1, data).unwrap();
        let pix2 = roundtrip(&pix);
        assert_eq!(pix2.depth(), PixelDepth::Bit1);
        assert_eq!(pix2.data(), pix.data());
    }

    #[test]
    fn test_png_roundtrip_rgb() {
        let mut pm = PixMut::new(5, 5, PixelDepth::Bit32).unwrap();
        pm.set_rgb(0, 0, 255, 0, 0).unwrap();
        pm.set_rgb(1, 1, 0, 255, 0).unwrap();
        pm.set_rgb(2, 2, 0, 0, 255).unwrap();
        let pix: Pix = pm.into();

        let pix2 = roundtrip(&pix);
        assert_eq!(pix2.get_rgb(0, 0), Some((255, 0, 0)));
        assert_eq!(pix2.get_rgb(1, 1), Some((0, 255, 0)));
        assert_eq!(pix2.get_rgb(2, 2), Some((0, 0, 255)));
    }

    #[test]
    fn test_packed_sample() {
        let row = [0b1011_0001u8, 0b0100_0000];
        assert_eq!(packed_sample(&row, 0, 1), 1);
        assert_eq!(packed_sample(&row, 1, 1), 0);
        assert_eq!(packed_sample(&row, 9, 1), 1);
        assert_eq!(packed_sample(&row, 0, 4), 0b1011);
        assert_eq!(packed_sample(&row, 3, 2), 0b01);
    }
}
