//! PNM (Portable Any Map) format support
//!
//! Reads and writes PBM (P4 binary), PGM (P5 binary), and
//! PPM (P6 binary). PBM bits are stored as-is, so a set bit reads back
//! as pixel value 1.

use crate::{IoError, IoResult};
use ghtmatch_core::{Pix, PixMut, PixelDepth, color};
use std::io::{BufRead, Read, Write};

/// Read one whitespace-delimited header token, skipping `#` comments.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        let c = byte[0];
        if c == b'#' && token.is_empty() {
            let mut comment = Vec::new();
            reader.read_until(b'\n', &mut comment)?;
            continue;
        }
        if c.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(c as char);
    }
    if token.is_empty() {
        return Err(IoError::InvalidData("truncated PNM header".to_string()));
    }
    Ok(token)
}

fn read_number<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse::<u32>()
        .map_err(|_| IoError::InvalidData(format!("bad PNM {}: {:?}", what, token)))
}

/// Read a PNM image (P4/P5/P6) from a reader.
///
/// # Returns
/// A `Pix` at 1 bpp (PBM), 8 bpp (PGM), or 32 bpp (PPM). Samples with a
/// maxval other than 255 are rescaled to 0..=255.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Pix> {
    let magic = read_token(&mut reader)?;
    let (depth, channels) = match magic.as_str() {
        "P4" => (PixelDepth::Bit1, 0),
        "P5" => (PixelDepth::Bit8, 1),
        "P6" => (PixelDepth::Bit32, 3),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant {:?}",
                other
            )));
        }
    };
    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = if channels == 0 {
        1
    } else {
        read_number(&mut reader, "maxval")?
    };
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("bad PNM maxval {}", maxval)));
    }

    let mut pix_mut = PixMut::new(width, height, depth)?;
    let sample_bytes = if maxval > 255 { 2 } else { 1 };
    let row_bytes = if channels == 0 {
        width.div_ceil(8) as usize
    } else {
        width as usize * channels * sample_bytes
    };
    let mut row = vec![0u8; row_bytes];
    let scale = |v: u32| -> u8 { ((v * 255 + maxval / 2) / maxval) as u8 };

    for y in 0..height {
        reader
            .read_exact(&mut row)
            .map_err(|_| IoError::InvalidData("truncated PNM raster".to_string()))?;
        let sample = |i: usize| -> u32 {
            if sample_bytes == 2 {
                ((row[2 * i] as u32) << 8) | row[2 * i + 1] as u32
            } else {
                row[i] as u32
            }
        };
        let dst = pix_mut.row_mut(y);
        for (x, d) in dst.iter_mut().enumerate() {
            *d = match channels {
                0 => ((row[x / 8] >> (7 - x % 8)) & 1) as u32,
                1 => scale(sample(x)) as u32,
                _ => color::compose_rgb(
                    scale(sample(3 * x)),
                    scale(sample(3 * x + 1)),
                    scale(sample(3 * x + 2)),
                ),
            };
        }
    }

    Ok(pix_mut.into())
}

/// Write a `Pix` as binary PNM to a writer.
///
/// Chooses P4 (1 bpp), P5 (8 bpp grayscale), or P6 (32 bpp RGB)
/// based on the pixel depth.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let (w, h) = pix.dimensions();
    match pix.depth() {
        PixelDepth::Bit1 => write!(writer, "P4\n{} {}\n", w, h)?,
        PixelDepth::Bit8 => write!(writer, "P5\n{} {}\n255\n", w, h)?,
        PixelDepth::Bit32 => write!(writer, "P6\n{} {}\n255\n", w, h)?,
    }

    for y in 0..h {
        let src = pix.row(y);
        let bytes: Vec<u8> = match pix.depth() {
            PixelDepth::Bit1 => {
                let mut packed = vec![0u8; w.div_ceil(8) as usize];
                for (x, &v) in src.iter().enumerate() {
                    if v != 0 {
                        packed[x / 8] |= 0x80 >> (x % 8);
                    }
                }
                packed
            }
            PixelDepth::Bit8 => src.iter().map(|&v| v as u8).collect(),
            PixelDepth::Bit32 => src
                .iter()
                .flat_map(|&v| {
                    let (r, g, b) = color::extract_rgb(v);
                    [r, g, b]
                })
                .collect(),
        };
        writer.write_all(&bytes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_pgm_with_comment() {
        let mut data = b"P5\n# made by hand\n3 2\n255\n".to_vec();
        data.extend_from_slice(&[0, 10, 20, 30, 40, 255]);
        let pix = read_pnm(Cursor::new(data)).unwrap();
        assert_eq!(pix.dimensions(), (3, 2));
        assert_eq!(pix.data(), &[0, 10, 20, 30, 40, 255]);
    }

    #[test]
    fn test_read_pgm_rescales_maxval() {
        let mut data = b"P5 2 1 15 ".to_vec();
        data.extend_from_slice(&[15, 5]);
        let pix = read_pnm(Cursor::new(data)).unwrap();
        assert_eq!(pix.data(), &[255, 85]);
    }

    #[test]
    fn test_pbm_roundtrip() {
        let data: Vec<u32> = (0..10 * 2).map(|i| (i % 4 == 1) as u32).collect();
        let pix = Pix::from_data(10, 2, PixelDepth::Bit1, data).unwrap();
        let mut buf = Vec::new();
        write_pnm(&pix, &mut buf).unwrap();
        let back = read_pnm(Cursor::new(buf)).unwrap();
        assert_eq!(back.depth(), PixelDepth::Bit1);
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_truncated_raster() {
        let data = b"P6\n2 2\n255\n\x01\x02\x03".to_vec();
        assert!(read_pnm(Cursor::new(data)).is_err());
    }

    #[test]
    fn test_ascii_variant_rejected() {
        assert!(matches!(
            read_pnm(Cursor::new(b"P2\n1 1\n255\n0\n".to_vec())),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
