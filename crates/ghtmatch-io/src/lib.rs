//! ghtmatch-io - Image I/O for the shape matcher
//!
//! Reads templates and search images, writes annotated results.
//!
//! | Format | Read | Write | Feature      |
//! |--------|------|-------|--------------|
//! | PNG    | yes  | yes   | `png-format` |
//! | JPEG   | yes  | no    | `jpeg`       |
//! | PNM    | yes  | yes   | `pnm`        |

mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use ghtmatch_core::Pix;
use std::fs;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file path, detecting the format from its header.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let data = fs::read(path)?;
    read_image_mem(&data)
}

/// Read an image from an in-memory buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    let cursor = Cursor::new(data);
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(cursor),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(cursor),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(cursor),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support is not enabled",
            other
        ))),
    }
}

/// Write an image to a file path.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_to(pix, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into a byte vector.
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_image_to(pix, &mut buf, format)?;
    Ok(buf)
}

fn write_image_to<W: Write>(pix: &Pix, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(pix, writer),
        ImageFormat::Jpeg => Err(IoError::UnsupportedFormat(
            "JPEG writing is not supported".to_string(),
        )),
        #[allow(unreachable_patterns)]
        other => {
            let _ = writer;
            Err(IoError::UnsupportedFormat(format!(
                "{:?} support is not enabled",
                other
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghtmatch_core::PixelDepth;

    #[test]
    fn test_mem_roundtrip_detects_format() {
        let pix = Pix::from_data(2, 2, PixelDepth::Bit8, vec![1, 2, 3, 4]).unwrap();
        for format in [ImageFormat::Png, ImageFormat::Pnm] {
            let bytes = write_image_mem(&pix, format).unwrap();
            assert_eq!(detect_format_from_bytes(&bytes).unwrap(), format);
            let back = read_image_mem(&bytes).unwrap();
            assert_eq!(back.data(), pix.data());
        }
    }

    #[test]
    fn test_jpeg_write_rejected() {
        let pix = Pix::new(2, 2, PixelDepth::Bit8).unwrap();
        assert!(matches!(
            write_image_mem(&pix, ImageFormat::Jpeg),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_image("/nonexistent/dir/image.png"),
            Err(IoError::Io(_))
        ));
    }
}
