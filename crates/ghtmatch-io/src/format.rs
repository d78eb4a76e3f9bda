//! Formats and header sniffing

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Image file formats understood by the reader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG (decode only)
    Jpeg,
    /// Binary PBM / PGM / PPM
    Pnm,
}

impl ImageFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Pnm => "pnm",
        }
    }

    /// Guess the format from a path's extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "pnm" | "pbm" | "pgm" | "ppm" => Some(ImageFormat::Pnm),
            _ => None,
        }
    }
}

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];
/// Binary PBM, PGM and PPM; the plain-text variants are not read.
const PNM_BINARY: [&[u8]; 3] = [b"P4", b"P5", b"P6"];

/// Sniff the format of the file at `path` from its first bytes.
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut header = [0u8; 12];
    let n = File::open(path)?.read(&mut header)?;
    detect_format_from_bytes(&header[..n])
}

/// Sniff the format of an in-memory image.
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(format!(
            "{} byte header is too short to identify",
            data.len()
        )));
    }
    if data.starts_with(PNG_SIGNATURE) {
        Ok(ImageFormat::Png)
    } else if data.starts_with(JPEG_SOI) {
        Ok(ImageFormat::Jpeg)
    } else if PNM_BINARY.contains(&&data[..2]) {
        Ok(ImageFormat::Pnm)
    } else {
        Err(IoError::UnsupportedFormat(format!(
            "unrecognized header {:02x?}",
            &data[..data.len().min(4)]
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let data = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_pnm() {
        assert_eq!(
            detect_format_from_bytes(b"P5\n100 100\n255\n").unwrap(),
            ImageFormat::Pnm
        );
        assert_eq!(
            detect_format_from_bytes(b"P4\n8 1\n\xff").unwrap(),
            ImageFormat::Pnm
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_format_from_bytes(b"GIF89a\x00\x00").is_err());
        assert!(detect_format_from_bytes(b"P").is_err());
    }

    #[test]
    fn test_from_path() {
        assert_eq!(ImageFormat::from_path("a/b.PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path("x.jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("x.pgm"), Some(ImageFormat::Pnm));
        assert_eq!(ImageFormat::from_path("x.tif"), None);
        assert_eq!(ImageFormat::from_path("noext"), None);
    }
}
