//! Image format regression test
//!
//! Writes synthetic images through every writable format, reads them
//! back from disk and checks they are pixel-identical.
//!
//! Run with:
//! ```
//! cargo test -p ghtmatch-io --test ioformats_reg
//! ```

use ghtmatch_core::{Box, Pix, PixelDepth};
use ghtmatch_io::{ImageFormat, detect_format, read_image, write_image};
use ghtmatch_test::{RegParams, fixtures, regout_dir};
use std::fs;

fn test_images() -> Vec<(&'static str, Pix)> {
    let gray = fixtures::filled_rect(37, 23, Box::new_unchecked(5, 4, 20, 11), 180).unwrap();
    let mask = fixtures::binary_from_points(37, 23, &fixtures::rect_outline(5, 4, 20, 11)).unwrap();
    let rgb = gray.convert_to_32().unwrap();
    vec![("gray", gray), ("mask", mask), ("rgb", rgb)]
}

#[test]
fn ioformats_reg() {
    let mut rp = RegParams::new("ioformats");
    let outdir = regout_dir();
    fs::create_dir_all(&outdir).expect("Failed to create output directory");

    for format in [ImageFormat::Png, ImageFormat::Pnm] {
        for (name, pix) in test_images() {
            let path = format!("{}/ioformats.{}.{}", outdir, name, format.extension());
            write_image(&pix, &path, format).expect("write failed");
            rp.check(
                &format!("{} detected as {:?}", path, format),
                detect_format(&path).ok() == Some(format),
            );
            let back = read_image(&path).expect("read failed");
            eprintln!(
                "  {:?} {}: {}x{} depth={}",
                format,
                name,
                back.width(),
                back.height(),
                back.depth().bits()
            );
            rp.compare_pix(&pix, &back);
        }
    }

    // 1 bpp survives as 1 bpp
    let (_, mask) = &test_images()[1];
    rp.compare_values(PixelDepth::Bit1.bits() as f64, mask.depth().bits() as f64, 0.0);
    rp.compare_values(58.0, mask.count_pixels() as f64, 0.0);

    assert!(rp.cleanup(), "ioformats regression test failed");
}
