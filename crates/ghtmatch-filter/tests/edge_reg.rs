//! Edge detection regression test
//!
//! Runs the blur + Canny chain on synthetic shapes and checks that the
//! detected edges hug the shape outline.

use ghtmatch_core::{Box, PixelDepth};
use ghtmatch_filter::{box_blur, canny, gradient_direction, sobel_gradients};
use ghtmatch_test::{RegParams, fixtures};

#[test]
fn edge_reg() {
    let mut rp = RegParams::new("edge");

    let rect = Box::new_unchecked(20, 16, 14, 10);
    let pixs = fixtures::filled_rect(60, 48, rect, 200).expect("fixture");
    let (w, h) = pixs.dimensions();

    // --- Test 1: blur keeps size and depth ---
    let blurred = box_blur(&pixs, 1).expect("box_blur");
    rp.compare_values(w as f64, blurred.width() as f64, 0.0);
    rp.compare_values(h as f64, blurred.height() as f64, 0.0);

    // --- Test 2: Canny produces a 1 bpp outline ---
    let edges = canny(&blurred, 60.0, 100.0).expect("canny");
    rp.check("edge mask is 1 bpp", edges.depth() == PixelDepth::Bit1);
    let count = edges.count_pixels();
    eprintln!("  edge pixels: {}", count);
    // straight runs clear of the corners: 2 * 6 rows + 2 * 10 columns
    rp.check("outline found", count >= 32);

    // --- Test 3: every edge pixel lies within 2 px of the outline ---
    let inside =
        |b: Box, x: i32, y: i32| (b.x..b.right()).contains(&x) && (b.y..b.bottom()).contains(&y);
    let outer = Box::new_unchecked(rect.x - 2, rect.y - 2, rect.w + 4, rect.h + 4);
    let inner = Box::new_unchecked(rect.x + 2, rect.y + 2, rect.w - 4, rect.h - 4);
    let near_outline = edges
        .data()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != 0)
        .all(|(i, _)| {
            let (x, y) = ((i as u32 % w) as i32, (i as u32 / w) as i32);
            inside(outer, x, y) && !inside(inner, x, y)
        });
    rp.check("edges hug the outline", near_outline);

    // --- Test 4: directions on the left side point right (into the bright shape) ---
    let (gx, gy) = sobel_gradients(&blurred).expect("sobel");
    let dir = gradient_direction(&gx, &gy).expect("direction");
    let left_mid = (rect.x as u32 - 1, (rect.y + rect.h / 2) as u32);
    let phi = dir.get_pixel(left_mid.0, left_mid.1).unwrap_or(f32::NAN);
    rp.compare_values(0.0, phi as f64, 1e-6);

    // --- Test 5: flat image has no edges ---
    let flat = fixtures::filled_rect(16, 16, Box::new_unchecked(0, 0, 16, 16), 90).unwrap();
    let none = canny(&flat, 60.0, 100.0).expect("canny flat");
    rp.compare_values(0.0, none.count_pixels() as f64, 0.0);

    // --- Test 6: 32 bpp is rejected ---
    let rgb = pixs.convert_to_32().unwrap();
    rp.check("rgb rejected", canny(&rgb, 60.0, 100.0).is_err());

    assert!(rp.cleanup(), "edge regression test failed");
}
