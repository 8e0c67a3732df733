use image::{Rgba, RgbaImage};
use sigildrift::mask::{load_mask, procedural_symbol, sample};

/// Build an image where every pixel has the given alpha.
fn uniform_alpha(w: u32, h: u32, alpha: u8) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, alpha]))
}

/// Alpha ramps left-to-right from 0 to 255.
fn gradient_alpha(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, _| {
        let a = (x as f32 / (w - 1).max(1) as f32 * 255.0) as u8;
        Rgba([255, 255, 255, a])
    })
}

#[test]
fn sample_respects_max_points() {
    let img = uniform_alpha(64, 64, 255);
    for cap in [1usize, 7, 100, 64 * 64, 10_000] {
        let anchors = sample(&img, 1, 0, cap);
        assert!(anchors.len() <= cap, "cap {} got {}", cap, anchors.len());
    }
}

#[test]
fn sample_is_deterministic() {
    let img = gradient_alpha(48, 32);
    let a = sample(&img, 3, 90, 500);
    let b = sample(&img, 3, 90, 500);
    assert_eq!(a, b);
}

#[test]
fn sample_scans_in_raster_order() {
    let img = uniform_alpha(16, 16, 200);
    let anchors = sample(&img, 2, 0, 1000);
    for pair in anchors.windows(2) {
        let earlier = (pair[0].local_y, pair[0].local_x);
        let later = (pair[1].local_y, pair[1].local_x);
        assert!(earlier < later, "not in raster order: {:?} then {:?}", pair[0], pair[1]);
    }
}

#[test]
fn sample_cap_favours_early_rows() {
    let img = uniform_alpha(10, 10, 255);
    // 10x10 at stride 1 has 100 candidates; cap at 20 keeps rows 0 and 1.
    let anchors = sample(&img, 1, 0, 20);
    assert_eq!(anchors.len(), 20);
    let max_y = anchors.iter().map(|a| a.local_y).fold(f32::MIN, f32::max);
    assert!(max_y < -3.0, "cap should truncate before lower rows, max_y={}", max_y);
}

#[test]
fn sample_threshold_is_strict() {
    let img = uniform_alpha(8, 8, 100);
    assert!(sample(&img, 1, 100, 1000).is_empty(), "alpha == threshold must be excluded");
    assert!(!sample(&img, 1, 99, 1000).is_empty(), "alpha > threshold must be included");
}

#[test]
fn sample_coordinates_are_center_relative() {
    let mut img = uniform_alpha(4, 4, 0);
    img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
    let anchors = sample(&img, 1, 0, 10);
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].local_x, -2.0);
    assert_eq!(anchors[0].local_y, -2.0);
    assert_eq!(anchors[0].weight, 1.0);
}

#[test]
fn sample_weight_scales_with_alpha() {
    let img = uniform_alpha(2, 2, 51);
    let anchors = sample(&img, 1, 0, 10);
    assert_eq!(anchors.len(), 4);
    for a in &anchors {
        assert!((a.weight - 0.2).abs() < 1e-3, "weight {}", a.weight);
    }
}

#[test]
fn sample_stride_skips_pixels() {
    let img = uniform_alpha(4, 4, 255);
    assert_eq!(sample(&img, 2, 0, 100).len(), 4);
    assert_eq!(sample(&img, 4, 0, 100).len(), 1);
    // Stride past the extent still samples the first pixel.
    assert_eq!(sample(&img, 99, 0, 100).len(), 1);
}

#[test]
fn sample_degenerate_inputs_yield_empty() {
    let img = uniform_alpha(8, 8, 255);
    assert!(sample(&img, 1, 0, 0).is_empty());
    assert!(sample(&uniform_alpha(8, 8, 0), 1, 0, 100).is_empty());
    let zero = RgbaImage::new(0, 0);
    assert!(sample(&zero, 1, 0, 100).is_empty());
}

#[test]
fn sample_stride_zero_is_treated_as_one() {
    let img = uniform_alpha(4, 4, 255);
    assert_eq!(sample(&img, 0, 0, 100).len(), 16);
}

#[test]
fn procedural_symbol_is_bounded_and_deterministic() {
    let a = procedural_symbol(100.0, 600);
    let b = procedural_symbol(100.0, 600);
    assert_eq!(a, b);
    assert!(!a.is_empty());
    assert!(a.len() <= 600);

    assert!(procedural_symbol(100.0, 25).len() <= 25);
    assert!(procedural_symbol(100.0, 0).is_empty());
    assert!(procedural_symbol(0.0, 100).is_empty());
}

#[test]
fn procedural_symbol_stays_inside_halo() {
    let anchors = procedural_symbol(100.0, 720);
    for a in &anchors {
        let r = (a.local_x * a.local_x + a.local_y * a.local_y).sqrt();
        assert!(r <= 115.0 + 1e-3, "anchor outside halo radius: {}", r);
        assert!(a.weight > 0.0 && a.weight <= 1.0, "weight {}", a.weight);
    }
    // The halo ring itself must be present.
    let on_halo = anchors
        .iter()
        .filter(|a| {
            let r = (a.local_x * a.local_x + a.local_y * a.local_y).sqrt();
            (r - 115.0).abs() < 0.5
        })
        .count();
    assert!(on_halo > 10, "halo ring missing ({} points)", on_halo);
}

#[test]
fn load_mask_missing_file_is_none() {
    assert!(load_mask("/nonexistent/definitely-not-here.png").is_none());
}
