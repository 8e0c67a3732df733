use image::RgbaImage;
use std::f32::consts::TAU;
use std::path::Path;

/// A swarm target derived from one opaque pixel of the source mask.
///
/// Coordinates are offsets from the image center in source-pixel units;
/// `weight` is the pixel's alpha mapped to (0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPoint {
    pub local_x: f32,
    pub local_y: f32,
    pub weight: f32,
}

/// Scan the image's alpha channel at `stride` in both axes and collect
/// anchors for pixels whose alpha exceeds `alpha_threshold`.
///
/// Anchors come back in raster order (row-major) and the scan stops the
/// moment `max_points` is reached, so a tight cap favours earlier rows.
/// Output is fully determined by the inputs.
pub fn sample(
    image: &RgbaImage,
    stride: u32,
    alpha_threshold: u8,
    max_points: usize,
) -> Vec<AnchorPoint> {
    let stride = stride.max(1);
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || max_points == 0 {
        return Vec::new();
    }

    let half_w = w as f32 * 0.5;
    let half_h = h as f32 * 0.5;
    let mut anchors = Vec::new();

    'scan: for y in (0..h).step_by(stride as usize) {
        for x in (0..w).step_by(stride as usize) {
            let alpha = image.get_pixel(x, y).0[3];
            if alpha <= alpha_threshold {
                continue;
            }
            anchors.push(AnchorPoint {
                local_x: x as f32 - half_w,
                local_y: y as f32 - half_h,
                weight: alpha as f32 / 255.0,
            });
            if anchors.len() >= max_points {
                break 'scan;
            }
        }
    }

    anchors
}

/// Decode a PNG mask from disk. Any failure means "no mask": the caller
/// falls back to the procedural symbol rather than erroring out.
pub fn load_mask(path: &str) -> Option<RgbaImage> {
    if !Path::new(path).exists() {
        return None;
    }
    image::open(path).ok().map(|img| img.to_rgba8())
}

/// Fallback anchor set when no usable mask exists: an abstract ritual
/// symbol traced as points. Outer halo ring, main circle, inner rhombus,
/// and an axial cross, each with its own weight so the swarm reproduces
/// the symbol's opacity layering.
pub fn procedural_symbol(base_size: f32, max_points: usize) -> Vec<AnchorPoint> {
    let mut anchors = Vec::new();
    if max_points == 0 || base_size <= 0.0 {
        return anchors;
    }

    let total = max_points.min(720);
    let halo_n = total * 3 / 10;
    let circle_n = total / 4;
    let rhombus_n = total / 4;
    let cross_n = total - halo_n - circle_n - rhombus_n;

    ring(&mut anchors, base_size * 1.15, halo_n, 0.45);
    ring(&mut anchors, base_size * 0.75, circle_n, 0.9);

    // Rhombus: four straight edges between the axis vertices at 0.55.
    let r = base_size * 0.55;
    let verts = [(0.0, -r), (r, 0.0), (0.0, r), (-r, 0.0), (0.0, -r)];
    let per_edge = (rhombus_n / 4).max(1);
    for pair in verts.windows(2) {
        for i in 0..per_edge {
            let t = i as f32 / per_edge as f32;
            anchors.push(AnchorPoint {
                local_x: pair[0].0 + (pair[1].0 - pair[0].0) * t,
                local_y: pair[0].1 + (pair[1].1 - pair[0].1) * t,
                weight: 0.78,
            });
        }
    }

    // Axial cross spanning +/- 0.9 on both axes.
    let arm = base_size * 0.9;
    let per_arm = (cross_n / 2).max(1);
    for i in 0..per_arm {
        let t = i as f32 / per_arm as f32 * 2.0 - 1.0;
        anchors.push(AnchorPoint {
            local_x: arm * t,
            local_y: 0.0,
            weight: 0.62,
        });
        anchors.push(AnchorPoint {
            local_x: 0.0,
            local_y: arm * t,
            weight: 0.62,
        });
    }

    anchors.truncate(max_points);
    anchors
}

fn ring(out: &mut Vec<AnchorPoint>, radius: f32, count: usize, weight: f32) {
    for i in 0..count.max(1) {
        let a = i as f32 / count.max(1) as f32 * TAU;
        out.push(AnchorPoint {
            local_x: radius * a.cos(),
            local_y: radius * a.sin(),
            weight,
        });
    }
}
