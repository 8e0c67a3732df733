use crate::dynamics;
use crate::mask::{self, AnchorPoint};
use crate::quality::{QualityController, QualityLimits};
use crate::swarm::{ParticleSwarm, SwarmTuning};
use image::RgbaImage;

/// Per-tick inputs handed to a scene by the frame loop. `dt` arrives
/// pre-clamped; `t` is monotonic seconds since scene start.
#[derive(Clone, Copy, Debug)]
pub struct TickCtx {
    pub t: f32,
    pub dt: f32,
    pub w: usize,
    pub h: usize,
}

/// Discrete control signals originating from input handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlSignal {
    /// Pause/resume the swarm without discarding its state.
    ToggleSwarm,
    /// Throw away the particle collection and scatter a fresh one.
    Reseed,
    /// Retry loading the source image and re-sample the mask.
    ReloadImage,
}

/// A scene with explicit lifecycle hooks. Hooks a scene does not care
/// about keep their default no-op bodies.
pub trait Scene {
    fn name(&self) -> &'static str;
    fn init(&mut self, _w: usize, _h: usize) {}
    fn update(&mut self, ctx: &TickCtx);
    fn render(&mut self, ctx: &TickCtx, out: &mut [u8]);
    fn resize(&mut self, w: usize, h: usize);
    fn control(&mut self, _signal: ControlSignal) {}
    /// One-line diagnostics for the HUD.
    fn status(&self) -> String {
        String::new()
    }
    fn destroy(&mut self) {}
}

// Half-extent of the procedural symbol in anchor-local units (the halo
// ring sits at 1.15 * base size).
const SYMBOL_BASE: f32 = 100.0;

// Pale indigo, the sigil's stroke color.
const TINT: (f32, f32, f32) = (216.0, 221.0, 255.0);

/// The ambient sigil: a particle swarm migrating into the alpha mask of a
/// source image, or into a procedural ritual symbol when no mask decodes.
pub struct SigilScene {
    image_path: Option<String>,
    mask_image: Option<RgbaImage>,
    alpha_threshold: u8,
    max_anchors: usize,
    duality_period: f32,
    swarm: ParticleSwarm,
    quality: QualityController,
    /// Half-extent of the current anchor set, for projection scaling.
    extent: f32,
    /// Scene time of the latest tick, so reseeds triggered between ticks
    /// (quality steps, resizes, manual reseed) project at the rotation
    /// and pulse the viewer is actually looking at.
    last_t: f32,
    w: usize,
    h: usize,
}

impl SigilScene {
    pub fn new(
        image_path: Option<String>,
        alpha_threshold: u8,
        max_anchors: usize,
        duality_period: f32,
        limits: QualityLimits,
        adaptive: bool,
    ) -> Self {
        let tuning = SwarmTuning {
            min_budget: limits.min_particles,
            max_budget: limits.max_particles,
            ..SwarmTuning::default()
        };
        Self {
            image_path,
            mask_image: None,
            alpha_threshold,
            max_anchors,
            duality_period,
            swarm: ParticleSwarm::new(tuning),
            quality: QualityController::new(limits, adaptive),
            extent: SYMBOL_BASE * 1.15,
            last_t: 0.0,
            w: 0,
            h: 0,
        }
    }

    pub fn swarm(&self) -> &ParticleSwarm {
        &self.swarm
    }

    pub fn quality(&self) -> &QualityController {
        &self.quality
    }

    pub fn mask_source(&self) -> &'static str {
        if self.mask_image.is_some() { "image" } else { "symbol" }
    }

    /// Build the current anchor set. The image mask wins when present;
    /// an empty sample (fully transparent image, stride past the extent)
    /// falls back to the procedural symbol, same as having no image.
    fn sampled_anchors(&mut self) -> Vec<AnchorPoint> {
        let stride = self.quality.sample_stride();
        if let Some(img) = &self.mask_image {
            let anchors = mask::sample(img, stride, self.alpha_threshold, self.max_anchors);
            if !anchors.is_empty() {
                let (iw, ih) = img.dimensions();
                self.extent = (iw.max(ih) as f32 * 0.5).max(1.0);
                return anchors;
            }
        }
        self.extent = SYMBOL_BASE * 1.15;
        // Coarser stride thins the fallback symbol too.
        mask::procedural_symbol(SYMBOL_BASE, self.max_anchors / stride.max(1) as usize)
    }

    fn resample_and_reseed(&mut self) {
        let anchors = self.sampled_anchors();
        let proj = self.projection(self.last_t);
        self.swarm.set_anchors(
            anchors,
            self.w as f32,
            self.h as f32,
            self.quality.particle_budget(),
            &proj,
        );
    }

    fn reseed(&mut self) {
        let proj = self.projection(self.last_t);
        self.swarm.reseed(
            self.w as f32,
            self.h as f32,
            self.quality.particle_budget(),
            &proj,
        );
    }

    /// Anchor-local to scene-space mapping for time `t`: slow rotation, a
    /// breathing pulse on the scale, translation to the viewport center.
    /// Captures only plain floats so the swarm can hold it while mutating.
    fn projection(&self, t: f32) -> impl Fn(&AnchorPoint) -> (f32, f32) + use<> {
        let pulse = 1.0 + (t * 1.8).sin() * 0.05;
        let k = (self.w.min(self.h) as f32 * 0.35 * pulse) / self.extent.max(1.0);
        let ang = t * 0.04;
        let (sin, cos) = ang.sin_cos();
        let cx = self.w as f32 * 0.5;
        let cy = self.h as f32 * 0.5;
        move |a: &AnchorPoint| {
            (
                cx + (a.local_x * cos - a.local_y * sin) * k,
                cy + (a.local_x * sin + a.local_y * cos) * k,
            )
        }
    }
}

impl Scene for SigilScene {
    fn name(&self) -> &'static str {
        "sigil"
    }

    fn init(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.mask_image = self.image_path.as_deref().and_then(mask::load_mask);
        self.resample_and_reseed();
    }

    fn update(&mut self, ctx: &TickCtx) {
        self.last_t = ctx.t;
        if let Some(change) = self.quality.observe(ctx.dt, ctx.t) {
            if change.stride_changed {
                self.resample_and_reseed();
            } else {
                self.reseed();
            }
        }

        let dyn_coeffs = dynamics::modulate(ctx.t, self.duality_period);
        let proj = self.projection(ctx.t);
        self.swarm.update(ctx.dt, ctx.t, &proj, dyn_coeffs);
    }

    fn render(&mut self, ctx: &TickCtx, out: &mut [u8]) {
        // Paused swarm freezes the last frame rather than blanking it.
        if !self.swarm.enabled() {
            return;
        }
        let w = ctx.w;
        let h = ctx.h;
        if out.len() < w * h * 4 {
            return;
        }

        // Near-black backdrop.
        for px in out[..w * h * 4].chunks_exact_mut(4) {
            px[0] = 5;
            px[1] = 6;
            px[2] = 12;
            px[3] = 255;
        }

        let anchors = self.swarm.anchors();
        for p in self.swarm.particles() {
            let weight = anchors.get(p.anchor).map_or(1.0, |a| a.weight);
            let shimmer = 0.75 + 0.25 * (ctx.t * 2.0 + p.phase).sin();
            let level = (p.alpha * weight * shimmer).clamp(0.0, 1.0);
            let r = p.size.ceil() as i32;

            for dy in -r..=r {
                for dx in -r..=r {
                    let x = p.x as i32 + dx;
                    let y = p.y as i32 + dy;
                    if x < 0 || y < 0 || x >= w as i32 || y >= h as i32 {
                        continue;
                    }
                    let d2 = (dx * dx + dy * dy) as f32;
                    let falloff = 1.0 - d2 / (p.size * p.size + 1.0);
                    if falloff <= 0.0 {
                        continue;
                    }
                    let idx = (y as usize * w + x as usize) * 4;
                    let gain = level * falloff;
                    add_px(&mut out[idx..idx + 4], gain);
                }
            }
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.reseed();
    }

    fn control(&mut self, signal: ControlSignal) {
        match signal {
            ControlSignal::ToggleSwarm => self.swarm.toggle(),
            ControlSignal::Reseed => self.reseed(),
            ControlSignal::ReloadImage => {
                self.mask_image = self.image_path.as_deref().and_then(mask::load_mask);
                self.resample_and_reseed();
            }
        }
    }

    fn status(&self) -> String {
        format!(
            "Mask: {} | Anchors: {} | Particles: {}/{} | Stride: {} | {}",
            self.mask_source(),
            self.swarm.anchors().len(),
            self.swarm.len(),
            self.quality.particle_budget(),
            self.quality.sample_stride(),
            if self.swarm.enabled() { "running" } else { "paused" },
        )
    }
}

#[inline]
fn add_px(px: &mut [u8], gain: f32) {
    px[0] = (px[0] as f32 + TINT.0 * gain).min(255.0) as u8;
    px[1] = (px[1] as f32 + TINT.1 * gain).min(255.0) as u8;
    px[2] = (px[2] as f32 + TINT.2 * gain).min(255.0) as u8;
    px[3] = 255;
}
