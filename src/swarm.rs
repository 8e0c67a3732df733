use crate::dynamics::{lerp, Dynamics};
use crate::mask::AnchorPoint;
use std::f32::consts::TAU;

/// Integration constants for the swarm. The integrator is stylised, not
/// physical: the spring acceleration applies per tick and only the noise
/// term scales with dt, which keeps the symbol readable across frame-rate
/// swings.
#[derive(Clone, Copy, Debug)]
pub struct SwarmTuning {
    /// Hard cap on combined per-tick acceleration magnitude.
    pub max_accel: f32,
    /// Hard cap on velocity magnitude (pixels per tick).
    pub max_speed: f32,
    /// Lerp factor for drifting a particle's target toward its anchor's
    /// projected position (smooths re-seeds and resizes).
    pub return_speed: f32,
    /// Distance past which the leash starts pulling back.
    pub max_offset: f32,
    /// Fraction of the offset recovered per leash tick.
    pub leash_pull: f32,
    /// Viewport pixels per particle for the area-adaptive count.
    pub pixels_per_particle: f32,
    pub min_budget: usize,
    pub max_budget: usize,
}

impl Default for SwarmTuning {
    fn default() -> Self {
        Self {
            max_accel: 1.4,
            max_speed: 3.2,
            return_speed: 0.08,
            max_offset: 46.0,
            leash_pull: 0.1,
            pixels_per_particle: 350.0,
            min_budget: 150,
            max_budget: 2200,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub tx: f32,
    pub ty: f32,
    /// Index into the swarm's anchor set this particle homes on.
    pub anchor: usize,
    pub size: f32,
    /// Fixed random offset desynchronizing noise and shimmer.
    pub phase: f32,
    pub alpha: f32,
}

/// The drifting particle collection. Owns its particles and the anchor
/// set they home on; both are only ever replaced wholesale, never patched
/// in place, so a tick can never see half-stale targets.
pub struct ParticleSwarm {
    tuning: SwarmTuning,
    anchors: Vec<AnchorPoint>,
    particles: Vec<Particle>,
    enabled: bool,
}

impl ParticleSwarm {
    pub fn new(tuning: SwarmTuning) -> Self {
        Self {
            tuning,
            anchors: Vec::new(),
            particles: Vec::new(),
            enabled: true,
        }
    }

    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Pausing keeps all particle state so re-enabling resumes in place.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Replace the anchor set and re-seed the swarm against it.
    pub fn set_anchors(
        &mut self,
        anchors: Vec<AnchorPoint>,
        width: f32,
        height: f32,
        desired_budget: usize,
        project: &dyn Fn(&AnchorPoint) -> (f32, f32),
    ) {
        self.anchors = anchors;
        self.reseed(width, height, desired_budget, project);
    }

    /// How many particles a viewport of this size comfortably carries.
    pub fn area_adaptive_count(&self, width: f32, height: f32) -> usize {
        let area = (width.max(0.0) * height.max(0.0)) as usize;
        area / self.tuning.pixels_per_particle.max(1.0) as usize
    }

    /// Rebuild the particle collection from scratch. With no anchors the
    /// swarm goes inert (empty collection, no error). Positions scatter
    /// uniformly over the viewport; each particle is handed a random
    /// anchor and starts at rest.
    pub fn reseed(
        &mut self,
        width: f32,
        height: f32,
        desired_budget: usize,
        project: &dyn Fn(&AnchorPoint) -> (f32, f32),
    ) {
        if self.anchors.is_empty() {
            self.particles = Vec::new();
            return;
        }

        let count = desired_budget
            .min(self.area_adaptive_count(width, height))
            .clamp(self.tuning.min_budget, self.tuning.max_budget);

        let mut next = Vec::with_capacity(count);
        for _ in 0..count {
            let anchor = fastrand::usize(..self.anchors.len());
            let (tx, ty) = project(&self.anchors[anchor]);
            next.push(Particle {
                x: fastrand::f32() * width,
                y: fastrand::f32() * height,
                vx: 0.0,
                vy: 0.0,
                tx,
                ty,
                anchor,
                size: 0.8 + fastrand::f32() * 1.6,
                phase: fastrand::f32() * TAU,
                alpha: 0.25 + fastrand::f32() * 0.6,
            });
        }
        self.particles = next;
    }

    /// Advance every particle one tick.
    ///
    /// `project` maps an anchor to its current scene-space position and
    /// must be pure for the duration of the call; the same anchor must
    /// project to the same point for every particle this tick.
    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        project: &dyn Fn(&AnchorPoint) -> (f32, f32),
        dynamics: Dynamics,
    ) {
        if !self.enabled || self.particles.is_empty() {
            return;
        }

        let tun = self.tuning;
        for p in &mut self.particles {
            // Targets drift toward the projected anchor instead of
            // snapping, so budget/anchor changes do not teleport dots.
            let (ax, ay) = project(&self.anchors[p.anchor]);
            p.tx = lerp(p.tx, ax, tun.return_speed);
            p.ty = lerp(p.ty, ay, tun.return_speed);

            let spring_x = (p.tx - p.x) * dynamics.attraction;
            let spring_y = (p.ty - p.y) * dynamics.attraction;

            // Turbulence decorrelated per particle by its fixed phase and
            // by its own target coords, so neighbours do not move in step.
            let n = dynamics.noise_strength * dt;
            let noise_x = (elapsed * 1.7 + p.phase + p.tx * 0.013).sin() * n;
            let noise_y = (elapsed * 1.3 + p.phase * 1.37 + p.ty * 0.017).cos() * n;

            let (acc_x, acc_y) = clamp_mag(spring_x + noise_x, spring_y + noise_y, tun.max_accel);
            p.vx += acc_x;
            p.vy += acc_y;

            p.vx *= dynamics.friction;
            p.vy *= dynamics.friction;
            let (vx, vy) = clamp_mag(p.vx, p.vy, tun.max_speed);
            p.vx = vx;
            p.vy = vy;

            p.x += p.vx;
            p.y += p.vy;

            // Leash: past max_offset, pull a fraction of the excess back
            // each tick; never let the offset pass one tick's overshoot.
            let dx = p.x - p.tx;
            let dy = p.y - p.ty;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > tun.max_offset {
                p.x -= dx * tun.leash_pull;
                p.y -= dy * tun.leash_pull;

                let limit = tun.max_offset + tun.max_speed;
                let pulled = dist * (1.0 - tun.leash_pull);
                if pulled > limit {
                    let s = limit / pulled;
                    p.x = p.tx + (p.x - p.tx) * s;
                    p.y = p.ty + (p.y - p.ty) * s;
                }
            }
        }
    }
}

#[inline]
fn clamp_mag(x: f32, y: f32, max: f32) -> (f32, f32) {
    let mag = (x * x + y * y).sqrt();
    if mag > max && mag > 0.0 {
        let s = max / mag;
        (x * s, y * s)
    } else {
        (x, y)
    }
}
