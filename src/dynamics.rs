use std::f32::consts::TAU;

/// Per-tick integration coefficients. Recomputed every frame, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dynamics {
    /// Spring gain pulling a particle toward its target.
    pub attraction: f32,
    /// Amplitude of the sinusoid turbulence (scaled by dt at use site).
    pub noise_strength: f32,
    /// Multiplicative velocity damping per tick.
    pub friction: f32,
}

// Two regimes the duality phase sweeps between: a tight, calm symbol and
// a loose, turbulent cloud.
const CALM: Dynamics = Dynamics {
    attraction: 0.026,
    noise_strength: 6.0,
    friction: 0.88,
};

const TURBULENT: Dynamics = Dynamics {
    attraction: 0.008,
    noise_strength: 42.0,
    friction: 0.965,
};

/// Slow oscillating scalar in [0, 1]: 0 at the calm extreme, 1 at the
/// turbulent one. Pure function of elapsed time.
pub fn duality_phase(elapsed: f32, period: f32) -> f32 {
    let period = if period > 0.0 { period } else { 1.0 };
    ((elapsed * TAU / period).sin() + 1.0) * 0.5
}

/// Coefficients for the current point in the duality cycle. Identical
/// inputs always produce identical output.
pub fn modulate(elapsed: f32, period: f32) -> Dynamics {
    let t = duality_phase(elapsed, period);
    Dynamics {
        attraction: lerp(CALM.attraction, TURBULENT.attraction, t),
        noise_strength: lerp(CALM.noise_strength, TURBULENT.noise_strength, t),
        friction: lerp(CALM.friction, TURBULENT.friction, t),
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
