/// Knob bounds and controller tuning. Built once from the CLI config.
#[derive(Clone, Copy, Debug)]
pub struct QualityLimits {
    pub min_particles: usize,
    pub max_particles: usize,
    pub particle_step: usize,
    pub min_stride: u32,
    pub max_stride: u32,
    pub low_fps: f32,
    pub high_fps: f32,
    pub window: usize,
    pub cooldown_secs: f32,
}

/// What the controller just did; tells the caller which expensive
/// follow-ups are owed. A re-seed is owed after any change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnobChange {
    pub stride_changed: bool,
}

/// Closed-loop controller over two fidelity knobs: the particle budget
/// and the mask sampling stride.
///
/// Degrading sheds particles first and only coarsens the stride once the
/// budget is floored, because a coarser stride visibly distorts the
/// symbol while fewer particles just thins it. Recovery mirrors that:
/// stride tightens back before the budget regrows.
pub struct QualityController {
    limits: QualityLimits,
    fps_window: FpsWindow,
    particle_budget: usize,
    sample_stride: u32,
    last_change: f32,
    adaptive: bool,
}

/// Fixed-size ring of recent fps samples. Capacity comes from the
/// config, so the backing store is a Vec sized once at construction.
struct FpsWindow {
    vals: Vec<f32>,
    len: usize,
    pos: usize,
}

impl FpsWindow {
    fn new(cap: usize) -> Self {
        Self {
            vals: vec![0.0; cap.max(1)],
            len: 0,
            pos: 0,
        }
    }

    fn push(&mut self, v: f32) {
        self.vals[self.pos] = v;
        self.pos = (self.pos + 1) % self.vals.len();
        if self.len < self.vals.len() {
            self.len += 1;
        }
    }

    fn is_full(&self) -> bool {
        self.len == self.vals.len()
    }

    fn clear(&mut self) {
        self.len = 0;
        self.pos = 0;
    }

    fn mean(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        Some(self.vals[..self.len].iter().sum::<f32>() / self.len as f32)
    }
}

impl QualityController {
    pub fn new(limits: QualityLimits, adaptive: bool) -> Self {
        Self {
            particle_budget: limits.max_particles,
            sample_stride: limits.min_stride,
            fps_window: FpsWindow::new(limits.window),
            last_change: f32::NEG_INFINITY,
            limits,
            adaptive,
        }
    }

    pub fn particle_budget(&self) -> usize {
        self.particle_budget
    }

    pub fn sample_stride(&self) -> u32 {
        self.sample_stride
    }

    /// Mean of the current window, if any samples have accumulated.
    pub fn window_mean(&self) -> Option<f32> {
        self.fps_window.mean()
    }

    /// Feed one frame's delta-time (seconds) and the monotonic elapsed
    /// time. Returns the adjustment made this tick, if any.
    ///
    /// Degenerate `dt` (zero or negative) is skipped entirely. The window
    /// survives no-change evaluations so a sustained trend keeps
    /// accumulating evidence; only an actual adjustment clears it.
    pub fn observe(&mut self, dt: f32, now: f32) -> Option<KnobChange> {
        if dt <= 0.0 {
            return None;
        }

        self.fps_window.push(1.0 / dt);

        if !self.adaptive || !self.fps_window.is_full() {
            return None;
        }
        // Cooldown: hold still after a change so its effect can show up
        // in the window before we react again.
        if now - self.last_change < self.limits.cooldown_secs {
            return None;
        }

        let Some(avg) = self.fps_window.mean() else {
            return None;
        };

        let change = if avg < self.limits.low_fps {
            self.degrade()
        } else if avg > self.limits.high_fps {
            self.recover()
        } else {
            None
        };

        if change.is_some() {
            self.fps_window.clear();
            self.last_change = now;
        }
        change
    }

    fn degrade(&mut self) -> Option<KnobChange> {
        if self.particle_budget > self.limits.min_particles {
            self.particle_budget = self
                .particle_budget
                .saturating_sub(self.limits.particle_step)
                .max(self.limits.min_particles);
            return Some(KnobChange { stride_changed: false });
        }
        if self.sample_stride < self.limits.max_stride {
            self.sample_stride += 1;
            return Some(KnobChange { stride_changed: true });
        }
        None
    }

    fn recover(&mut self) -> Option<KnobChange> {
        if self.sample_stride > self.limits.min_stride {
            self.sample_stride -= 1;
            return Some(KnobChange { stride_changed: true });
        }
        if self.particle_budget < self.limits.max_particles {
            self.particle_budget = (self.particle_budget + self.limits.particle_step)
                .min(self.limits.max_particles);
            return Some(KnobChange { stride_changed: false });
        }
        None
    }
}
