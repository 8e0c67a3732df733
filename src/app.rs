use crate::config::{Config, RendererMode};
use crate::dynamics;
use crate::quality::QualityLimits;
use crate::render::{AsciiRenderer, BrailleRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::scene::{ControlSignal, Scene, SigilScene, TickCtx};
use crate::terminal::TerminalGuard;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::time::{Duration, Instant};

// Frame-loop dt clamp: a stall (window drag, SIGSTOP) must not become one
// giant integration step.
const MAX_DT: f32 = 0.1;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let _term = TerminalGuard::enter()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Braille => Box::new(BrailleRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = renderer.pixel_scale();

    let target_fps = cfg.fps.max(1) as f32;
    let limits = QualityLimits {
        min_particles: cfg.min_particles.min(cfg.max_particles),
        max_particles: cfg.max_particles.max(1),
        particle_step: cfg.particle_step.max(1),
        min_stride: cfg.min_stride.max(1),
        max_stride: cfg.max_stride.max(cfg.min_stride.max(1)),
        low_fps: target_fps * 0.75,
        high_fps: target_fps * 0.95,
        window: cfg.fps_window.max(2),
        cooldown_secs: cfg.cooldown_secs.max(0.0),
    };

    let mut scene: Box<dyn Scene> = Box::new(SigilScene::new(
        cfg.image.clone(),
        cfg.alpha_threshold,
        cfg.max_anchors.max(1),
        cfg.duality_period,
        limits,
        cfg.adaptive_quality,
    ));

    let mut last_size = crossterm::terminal::size()?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut show_hud = true;
    let mut show_help = false;
    let mut hud_rows: u16 = 1;

    let (mut w, mut h) = visual_dims(last_size, px_w_mul, px_h_mul, hud_rows);
    scene.init(w, h);

    let mut pixels = vec![0u8; w * h * 4];

    let start = Instant::now();
    let mut last_frame = start;
    let mut fps = FpsCounter::new();

    loop {
        let now = Instant::now();
        let mut dims_dirty = false;

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    let old_hud = show_hud;
                    if handle_key(k.code, k.modifiers, &mut *scene, &mut show_hud, &mut show_help) {
                        scene.destroy();
                        return Ok(());
                    }
                    if show_hud != old_hud {
                        hud_rows = if show_hud { 1 } else { 0 };
                        dims_dirty = true;
                    }
                }
                Event::Resize(c, r) => {
                    last_size = (c, r);
                    dims_dirty = true;
                }
                _ => {}
            }
        }

        // Resize events can be missed in some terminals; poll once a frame.
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
            dims_dirty = true;
        }

        if dims_dirty {
            (w, h) = visual_dims(last_size, px_w_mul, px_h_mul, hud_rows);
            pixels.resize(w * h * 4, 0);
            pixels.fill(0);
            scene.resize(w, h);
        }

        let dt = now
            .duration_since(last_frame)
            .as_secs_f32()
            .clamp(1e-6, MAX_DT);
        last_frame = now;
        let t = now.duration_since(start).as_secs_f32();

        let ctx = TickCtx { t, dt, w, h };
        scene.update(&ctx);
        scene.render(&ctx, &mut pixels);

        fps.tick();
        let hud = if show_hud {
            format!(
                "{} | {} | Phase: {:.2} | FPS: {:>4.1} | Renderer: {} | ? help  q quit",
                scene.name(),
                scene.status(),
                dynamics::duality_phase(t, cfg.duality_period),
                fps.fps(),
                renderer.name(),
            )
        } else {
            String::new()
        };

        let (term_cols, term_rows) = last_size;
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: &pixels,
            hud: &hud,
            hud_rows,
            overlay: show_help.then(help_popup_text),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / target_fps);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn visual_dims(size: (u16, u16), px_w_mul: usize, px_h_mul: usize, hud_rows: u16) -> (usize, usize) {
    let (cols, rows) = size;
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    (
        (cols as usize).saturating_mul(px_w_mul),
        (visual_rows as usize).saturating_mul(px_h_mul),
    )
}

fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    scene: &mut dyn Scene,
    show_hud: &mut bool,
    show_help: &mut bool,
) -> bool {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return true;
    }

    match code {
        KeyCode::Esc => {
            if *show_help {
                *show_help = false;
                false
            } else {
                true
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char(' ') => {
            scene.control(ControlSignal::ToggleSwarm);
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            scene.control(ControlSignal::Reseed);
            false
        }
        KeyCode::Char('m') | KeyCode::Char('M') => {
            scene.control(ControlSignal::ReloadImage);
            false
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            *show_hud = !*show_hud;
            false
        }
        KeyCode::Char('?') | KeyCode::Char('/') | KeyCode::Char('h') | KeyCode::Char('H')
        | KeyCode::F(1) => {
            *show_help = !*show_help;
            false
        }
        _ => false,
    }
}

fn help_popup_text() -> &'static str {
    "sigildrift keys\n\
\n\
space  pause/resume the swarm\n\
r  re-scatter the particles\n\
m  retry loading the source image\n\
i  show/hide HUD\n\
? or / or h or F1  toggle this help\n\
q or esc  quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
