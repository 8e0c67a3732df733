use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "sigildrift", version, about = "Ambient terminal sigil: a particle swarm drifting into a source image's alpha mask")]
pub struct Config {
    /// PNG whose alpha channel defines the symbol. Without it (or if it
    /// fails to decode) a procedural symbol is used instead.
    #[arg(long)]
    pub image: Option<String>,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub adaptive_quality: bool,

    /// Rolling window length (frames) the quality controller averages over.
    #[arg(long, default_value_t = 40)]
    pub fps_window: usize,

    /// Minimum seconds between two quality adjustments.
    #[arg(long, default_value_t = 1.5)]
    pub cooldown_secs: f32,

    #[arg(long, default_value_t = 150)]
    pub min_particles: usize,

    #[arg(long, default_value_t = 2200)]
    pub max_particles: usize,

    /// Particles added/removed per quality step.
    #[arg(long, default_value_t = 250)]
    pub particle_step: usize,

    /// Baseline pixel skip when sampling the mask.
    #[arg(long, default_value_t = 2)]
    pub min_stride: u32,

    #[arg(long, default_value_t = 8)]
    pub max_stride: u32,

    /// Alpha above this (0-255) makes a pixel an anchor.
    #[arg(long, default_value_t = 40)]
    pub alpha_threshold: u8,

    /// Hard cap on anchors per sampling pass.
    #[arg(long, default_value_t = 4000)]
    pub max_anchors: usize,

    /// Seconds for one full calm/turbulent oscillation.
    #[arg(long, default_value_t = 24.0)]
    pub duality_period: f32,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    #[value(alias = "hires", alias = "dots")]
    Braille,
}
