pub mod app;
pub mod config;
pub mod dynamics;
pub mod mask;
pub mod quality;
pub mod render;
pub mod scene;
pub mod swarm;
pub mod terminal;
