use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = sigildrift::config::Config::parse();
    sigildrift::app::run(cfg)
}
