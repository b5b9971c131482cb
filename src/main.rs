//! CLI entry point for the stitched-texture renderer

use clap::Parser;
use uglysweater::io::cli::{Cli, RenderCommand};

fn main() -> uglysweater::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut command = RenderCommand::new(cli);
    command.execute()?;
    Ok(())
}
