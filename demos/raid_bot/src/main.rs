//! Raid Bot Example
//!
//! A console bot with three modules:
//!
//! ```text
//! !raid create 24/12 20:00 UTC+1 Christmas raid
//! !raid list
//! !raid cancel 1
//! !play Never Gonna Give You Up
//! !playlist chill
//! !volume 30
//! !queue
//! !ping
//! ```
//!
//! Incomplete commands get suggestions, e.g. `!raid` lists every raid
//! command and `!volume 300` shows `!volume <level>`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package raid-bot -- --config demos/raid_bot/sigil.toml
//! ```

mod music;
mod raid;
mod utility;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sigil::prelude::*;
use sigil::runtime::ConfigLoader;
use tracing::info;

use crate::raid::RaidSettings;

/// Command line options.
#[derive(Debug, Parser)]
#[command(version, about = "A console raid-planning bot")]
struct Cli {
    /// Configuration file; defaults to searching for sigil.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile, e.g. "production".
    #[arg(short, long)]
    profile: Option<String>,

    /// Command prefix, overriding the configuration.
    #[arg(long)]
    prefix: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().with_current_dir();
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &cli.profile {
        loader = loader.profile(profile);
    }
    if let Some(prefix) = &cli.prefix {
        loader = loader.set("dispatcher.prefix", prefix);
    }
    let config = loader.load()?;
    let raid_settings: RaidSettings = config.module_settings("raid")?;

    let runtime = SigilRuntime::builder()
        .config(config)
        .module(raid::module(raid_settings))
        .module(music::module())
        .module(utility::module())
        .build()?;

    info!(
        "Type commands starting with {:?}, Ctrl+D or Ctrl+C to quit",
        runtime.config().dispatcher.prefix
    );
    info!("Loaded modules:\n{}", runtime.registry().overview());

    runtime.run_console().await?;
    Ok(())
}
