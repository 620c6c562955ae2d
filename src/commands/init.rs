use anyhow::{bail, Result};
use std::env;
use tracing::info;

use crate::Config;

pub async fn run(force: bool) -> Result<()> {
    let root = env::current_dir()?;

    if Config::is_initialized(&root) && !force {
        bail!(
            "codescope is already initialized in {:?} (use --force to overwrite)",
            Config::config_dir(&root)
        );
    }

    let config = Config::default();
    config.save(&root)?;

    info!("Initialized codescope in {:?}", Config::config_dir(&root));
    println!(
        "✓ Created {} with default configuration",
        Config::config_dir(&root).display()
    );
    println!("\nNext steps:");
    println!("  1. Edit .codescope/config.toml to tune TTLs and ignored directories");
    println!("  2. Run 'codescope search \"where is <name> defined\"'");

    Ok(())
}
