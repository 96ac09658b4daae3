//! The `stroop init` command.

use crate::settings::{DEFAULT_CONFIG_FILE, Settings};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

const HEADER: &str = "# Stroop color-word test configuration\n\
# Every key is optional; removed keys fall back to the values below.\n\n";

pub fn execute(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if path.exists() {
        bail!("{} already exists, refusing to overwrite", path.display());
    }

    let body = Settings::default().to_toml()?;
    std::fs::write(&path, format!("{HEADER}{body}"))
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());

    println!("\nNext steps:");
    println!("  1. Adjust trial counts and thresholds in {}", path.display());
    println!("  2. Try it headless: stroop simulate --config {}", path.display());
    println!("  3. Run a session: stroop run --config {}", path.display());

    Ok(())
}
