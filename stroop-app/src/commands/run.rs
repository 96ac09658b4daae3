//! The `stroop run` command: an interactive session in a window.

use crate::app::App;
use crate::settings::Settings;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn execute(config: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load(config.as_deref())?;
    let font_path = settings.display.font_path.clone();
    let font = std::fs::read(&font_path)
        .with_context(|| format!("failed to read font: {}", font_path.display()))?;

    App::new(settings, font)?.run()
}
