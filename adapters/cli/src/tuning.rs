use std::{fs, path::Path};

use anyhow::{Context, Result};
use echo_defence_core::Tuning;

/// Reads tuning overrides from `path`, falling back to the defaults.
pub(crate) fn load(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    let tuning: Tuning = toml::from_str(&contents)
        .with_context(|| format!("failed to parse tuning file at {}", path.display()))?;
    tuning
        .validate()
        .with_context(|| format!("invalid tuning in {}", path.display()))?;
    Ok(tuning)
}
