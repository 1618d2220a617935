use bevy::prelude::*;
use ron::de::from_reader;
use ron::ser::PrettyConfig;
use std::fs::File;
use std::path::Path;
use crate::core::morph_config::MorphConfig;
use crate::core::morph_error::MorphError;

/// Reads a RON config file. Missing sections take their defaults and the
/// result is always sanitized.
pub fn load_config(path: impl AsRef<Path>) -> Result<MorphConfig, MorphError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let config: MorphConfig = from_reader(file)?;
    info!("loaded morph config from {}", path.display());
    Ok(config.sanitized())
}

pub fn parse_config(text: &str) -> Result<MorphConfig, MorphError> {
    let config: MorphConfig = ron::from_str(text)?;
    Ok(config.sanitized())
}

pub fn save_config(path: impl AsRef<Path>, config: &MorphConfig) -> Result<(), MorphError> {
    let text = ron::ser::to_string_pretty(config, PrettyConfig::default())?;
    std::fs::write(path, text)?;
    Ok(())
}
