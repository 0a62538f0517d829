use anyhow::{Context, Result};
use std::path::PathBuf;

/// Immutable bag of filesystem paths used throughout the app.
/// Constructed once at startup; never mutated after that.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    pub store_file: PathBuf,
}

impl Ctx {
    /// Construct paths from environment variables.
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("$HOME is not set")?;

        let config_dir = xdg_dir("XDG_CONFIG_HOME", || format!("{home}/.config"));
        let data_dir = xdg_dir("XDG_DATA_HOME", || format!("{home}/.local/share"));

        Ok(Self::at(config_dir, data_dir))
    }

    /// Lay out app paths under explicit base directories.
    pub fn at(config_base: PathBuf, data_base: PathBuf) -> Self {
        let config_dir = config_base.join("promptdeck");
        let data_dir = data_base.join("promptdeck");

        Self {
            config_file: config_dir.join("config.toml"),
            store_file: data_dir.join("templates.toml"),
            config_dir,
            data_dir,
        }
    }
}

fn xdg_dir(var: &str, fallback: impl FnOnce() -> String) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(fallback)
        .into()
}
