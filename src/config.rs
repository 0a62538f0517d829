//! User settings from `config.toml`. Every field is optional.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Store file override; defaults to the data dir.
    pub store: Option<PathBuf>,
    /// Populate a missing store with the built-in templates.
    pub seed_builtin: bool,
    pub render: RenderSettings,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Fill variables without a supplied value from the sample table.
    pub fill_samples: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: None,
            seed_builtin: true,
            render: RenderSettings::default(),
        }
    }
}

impl Settings {
    /// Load `path`, or defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(src) => toml::from_str(&src).with_context(|| format!("parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }
}
