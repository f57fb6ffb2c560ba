//! Configuration file discovery and loading
//!
//! Values are layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file (first hit in the search order below)
//! 4. Built-in defaults

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path given with `--config` or through the config env var
    Explicit(PathBuf),
    /// File in the working directory
    CurrentDir(PathBuf),
    /// `$XDG_CONFIG_HOME/fuel-dash/` or `~/.config/fuel-dash/`
    XdgConfig(PathBuf),
    /// `/etc/fuel-dash/`
    System(PathBuf),
    /// Nothing found on disk
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p.as_path()),
            ConfigSource::Defaults => None,
        }
    }

    fn exists(&self) -> bool {
        self.path().map(Path::exists).unwrap_or(false)
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Candidate config locations in the order they are tried.
///
/// `env_var` names the variable holding an explicit path (e.g. `FUEL_DASH_CONFIG`),
/// `filename` is the bare file name looked up everywhere else (e.g. `dashboard.toml`).
pub fn config_candidates(env_var: &str, filename: &str) -> Vec<ConfigSource> {
    let mut candidates = Vec::with_capacity(4);
    if let Ok(path) = env::var(env_var) {
        candidates.push(ConfigSource::Explicit(PathBuf::from(path)));
    }
    candidates.push(ConfigSource::CurrentDir(PathBuf::from(filename)));
    if let Some(dir) = xdg_config_dir() {
        candidates.push(ConfigSource::XdgConfig(dir.join(APP_NAME).join(filename)));
    }
    candidates.push(ConfigSource::System(
        PathBuf::from("/etc").join(APP_NAME).join(filename),
    ));
    candidates
}

/// First existing config file, or [`ConfigSource::Defaults`]
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    config_candidates(env_var, filename)
        .into_iter()
        .find(ConfigSource::exists)
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_dir() -> Option<PathBuf> {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok()
}

/// Parse the TOML file behind `source`; [`ConfigSource::Defaults`] yields `T::default()`.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        debug!("no config file found, using defaults");
        return Ok(T::default());
    };
    debug!("loading config from {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
