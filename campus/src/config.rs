//! Configuration: where maps live and how forgiving picking is.
//!
//! Read from `campus.toml`; every field is optional.
//!
//! ```toml
//! map_directory = "./maps"
//!
//! [tolerances]
//! node_px = 15.0
//! edge_px = 5.0
//! vertex_px = 5.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::tolerance::Tolerances;
use crate::json::{list_maps, with_map_extension};

pub const CONFIG_FILE: &str = "campus.toml";
pub const DEFAULT_MAP_DIR: &str = "./maps";
/// Environment variable overriding `map_directory`.
pub const MAP_DIR_ENV: &str = "CAMPUS_MAP_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `.map` files
    pub map_directory: PathBuf,

    /// Pick radii in screen pixels
    pub tolerances: Tolerances,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_directory: PathBuf::from(DEFAULT_MAP_DIR),
            tolerances: Tolerances::default(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut config: Config = toml::from_str(&contents)?;
    config.apply_env_overrides();
    config.validate()?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Like [`load_config`], but never fails: an explicit path that cannot be
/// read falls back to defaults with a warning. Without a path, `campus.toml`
/// in the working directory is used when present.
pub fn load_config_or_default(path: Option<&Path>) -> Config {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(CONFIG_FILE);
            if !p.exists() {
                let mut config = Config::default();
                config.apply_env_overrides();
                return config;
            }
            p
        }
    };
    match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("using default config, {} failed to load: {}", path.display(), e);
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    }
}

impl Config {
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(MAP_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.map_directory = PathBuf::from(dir);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let t = &self.tolerances;
        for (name, v) in [("node_px", t.node_px), ("edge_px", t.edge_px), ("vertex_px", t.vertex_px)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::Invalid(format!("tolerance {} must be positive", name)));
            }
        }
        Ok(())
    }

    /// Create the map directory if needed and return it. When it cannot be
    /// created (or is not a directory) `./maps` is used instead.
    pub fn ensure_map_directory(&self) -> Result<PathBuf> {
        let dir = &self.map_directory;
        match fs::create_dir_all(dir) {
            Ok(()) if dir.is_dir() => return Ok(dir.clone()),
            Ok(()) => warn!("{} is not a directory, falling back to {}", dir.display(), DEFAULT_MAP_DIR),
            Err(e) => warn!("cannot create {}: {}, falling back to {}", dir.display(), e, DEFAULT_MAP_DIR),
        }
        let fallback = PathBuf::from(DEFAULT_MAP_DIR);
        fs::create_dir_all(&fallback).map_err(|e| Error::io(&fallback, e))?;
        info!("using map directory {}", fallback.display());
        Ok(fallback)
    }

    /// Path of map `name` inside the map directory.
    pub fn map_path(&self, name: &str) -> PathBuf {
        with_map_extension(&self.map_directory.join(name))
    }

    pub fn list_maps(&self) -> Result<Vec<String>> {
        list_maps(&self.map_directory)
    }
}
