//! Configuration loading and parsing.
//!
//! Parses `modal.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [input]
//! timeout = true       # resolve ambiguous mappings after timeoutlen
//! timeoutlen = 1000    # milliseconds
//! maxmapdepth = 100    # recursive expansion limit
//!
//! [[map]]
//! mode = "insert"      # key map name: normal, visual, insert, command, ...
//! lhs = "jj"
//! rhs = "<Esc>"
//! recursive = false    # default true
//! ```
//!
//! Unknown fields are ignored. A file that fails to parse is reported at WARN
//! and replaced by defaults, so a broken config never prevents startup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "modal.toml";

/// Bounds applied to `maxmapdepth`; expansion frames are nested calls.
pub const MAX_MAP_DEPTH_RANGE: (u32, u32) = (1, 1000);

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub map: Vec<MappingConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_timeout")] // Vim default: enabled
    pub timeout: bool,
    #[serde(default = "InputConfig::default_timeoutlen")] // Vim default usually 1000ms
    pub timeoutlen: u32,
    #[serde(default = "InputConfig::default_maxmapdepth")]
    pub maxmapdepth: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            timeoutlen: Self::default_timeoutlen(),
            maxmapdepth: Self::default_maxmapdepth(),
        }
    }
}

impl InputConfig {
    const fn default_timeout() -> bool {
        true
    }
    const fn default_timeoutlen() -> u32 {
        1000
    }
    const fn default_maxmapdepth() -> u32 {
        100
    }

    /// `maxmapdepth` clamped to [`MAX_MAP_DEPTH_RANGE`].
    pub fn effective_maxmapdepth(&self) -> u32 {
        let (min, max) = MAX_MAP_DEPTH_RANGE;
        let clamped = self.maxmapdepth.clamp(min, max);
        if clamped != self.maxmapdepth {
            info!(
                target: "config",
                raw = self.maxmapdepth,
                clamped,
                min,
                max,
                "maxmapdepth_clamped"
            );
        }
        clamped
    }
}

/// One `[[map]]` table.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MappingConfig {
    pub mode: String,
    pub lhs: String,
    pub rhs: String,
    #[serde(default = "MappingConfig::default_recursive")]
    pub recursive: bool,
}

impl MappingConfig {
    const fn default_recursive() -> bool {
        true
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer a local working directory `modal.toml` before the platform config dir.
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("modal").join(CONFIG_FILE_NAME);
    }
    // Final fallback relative filename.
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Parse configuration text. Errors carry the TOML location.
pub fn parse(content: &str) -> Result<ConfigFile> {
    toml::from_str::<ConfigFile>(content).context("invalid configuration")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match parse(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                mappings = file.map.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %format!("{e:#}"), "config_parse_failed");
            Ok(Config::default())
        }
    }
}
