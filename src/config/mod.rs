use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::DEFAULT_NODE_URL;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Hex private key used by `send` when no `--key` is given
    #[serde(default)]
    pub private_key: Option<String>,
}

impl Config {
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NODE_URL.to_string())
    }

    /// Apply environment overrides; non-empty values win over file values
    pub fn apply_overrides(mut self, rpc_url: Option<String>, private_key: Option<String>) -> Self {
        if let Some(url) = rpc_url.filter(|s| !s.trim().is_empty()) {
            self.rpc_url = Some(url);
        }
        if let Some(key) = private_key.filter(|s| !s.trim().is_empty()) {
            self.private_key = Some(key);
        }
        self
    }
}

/// Load `path` (or the default location), then apply `CTFKIT_RPC_URL` /
/// `CTFKIT_PRIVATE_KEY`
pub fn load_with(path: Option<&Path>) -> Config {
    let config = path
        .map(Path::to_path_buf)
        .or_else(config_path)
        .map(|path| load_from(&path))
        .unwrap_or_default();
    config.apply_overrides(
        std::env::var("CTFKIT_RPC_URL").ok(),
        std::env::var("CTFKIT_PRIVATE_KEY").ok(),
    )
}

/// Read a config file; a missing or invalid file yields defaults
pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CTFKIT_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("ctfkit").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("ctfkit").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "ctfkit", "ctfkit")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
