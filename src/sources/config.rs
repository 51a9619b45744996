//! Settings for locating a Vagrant project.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_DOTFILE_PATH: &str = ".vagrant";
const DEFAULT_VAGRANTFILE: &str = "Vagrantfile";

/// Where VM discovery looks for project metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Metadata directory inside the project root.
    pub dotfile_path: PathBuf,
    /// File that marks a directory as the project root.
    pub vagrantfile: String,
    /// Where the upward search starts when no directory is given.
    pub cwd: PathBuf,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            dotfile_path: PathBuf::from(DEFAULT_DOTFILE_PATH),
            vagrantfile: DEFAULT_VAGRANTFILE.to_string(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl DiscoveryConfig {
    /// Defaults overridden by `VAGRANT_DOTFILE_PATH`, `VAGRANT_VAGRANTFILE`
    /// and `VAGRANT_CWD`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os("VAGRANT_DOTFILE_PATH") {
            config.dotfile_path = PathBuf::from(path);
        }
        if let Ok(name) = std::env::var("VAGRANT_VAGRANTFILE") {
            config.vagrantfile = name;
        }
        if let Some(cwd) = std::env::var_os("VAGRANT_CWD") {
            config.cwd = PathBuf::from(cwd);
        }
        config
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }
}
