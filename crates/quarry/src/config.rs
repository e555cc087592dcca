//! quarry.toml configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use quarry_content::SiteContent;

/// Configuration file structure (quarry.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub dev: DevSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Content file
    #[serde(default = "default_content")]
    pub content: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_public")]
    pub public: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

#[derive(Debug, Deserialize)]
pub struct DevSettings {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            output: default_output(),
            public: default_public(),
            base_url: default_base_url(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_content() -> PathBuf {
    PathBuf::from("site.toml")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_public() -> PathBuf {
    PathBuf::from("public")
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_port() -> u16 {
    7777
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("{} not found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&source)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

impl ConfigFile {
    /// Load the configured content file.
    pub fn load_content(&self) -> Result<SiteContent> {
        SiteContent::load(&self.site.content)
            .with_context(|| format!("Invalid content in {}", self.site.content.display()))
    }
}
