//! Loading and validating site content.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::feed::InstagramFeed;
use crate::profile::BusinessProfile;

/// Content shipped with the crate, used by `quarry init` and as a fallback.
const SHIPPED_CONTENT: &str = include_str!("../data/site.toml");

/// Everything the page is rendered from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteContent {
    /// Page metadata
    pub site: SiteMeta,

    /// Company facts
    pub profile: BusinessProfile,

    /// Social feed
    #[serde(default)]
    pub instagram: InstagramFeed,
}

/// Page-level metadata emitted into `<head>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteMeta {
    /// Document title
    pub title: String,

    /// Meta description
    #[serde(default)]
    pub description: String,

    /// Canonical URL (scheme and host), also used in the sitemap
    pub url: String,

    /// Open Graph locale
    #[serde(default = "default_locale")]
    pub locale: String,

    /// ISO 3166-2 region for the geo meta tag
    #[serde(default)]
    pub region: Option<String>,

    /// Meta keywords
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_locale() -> String {
    "en_US".to_string()
}

impl SiteMeta {
    /// Host part of the canonical URL, e.g. `hansensexcavating.com`.
    pub fn host(&self) -> &str {
        let without_scheme = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        without_scheme
            .split('/')
            .next()
            .unwrap_or(without_scheme)
    }
}

/// Errors raised while loading content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Invalid content TOML: {0}")]
    InvalidToml(String),

    #[error("Profile lists no services")]
    NoServices,

    #[error("Service '{0}' has no icon/image mapping")]
    MissingServiceArt(String),

    #[error("Profile lists no contacts")]
    NoContacts,

    #[error("Contact '{0}' has an empty phone number")]
    EmptyPhone(String),

    #[error("History years must increase: {year} follows {previous}")]
    HistoryOutOfOrder { previous: u16, year: u16 },
}

impl SiteContent {
    /// Parse and validate content from TOML text.
    pub fn from_toml(source: &str) -> Result<Self, ContentError> {
        let content: SiteContent =
            toml::from_str(source).map_err(|e| ContentError::InvalidToml(e.to_string()))?;
        content.profile.validate()?;
        Ok(content)
    }

    /// Read, parse and validate a content file.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let source = fs::read_to_string(path).map_err(|e| ContentError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let content = Self::from_toml(&source)?;

        tracing::debug!(
            "Loaded content from {}: {} services, {} milestones, {} posts",
            path.display(),
            content.profile.services.len(),
            content.profile.history.len(),
            content.instagram.posts.len()
        );

        Ok(content)
    }

    /// The content shipped with quarry.
    pub fn shipped() -> Self {
        Self::from_toml(SHIPPED_CONTENT).expect("shipped content is valid")
    }

    /// Raw TOML of the shipped content.
    pub fn shipped_toml() -> &'static str {
        SHIPPED_CONTENT
    }
}
