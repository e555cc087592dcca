//! Content validation command.

use std::path::Path;

use anyhow::Result;

use crate::config::load_config;

/// Run the check command.
pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let content = config.load_content()?;
    let profile = &content.profile;

    tracing::info!(
        "{}: {} services ({} in footer), {} contacts, {} milestones, {} Instagram posts",
        profile.name,
        profile.services.len(),
        profile.footer_services().len(),
        profile.contacts.len(),
        profile.history.len(),
        content.instagram.posts.len()
    );

    if !content.instagram.has_posts() {
        tracing::warn!("No Instagram posts listed; the feed will show a notice instead");
    }

    tracing::info!("{} is valid", config.site.content.display());
    Ok(())
}
