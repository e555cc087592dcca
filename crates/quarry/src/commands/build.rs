//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use quarry_static::{BuildConfig, StaticBuilder};

use crate::config::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;

    let config = BuildConfig {
        content_path: Some(file_config.site.content),
        output_dir: output.unwrap_or(file_config.site.output),
        public_dir: Some(file_config.site.public),
        minify: minify.unwrap_or(file_config.build.minify),
        base_url: file_config.site.base_url,
    };

    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} sections, {} Instagram posts and {} public files in {}ms",
        result.sections,
        result.posts,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
