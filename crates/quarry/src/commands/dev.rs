//! Development server command.

use std::path::Path;

use anyhow::Result;
use quarry_server::{DevServer, DevServerConfig};

use crate::config::load_config;

/// Run the dev server.
pub async fn run(config_path: &Path, port: Option<u16>, open: bool) -> Result<()> {
    let file_config = load_config(config_path)?;
    let port = port.unwrap_or(file_config.dev.port);

    tracing::info!("Starting development server on port {}", port);

    let config = DevServerConfig {
        content_path: file_config.site.content,
        public_dir: file_config.site.public,
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
