//! Preview server command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::load_config;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => load_config(config_path)?.site.output,
    };

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'quarry build' first.",
            dir.display()
        );
    }

    quarry_server::serve_dir(dir, "127.0.0.1", port, true).await?;

    Ok(())
}
