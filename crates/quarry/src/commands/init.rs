//! Initialize a site in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quarry_content::SiteContent;

/// Run the init command. Files land next to the config file.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing quarry site...");

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    write_unless_exists(config_path, DEFAULT_CONFIG, yes)?;
    write_unless_exists(&root.join("site.toml"), SiteContent::shipped_toml(), yes)?;

    let public_dir = root.join("public");
    if !public_dir.exists() {
        fs::create_dir_all(&public_dir).context("Failed to create public directory")?;
    }
    write_unless_exists(&public_dir.join("favicon.svg"), DEFAULT_FAVICON, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Add the logo and photos named in site.toml to public/, then run 'quarry dev'.");

    Ok(())
}

fn write_unless_exists(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# quarry configuration

[site]
# Business profile, services, history and Instagram posts
content = "site.toml"

# Output directory for the built site
output = "dist"

# Logo, photos and favicon, copied to the output as-is
public = "public"

# Base URL (for deployment under a sub-path)
base_url = "/"

[build]
# Minify CSS
minify = true

[dev]
port = 7777
"#;

const DEFAULT_FAVICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><rect width="32" height="32" rx="6" fill="#0a0a0a"/><path d="M6 24h20v-4l-6-8h-6l-2 4H6z" fill="#dc2626"/></svg>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_site_files() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("quarry.toml");

        run(&config, false).await.unwrap();

        assert!(config.exists());
        assert!(temp.path().join("public/favicon.svg").exists());

        let content = SiteContent::load(&temp.path().join("site.toml")).unwrap();
        assert_eq!(content, SiteContent::shipped());
    }

    #[tokio::test]
    async fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("quarry.toml");
        fs::write(&config, "# mine").unwrap();

        run(&config, false).await.unwrap();
        assert_eq!(fs::read_to_string(&config).unwrap(), "# mine");

        run(&config, true).await.unwrap();
        assert_eq!(fs::read_to_string(&config).unwrap(), DEFAULT_CONFIG);
    }
}
