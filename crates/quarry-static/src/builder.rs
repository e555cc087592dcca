//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use quarry_content::{ContentError, SiteContent};
use quarry_widgets::{ClientConfig, Deferred, DeferredError, MailComposer};

use crate::assets::AssetPipeline;
use crate::sections::{Section, SectionContext, FEED_FRAGMENT};
use crate::templates::{PageContext, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site content file. `None` builds the shipped content.
    pub content_path: Option<PathBuf>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Static files copied verbatim (logo, photos, favicon)
    pub public_dir: Option<PathBuf>,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_path: Some(PathBuf::from("site.toml")),
            output_dir: PathBuf::from("dist"),
            public_dir: Some(PathBuf::from("public")),
            minify: true,
            base_url: "/".to_string(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of page sections rendered
    pub sections: usize,

    /// Number of social posts in the feed fragment
    pub posts: usize,

    /// Number of public files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Feed fragment did not complete: {0}")]
    Deferred(#[from] DeferredError),
}

impl From<minijinja::Error> for BuildError {
    fn from(err: minijinja::Error) -> Self {
        BuildError::TemplateError(err.to_string())
    }
}

/// How a page render differs between the static build and the dev server.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Base URL, always ending in `/`
    pub base_url: String,

    /// Load the social feed from its fragment instead of inlining it
    pub defer_feed: bool,

    /// Extra scripts appended after the page script
    pub scripts: Vec<String>,
}

impl PageOptions {
    pub fn new(base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Self {
            base_url,
            defer_feed: true,
            scripts: Vec::new(),
        }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Render the full page. Sections render in parallel and are joined in page order.
pub fn render_page(
    engine: &TemplateEngine,
    content: &SiteContent,
    options: &PageOptions,
) -> Result<String, BuildError> {
    let ctx = SectionContext {
        defer_feed: options.defer_feed,
        ..SectionContext::new(content, &options.base_url)
    };

    let sections = Section::PAGE
        .par_iter()
        .map(|section| section.render(&ctx, engine))
        .collect::<Result<Vec<_>, _>>()?;

    let site = &content.site;
    let page = PageContext {
        title: site.title.clone(),
        description: site.description.clone(),
        keywords: site.keywords.join(", "),
        canonical: site.url.clone(),
        site_name: content.profile.name.clone(),
        locale: site.locale.clone(),
        region: site.region.clone(),
        base_url: options.base_url.clone(),
        sections,
        scripts: options.scripts.clone(),
    };

    Ok(engine.render_page(&page)?)
}

/// Render the social feed section on its own, for the deferred slot.
pub fn render_fragment(
    engine: &TemplateEngine,
    content: &SiteContent,
    options: &PageOptions,
) -> Result<String, BuildError> {
    let ctx = SectionContext {
        defer_feed: false,
        ..SectionContext::new(content, &options.base_url)
    };

    Ok(Section::Instagram.render(&ctx, engine)?)
}

/// Page script settings for this site's quote form.
pub fn client_config(content: &SiteContent) -> ClientConfig {
    ClientConfig::new(MailComposer::new(
        &content.profile.email,
        content.profile.short_name(),
        content.site.host(),
    ))
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let content = self.load_content()?;
        let options = PageOptions::new(&self.config.base_url);

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // The feed fragment is below the fold; render it off the main path.
        let feed = {
            let content = content.clone();
            let options = options.clone();
            Deferred::spawn_blocking(move || {
                render_fragment(&TemplateEngine::new(), &content, &options)
            })
        };

        let html = render_page(&self.templates, &content, &options)?;
        write_file(&self.config.output_dir.join("index.html"), &html)?;

        self.generate_assets(&content)?;
        let assets = self.copy_public()?;
        self.generate_sitemap(&content)?;

        let fragment = feed.resolve().await??;
        write_file(&self.config.output_dir.join(FEED_FRAGMENT), &fragment)?;

        let duration = start.elapsed();

        tracing::debug!(
            "Built {} in {}ms",
            self.config.output_dir.display(),
            duration.as_millis()
        );

        Ok(BuildResult {
            sections: Section::PAGE.len(),
            posts: content.instagram.posts.len(),
            assets,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    fn load_content(&self) -> Result<SiteContent, BuildError> {
        match &self.config.content_path {
            Some(path) => Ok(SiteContent::load(path)?),
            None => {
                tracing::info!("No content file configured, building shipped content");
                Ok(SiteContent::shipped())
            }
        }
    }

    /// Generate static assets.
    fn generate_assets(&self, content: &SiteContent) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("{}, writing unminified CSS", e);
                css
            })
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), &css)?;

        let js = AssetPipeline::generate_js(&client_config(content))
            .map_err(BuildError::TemplateError)?;
        write_file(&assets_dir.join("main.js"), &js)?;

        Ok(())
    }

    /// Copy the public directory into the output. Returns the file count.
    fn copy_public(&self) -> Result<usize, BuildError> {
        let Some(public_dir) = &self.config.public_dir else {
            return Ok(0);
        };

        if !public_dir.exists() {
            tracing::warn!("Public directory not found: {}", public_dir.display());
            return Ok(0);
        }

        let mut copied = 0;

        for entry in WalkDir::new(public_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(public_dir).unwrap_or(path);
            if is_generated(relative) {
                tracing::warn!(
                    "Skipping {}: it would replace generated output",
                    path.display()
                );
                continue;
            }
            let target = self.config.output_dir.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }

            fs::copy(path, &target).map_err(|e| BuildError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            copied += 1;
        }

        tracing::debug!("Copied {} public files", copied);
        Ok(copied)
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, content: &SiteContent) -> Result<(), BuildError> {
        let site_url = content.site.url.trim_end_matches('/');

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>{}/</loc>
    <changefreq>monthly</changefreq>
    <priority>1.0</priority>
  </url>
</urlset>"#,
            site_url
        );
        write_file(&self.config.output_dir.join("sitemap.xml"), &sitemap)?;

        let robots = format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml", site_url);
        write_file(&self.config.output_dir.join("robots.txt"), &robots)?;

        Ok(())
    }
}

/// Files the build writes itself, relative to the output directory.
const GENERATED: &[&str] = &[
    "index.html",
    "assets/main.css",
    "assets/main.js",
    FEED_FRAGMENT,
    "sitemap.xml",
    "robots.txt",
];

fn is_generated(relative: &Path) -> bool {
    GENERATED.iter().any(|g| relative == Path::new(g))
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn shipped_config(out: &Path) -> BuildConfig {
        BuildConfig {
            content_path: None,
            output_dir: out.to_path_buf(),
            public_dir: None,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_shipped_site() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");

        let result = StaticBuilder::new(shipped_config(&out)).build().await.unwrap();

        assert_eq!(result.sections, 9);
        assert_eq!(result.posts, 0);
        assert!(out.join("index.html").exists());
        assert!(out.join("fragments/instagram.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());
    }

    #[tokio::test]
    async fn page_defers_feed_to_fragment() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let content_path = temp.path().join("site.toml");

        let source = SiteContent::shipped_toml()
            .replace("posts = []", r#"posts = ["https://www.instagram.com/p/abc"]"#);
        fs::write(&content_path, source).unwrap();

        let config = BuildConfig {
            content_path: Some(content_path),
            ..shipped_config(&out)
        };
        let result = StaticBuilder::new(config).build().await.unwrap();
        assert_eq!(result.posts, 1);

        let page = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(page.contains("data-deferred-src"));
        assert!(!page.contains("instagram-media"));

        let fragment = fs::read_to_string(out.join("fragments/instagram.html")).unwrap();
        assert_eq!(fragment.matches(r#"class="instagram-media""#).count(), 1);
    }

    #[tokio::test]
    async fn sections_appear_in_page_order() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        StaticBuilder::new(shipped_config(&out)).build().await.unwrap();

        let page = fs::read_to_string(out.join("index.html")).unwrap();
        let order = [
            "class=\"site-header\"",
            "class=\"hero\"",
            "id=\"mission\"",
            "id=\"services\"",
            "id=\"about\"",
            "class=\"cta\"",
            "id=\"instagram\"",
            "id=\"contact\"",
            "class=\"site-footer\"",
        ];
        let positions: Vec<usize> = order.iter().map(|m| page.find(m).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn generates_sitemap_and_robots() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        StaticBuilder::new(shipped_config(&out)).build().await.unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://hansensexcavating.com/</loc>"));

        let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
        assert!(robots.ends_with("Sitemap: https://hansensexcavating.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn copies_public_files() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let public = temp.path().join("public");
        fs::create_dir_all(public.join("images")).unwrap();
        fs::write(public.join("logo.svg"), "<svg/>").unwrap();
        fs::write(public.join("images/truck.webp"), "webp").unwrap();

        let config = BuildConfig {
            public_dir: Some(public),
            ..shipped_config(&out)
        };
        let result = StaticBuilder::new(config).build().await.unwrap();

        assert_eq!(result.assets, 2);
        assert_eq!(fs::read_to_string(out.join("logo.svg")).unwrap(), "<svg/>");
        assert!(out.join("images/truck.webp").exists());
    }

    #[tokio::test]
    async fn script_carries_recipient() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        StaticBuilder::new(shipped_config(&out)).build().await.unwrap();

        let js = fs::read_to_string(out.join("assets/main.js")).unwrap();
        assert!(js.contains("excavat@telus.net"));
        assert!(js.contains("Quote Request from Website"));
    }

    #[test]
    fn quote_heading_uses_short_name() {
        let config = client_config(&SiteContent::shipped());
        assert_eq!(
            config.mail.composer.heading,
            "New quote request from Hansen's Excavating website:"
        );
        assert_eq!(
            config.mail.composer.signature,
            "Sent from hansensexcavating.com"
        );
    }

    #[tokio::test]
    async fn public_files_do_not_replace_generated_output() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let public = temp.path().join("public");
        fs::create_dir_all(public.join("assets")).unwrap();
        fs::write(public.join("index.html"), "stale").unwrap();
        fs::write(public.join("assets/main.js"), "stale").unwrap();
        fs::write(public.join("favicon.svg"), "<svg/>").unwrap();

        let config = BuildConfig {
            public_dir: Some(public),
            ..shipped_config(&out)
        };
        let result = StaticBuilder::new(config).build().await.unwrap();

        assert_eq!(result.assets, 1);
        assert!(out.join("favicon.svg").exists());
        assert_ne!(fs::read_to_string(out.join("index.html")).unwrap(), "stale");
        assert_ne!(fs::read_to_string(out.join("assets/main.js")).unwrap(), "stale");
    }

    #[tokio::test]
    async fn invalid_content_fails_build() {
        let temp = tempdir().unwrap();
        let content_path = temp.path().join("site.toml");
        fs::write(&content_path, "[site]\ntitle = \"x\"").unwrap();

        let config = BuildConfig {
            content_path: Some(content_path),
            ..shipped_config(&temp.path().join("dist"))
        };
        let err = StaticBuilder::new(config).build().await.unwrap_err();
        assert!(matches!(err, BuildError::Content(ContentError::InvalidToml(_))));
    }

    #[tokio::test]
    async fn missing_content_file_fails_build() {
        let temp = tempdir().unwrap();
        let config = BuildConfig {
            content_path: Some(temp.path().join("nope.toml")),
            ..shipped_config(&temp.path().join("dist"))
        };
        let err = StaticBuilder::new(config).build().await.unwrap_err();
        assert!(matches!(err, BuildError::Content(ContentError::ReadError { .. })));
    }

    #[test]
    fn page_options_normalise_base_url() {
        assert_eq!(PageOptions::new("/site").base_url, "/site/");
        assert_eq!(PageOptions::new("/").base_url, "/");
    }

    #[test]
    fn dev_scripts_are_appended() {
        let content = SiteContent::shipped();
        let options = PageOptions {
            scripts: vec!["/__reload.js".to_string()],
            ..PageOptions::default()
        };

        let html = render_page(&TemplateEngine::new(), &content, &options).unwrap();
        assert!(html.contains("__reload.js"));
    }

    #[test]
    fn inline_feed_skips_placeholder() {
        let content = SiteContent::shipped();
        let options = PageOptions {
            defer_feed: false,
            ..PageOptions::default()
        };

        let html = render_page(&TemplateEngine::new(), &content, &options).unwrap();
        assert!(!html.contains("data-deferred-src"));
        assert!(html.contains("Follow Our Work"));
    }
}
