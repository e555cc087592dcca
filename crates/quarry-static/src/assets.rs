//! Asset pipeline for CSS and JavaScript processing.

use quarry_widgets::{client_script, ClientConfig};

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js(config: &ClientConfig) -> Result<String, String> {
        client_script(config).map_err(|e| format!("Client config error: {}", e))
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Black, white and safety red. Layout is mobile first with one breakpoint.
const DEFAULT_CSS: &str = r#"/* quarry theme */

:root {
  --accent: #dc2626;
  --accent-dark: #b91c1c;
  --ink: #0a0a0a;
  --ink-soft: #171717;
  --paper: #ffffff;
  --muted: #6b7280;
  --line: rgba(255, 255, 255, 0.1);
  --radius: 0.5rem;
  --container: 72rem;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

html {
  scroll-behavior: smooth;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  background: var(--paper);
  color: var(--ink);
  line-height: 1.6;
}

img {
  max-width: 100%;
  display: block;
}

a {
  color: inherit;
}

[hidden] {
  display: none !important;
}

.skip-link {
  position: absolute;
  left: -999px;
}

.skip-link:focus {
  left: 1rem;
  top: 1rem;
  z-index: 100;
  background: var(--accent);
  color: var(--paper);
  padding: 0.5rem 1rem;
}

.container {
  max-width: var(--container);
  margin: 0 auto;
  padding: 0 1rem;
}

.narrow {
  max-width: 48rem;
  text-align: center;
}

.icon {
  width: 1.25rem;
  height: 1.25rem;
  flex-shrink: 0;
}

.icon-xs {
  width: 0.75rem;
  height: 0.75rem;
}

.icon-sm {
  width: 1rem;
  height: 1rem;
}

.accent-bar {
  width: 3rem;
  height: 0.25rem;
  background: var(--accent);
  margin: 0 auto 2rem;
}

.eyebrow {
  color: var(--accent);
  font-weight: 700;
  letter-spacing: 0.15em;
  text-transform: uppercase;
  font-size: 0.8rem;
  text-align: center;
}

h2 {
  font-size: clamp(1.5rem, 4vw, 2.25rem);
  font-weight: 900;
  letter-spacing: -0.02em;
  text-align: center;
  margin-bottom: 1rem;
}

.lead {
  color: var(--muted);
  text-align: center;
  max-width: 36rem;
  margin: 0 auto 2.5rem;
}

/* Buttons */
.button {
  display: inline-flex;
  align-items: center;
  justify-content: center;
  gap: 0.5rem;
  padding: 0.9rem 2rem;
  border-radius: var(--radius);
  font-weight: 700;
  text-decoration: none;
  border: 2px solid transparent;
  cursor: pointer;
  font-size: 1rem;
}

.button-primary {
  background: var(--accent);
  color: var(--paper);
}

.button-primary:hover {
  background: var(--accent-dark);
}

.button-outline {
  border-color: rgba(255, 255, 255, 0.3);
  color: var(--paper);
  background: transparent;
}

.button-dark {
  background: var(--ink);
  color: var(--paper);
}

/* Header */
.site-header {
  position: fixed;
  inset: 0 0 auto 0;
  z-index: 50;
  background: rgba(10, 10, 10, 0.95);
  color: var(--paper);
  border-bottom: 1px solid var(--line);
}

.header-inner {
  display: flex;
  align-items: center;
  justify-content: space-between;
  height: 4.5rem;
  gap: 1rem;
}

.brand {
  display: flex;
  align-items: center;
  gap: 0.75rem;
  text-decoration: none;
  font-weight: 800;
}

.brand img {
  height: 3rem;
  width: auto;
}

.nav-desktop,
.header-phone {
  display: none;
}

.nav-desktop a,
.nav-mobile a {
  text-decoration: none;
  font-weight: 600;
}

.menu-button {
  background: none;
  border: 0;
  color: var(--paper);
  cursor: pointer;
}

.nav-mobile {
  display: flex;
  flex-direction: column;
  gap: 1rem;
  padding: 1rem;
  border-top: 1px solid var(--line);
}

/* Hero */
.hero {
  min-height: 100vh;
  display: flex;
  align-items: center;
  background: var(--ink) var(--hero-image, none) center / cover no-repeat;
  color: var(--paper);
  text-align: center;
  padding: 7rem 0 4rem;
  position: relative;
  border-bottom: 4px solid var(--accent);
}

.badge {
  color: var(--accent);
  font-weight: 700;
  letter-spacing: 0.2em;
  text-transform: uppercase;
  font-size: 0.8rem;
  margin-bottom: 2rem;
}

.hero h1 {
  font-size: clamp(2.25rem, 8vw, 6rem);
  font-weight: 900;
  line-height: 1.05;
  letter-spacing: -0.03em;
  margin-bottom: 1.5rem;
}

.tagline {
  color: #d1d5db;
  max-width: 42rem;
  margin: 0 auto 2.5rem;
  font-size: 1.15rem;
}

.hero-actions {
  display: flex;
  flex-wrap: wrap;
  gap: 1rem;
  justify-content: center;
  margin-bottom: 3rem;
}

.stats {
  list-style: none;
  display: grid;
  grid-template-columns: repeat(2, 1fr);
  gap: 1.5rem;
  max-width: 56rem;
  margin: 0 auto;
}

.stat {
  padding: 1.25rem;
  border-radius: 0.75rem;
  background: rgba(255, 255, 255, 0.05);
  border: 1px solid var(--line);
}

.stat-value {
  display: block;
  font-size: 2.5rem;
  font-weight: 900;
}

.stat-highlight .stat-value {
  color: var(--accent);
}

.stat-label {
  font-size: 0.8rem;
  color: #9ca3af;
  text-transform: uppercase;
  letter-spacing: 0.08em;
}

/* Mission */
.mission,
.contact,
.instagram {
  padding: 6rem 0;
}

.mission .prose {
  font-size: 1.2rem;
  color: #374151;
}

/* Services */
.services,
.about {
  background: var(--ink-soft);
  color: var(--paper);
  padding: 6rem 0;
}

.services-grid {
  list-style: none;
  display: grid;
  grid-template-columns: repeat(2, 1fr);
  gap: 1rem;
}

.service-card {
  position: relative;
  aspect-ratio: 4 / 3;
  overflow: hidden;
  border-radius: var(--radius);
  background: #262626;
}

.service-card img {
  position: absolute;
  inset: 0;
  width: 100%;
  height: 100%;
  object-fit: cover;
  opacity: 0.55;
}

.service-body {
  position: absolute;
  inset: auto 0 0 0;
  padding: 1rem;
  display: flex;
  gap: 0.5rem;
  align-items: center;
}

.service-body .icon {
  color: var(--accent);
}

.services-toggle {
  text-align: center;
  margin-top: 2.5rem;
}

.services-toggle [aria-expanded="true"] .icon {
  transform: rotate(180deg);
}

/* About */
.about .prose {
  color: #d1d5db;
  font-size: 1.1rem;
}

.timeline-wrap {
  margin-top: 4rem;
}

.timeline-heading {
  text-align: center;
  font-size: 1.5rem;
  margin-bottom: 2rem;
}

.timeline {
  list-style: none;
  border-left: 2px solid var(--accent);
  padding-left: 2rem;
  display: grid;
  gap: 3rem;
}

.milestone-year {
  font-size: clamp(2rem, 6vw, 3.75rem);
  font-weight: 900;
  color: var(--accent);
}

.milestone-card {
  display: flex;
  flex-direction: column;
  gap: 1.5rem;
  padding: 1.5rem;
  border-radius: 0.75rem;
  background: rgba(255, 255, 255, 0.05);
  border: 1px solid var(--line);
}

.milestone-card img {
  width: 100%;
  max-width: 16rem;
  aspect-ratio: 8 / 5;
  object-fit: cover;
  border-radius: var(--radius);
}

/* Call to action */
.cta {
  background: var(--accent);
  color: var(--paper);
  padding: 5rem 0;
}

.cta .lead {
  color: #fee2e2;
}

.cta .button-primary {
  background: var(--paper);
  color: var(--accent);
}

/* Instagram */
.instagram-grid {
  list-style: none;
  display: grid;
  gap: 1.5rem;
  margin-top: 3rem;
}

.instagram-post {
  display: flex;
  justify-content: center;
}

.instagram-media {
  background: var(--paper);
  border-radius: 3px;
  box-shadow: 0 0 1px 0 rgba(0, 0, 0, 0.5), 0 1px 10px 0 rgba(0, 0, 0, 0.15);
  max-width: 540px;
  min-width: 326px;
  width: 99.375%;
  padding: 16px;
}

.embed-fallback {
  color: #3897f0;
  font-weight: 600;
  text-decoration: none;
}

.embed-credit,
.instagram-empty,
.loading {
  color: var(--muted);
  text-align: center;
  font-size: 0.9rem;
}

.instagram > .container {
  text-align: center;
}

/* Contact */
.contact-grid {
  display: grid;
  gap: 2rem;
}

.card {
  border: 1px solid #e5e7eb;
  border-radius: 0.75rem;
  padding: 1.5rem;
}

.card h3 {
  display: flex;
  gap: 0.5rem;
  align-items: center;
  margin-bottom: 1.25rem;
}

.contact-list {
  list-style: none;
  display: grid;
  gap: 1.25rem;
}

.contact-list li {
  display: flex;
  gap: 0.75rem;
}

.contact-list .icon {
  color: var(--accent);
}

.contact-label {
  font-weight: 600;
}

.quote-form {
  display: grid;
  gap: 1rem;
}

.form-row {
  display: grid;
  gap: 0.25rem;
}

.form-row input,
.form-row textarea {
  border: 1px solid #d1d5db;
  border-radius: var(--radius);
  padding: 0.6rem 0.75rem;
  font: inherit;
}

.form-row textarea {
  min-height: 7.5rem;
}

.required {
  color: var(--accent);
}

.hint {
  font-size: 0.85rem;
  color: #4b5563;
}

.center {
  text-align: center;
}

/* Footer */
.site-footer {
  background: #000;
  color: #9ca3af;
  padding: 4rem 0 2rem;
  border-top: 4px solid var(--accent);
  font-size: 0.9rem;
}

.footer-grid {
  display: grid;
  gap: 2.5rem;
}

.footer-brand {
  display: flex;
  gap: 0.75rem;
  align-items: center;
}

.footer-name,
.site-footer h4 {
  color: var(--paper);
  font-weight: 700;
}

.site-footer h4 {
  text-transform: uppercase;
  letter-spacing: 0.05em;
  margin-bottom: 1rem;
}

.footer-services {
  list-style: none;
  display: grid;
  gap: 0.5rem;
}

.site-footer address {
  font-style: normal;
}

.copyright {
  text-align: center;
  font-size: 0.75rem;
  margin-top: 3rem;
  padding-top: 2rem;
  border-top: 1px solid #1f2937;
}

@media (min-width: 1024px) {
  .nav-desktop {
    display: flex;
    gap: 2rem;
  }

  .header-phone {
    display: inline-flex;
    gap: 0.5rem;
    align-items: center;
    text-decoration: none;
    font-weight: 700;
  }

  .menu-button,
  .nav-mobile {
    display: none !important;
  }

  .stats {
    grid-template-columns: repeat(4, 1fr);
  }

  .services-grid,
  .instagram-grid {
    grid-template-columns: repeat(3, 1fr);
  }

  .milestone-card {
    flex-direction: row;
  }

  .contact-grid {
    grid-template-columns: 1fr 1fr;
  }

  .footer-grid {
    grid-template-columns: repeat(4, 1fr);
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_widgets::MailComposer;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains("--accent"));
        assert!(css.contains(".service-card"));
    }

    #[test]
    fn generates_js() {
        let config = ClientConfig::new(MailComposer::new("a@b.test", "Acme", "b.test"));
        let js = AssetPipeline::generate_js(&config).unwrap();
        assert!(js.contains("addEventListener"));
        assert!(js.contains("a@b.test"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn theme_survives_minification() {
        let minified = AssetPipeline::minify_css(&AssetPipeline::generate_css()).unwrap();
        assert!(minified.contains(".services-grid"));
        assert!(minified.len() < DEFAULT_CSS.len());
    }
}
