//! Static site generator for quarry business sites.
//!
//! Renders the single marketing page from the site content, the deferred
//! social-feed fragment, and the CSS/JS assets.

pub mod assets;
pub mod builder;
pub mod icons;
pub mod sections;
pub mod templates;

pub use builder::{
    client_config, render_fragment, render_page, BuildConfig, BuildError, BuildResult,
    PageOptions, StaticBuilder,
};
pub use sections::{Section, SectionContext};
pub use templates::TemplateEngine;
