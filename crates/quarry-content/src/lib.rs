//! Content model for a quarry site.
//!
//! A site is driven by one immutable record: the business profile, the page
//! metadata and the list of Instagram posts to embed. It is loaded once from
//! TOML, validated, and shared read-only by every section renderer.

pub mod feed;
pub mod loader;
pub mod profile;

pub use feed::InstagramFeed;
pub use loader::{ContentError, SiteContent, SiteMeta};
pub use profile::{
    BusinessProfile, CallsToAction, Contact, Location, Milestone, Mission, ServiceArt, Stat,
    FOOTER_SERVICES,
};
