//! Interactive pieces of a quarry site.
//!
//! The page itself is static; these are the few behaviours layered on top:
//! the quote form that opens the visitor's mail client, the Instagram embed
//! loader, the services/menu toggles and the deferred social-feed section.
//! Each contract is modelled in Rust and mirrored by the generated browser
//! script in [`client`].

pub mod client;
pub mod deferred;
pub mod embed;
pub mod mail;
pub mod toggle;

pub use client::{client_script, ClientConfig};
pub use deferred::{Deferred, DeferredError};
pub use embed::{
    embed_permalink, EmbedLoader, EmbedProcessor, FallbackTimer, LoaderState, ScriptHost,
    EMBED_SCRIPT_MARKER, EMBED_SCRIPT_SRC, EMBED_VERSION, FALLBACK_DELAY,
};
pub use mail::{BrowsingContext, ComposeError, MailComposer, MailtoUri, QuoteRequest};
pub use toggle::{MenuToggle, ServicesToggle, COLLAPSED_SERVICES};
