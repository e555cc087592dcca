//! Development server with live reload for quarry sites.
//!
//! Renders the page from the content file on every request, watches the
//! content file and public directory, and tells connected browsers to
//! reload over a WebSocket.

pub mod reload;
pub mod server;
pub mod watcher;

pub use reload::{ReloadHub, ReloadMessage};
pub use server::{serve_dir, DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
