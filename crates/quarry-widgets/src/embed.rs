//! Instagram embed loader.
//!
//! The embed script is a third-party resource that, once loaded, exposes a
//! global re-scan entry point. The loader attaches the script at most once per
//! page lifetime and afterwards only signals it:
//!
//! ```text
//! Unloaded --mount, no script--> Loading --script loaded--> Ready
//!                                                     Ready --mount--> process()
//! ```
//!
//! A fallback timer re-scans shortly after mount in case placeholders were
//! inserted before the script finished loading.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Third-party embed script.
pub const EMBED_SCRIPT_SRC: &str = "https://www.instagram.com/embed.js";

/// Substring used to find an already-attached embed script.
pub const EMBED_SCRIPT_MARKER: &str = "instagram.com/embed.js";

/// Embed markup version understood by the script.
pub const EMBED_VERSION: u8 = 14;

/// Delay before the fallback re-scan.
pub const FALLBACK_DELAY: Duration = Duration::from_millis(1000);

/// The script's re-scan entry point (`instgrm.Embeds.process()` in the browser).
pub trait EmbedProcessor {
    fn process(&self);
}

/// The document the loader works against.
pub trait ScriptHost {
    /// Whether a script whose `src` contains `marker` is attached.
    fn has_script(&self, marker: &str) -> bool;

    /// Attach a script tag for `src`.
    fn attach_script(&mut self, src: &str);

    /// The script's global, if it has finished loading.
    fn processor(&self) -> Option<&dyn EmbedProcessor>;
}

/// Loader lifecycle. There is no way back to `Unloaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Unloaded,
    Loading,
    Ready,
}

/// Attach-once, signal-many loader for the embed script.
#[derive(Debug, Clone)]
pub struct EmbedLoader {
    src: String,
    marker: String,
    state: LoaderState,
}

impl Default for EmbedLoader {
    fn default() -> Self {
        Self::new(EMBED_SCRIPT_SRC, EMBED_SCRIPT_MARKER)
    }
}

impl EmbedLoader {
    /// Loader for a script at `src`, recognised on the page by `marker`.
    pub fn new(src: &str, marker: &str) -> Self {
        Self {
            src: src.to_string(),
            marker: marker.to_string(),
            state: LoaderState::Unloaded,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Called whenever a batch of placeholders is mounted.
    pub fn mount(&mut self, host: &mut impl ScriptHost) {
        if !host.has_script(&self.marker) {
            if self.state == LoaderState::Unloaded {
                tracing::debug!("Attaching embed script {}", self.src);
                host.attach_script(&self.src);
                self.state = LoaderState::Loading;
            }
            return;
        }

        match host.processor() {
            Some(processor) => {
                processor.process();
                self.state = LoaderState::Ready;
            }
            None => {
                // Attached by someone else and still loading.
                if self.state == LoaderState::Unloaded {
                    self.state = LoaderState::Loading;
                }
            }
        }
    }

    /// Called from the script's load callback.
    pub fn script_loaded(&mut self, host: &impl ScriptHost) {
        if self.state == LoaderState::Loading {
            self.state = LoaderState::Ready;
        }

        if let Some(processor) = host.processor() {
            processor.process();
        }
    }

    /// Fallback re-scan. Returns whether the processor was available.
    pub fn fallback(host: &impl ScriptHost) -> bool {
        match host.processor() {
            Some(processor) => {
                processor.process();
                true
            }
            None => {
                tracing::debug!("Embed script not ready, skipping fallback re-scan");
                false
            }
        }
    }
}

/// Pending fallback re-scan. Dropping it cancels the re-scan.
#[derive(Debug)]
pub struct FallbackTimer {
    handle: JoinHandle<bool>,
}

impl FallbackTimer {
    /// Schedule a fallback re-scan of `host` after `delay`.
    pub fn arm<H>(host: Arc<H>, delay: Duration) -> Self
    where
        H: ScriptHost + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            EmbedLoader::fallback(host.as_ref())
        });

        Self { handle }
    }

    /// Cancel the re-scan (the component unmounted).
    pub fn cancel(self) {
        drop(self);
    }

    /// Whether the timer has fired or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for FallbackTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Permalink as written into a placeholder's `data-instgrm-permalink`.
pub fn embed_permalink(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}utm_source=ig_embed", url, sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    impl Counter {
        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EmbedProcessor for Counter {
        fn process(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A document with a list of script tags and, once loaded, the global.
    #[derive(Default)]
    struct FakeDocument {
        scripts: Vec<String>,
        global: Option<Counter>,
    }

    impl FakeDocument {
        fn finish_loading(&mut self) {
            self.global = Some(Counter::default());
        }

        fn processed(&self) -> usize {
            self.global.as_ref().map(Counter::count).unwrap_or(0)
        }
    }

    impl ScriptHost for FakeDocument {
        fn has_script(&self, marker: &str) -> bool {
            self.scripts.iter().any(|s| s.contains(marker))
        }

        fn attach_script(&mut self, src: &str) {
            self.scripts.push(src.to_string());
        }

        fn processor(&self) -> Option<&dyn EmbedProcessor> {
            self.global.as_ref().map(|c| c as &dyn EmbedProcessor)
        }
    }

    #[test]
    fn first_mount_attaches_script() {
        let mut doc = FakeDocument::default();
        let mut loader = EmbedLoader::default();

        loader.mount(&mut doc);

        assert_eq!(doc.scripts, vec![EMBED_SCRIPT_SRC.to_string()]);
        assert_eq!(loader.state(), LoaderState::Loading);
    }

    #[test]
    fn never_attaches_twice() {
        let mut doc = FakeDocument::default();
        let mut loader = EmbedLoader::default();

        for _ in 0..5 {
            loader.mount(&mut doc);
        }
        doc.finish_loading();
        loader.script_loaded(&doc);
        for _ in 0..5 {
            loader.mount(&mut doc);
        }

        assert_eq!(doc.scripts.len(), 1);
    }

    #[test]
    fn separate_loaders_share_one_script() {
        let mut doc = FakeDocument::default();

        EmbedLoader::default().mount(&mut doc);
        EmbedLoader::default().mount(&mut doc);
        EmbedLoader::default().mount(&mut doc);

        assert_eq!(doc.scripts.len(), 1);
    }

    #[test]
    fn load_callback_makes_ready_and_processes() {
        let mut doc = FakeDocument::default();
        let mut loader = EmbedLoader::default();

        loader.mount(&mut doc);
        doc.finish_loading();
        loader.script_loaded(&doc);

        assert_eq!(loader.state(), LoaderState::Ready);
        assert_eq!(doc.processed(), 1);
    }

    #[test]
    fn ready_mount_signals_instead_of_attaching() {
        let mut doc = FakeDocument::default();
        let mut loader = EmbedLoader::default();

        loader.mount(&mut doc);
        doc.finish_loading();
        loader.script_loaded(&doc);
        loader.mount(&mut doc);
        loader.mount(&mut doc);

        assert_eq!(doc.processed(), 3);
        assert_eq!(loader.state(), LoaderState::Ready);
    }

    #[test]
    fn mount_while_loading_does_nothing() {
        let mut doc = FakeDocument::default();
        let mut loader = EmbedLoader::default();

        loader.mount(&mut doc);
        loader.mount(&mut doc);

        assert_eq!(loader.state(), LoaderState::Loading);
        assert_eq!(doc.processed(), 0);
    }

    #[test]
    fn fallback_tolerates_missing_global() {
        let doc = FakeDocument::default();
        assert!(!EmbedLoader::fallback(&doc));
    }

    #[test]
    fn permalink_carries_utm_source() {
        assert_eq!(
            embed_permalink("https://www.instagram.com/p/abc/"),
            "https://www.instagram.com/p/abc/?utm_source=ig_embed"
        );
        assert_eq!(
            embed_permalink("https://www.instagram.com/p/abc/?img_index=2"),
            "https://www.instagram.com/p/abc/?img_index=2&utm_source=ig_embed"
        );
    }

    struct SharedDocument {
        global: Option<Counter>,
    }

    impl ScriptHost for SharedDocument {
        fn has_script(&self, _marker: &str) -> bool {
            true
        }

        fn attach_script(&mut self, _src: &str) {}

        fn processor(&self) -> Option<&dyn EmbedProcessor> {
            self.global.as_ref().map(|c| c as &dyn EmbedProcessor)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_timer_fires_after_delay() {
        let doc = Arc::new(SharedDocument {
            global: Some(Counter::default()),
        });

        let timer = FallbackTimer::arm(Arc::clone(&doc), FALLBACK_DELAY);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(doc.global.as_ref().unwrap().count(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert_eq!(doc.global.as_ref().unwrap().count(), 1);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_timer_never_fires() {
        let doc = Arc::new(SharedDocument {
            global: Some(Counter::default()),
        });

        let timer = FallbackTimer::arm(Arc::clone(&doc), FALLBACK_DELAY);
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert_eq!(doc.global.as_ref().unwrap().count(), 0);
    }
}
