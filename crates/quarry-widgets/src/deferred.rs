//! Deferred work resolved independently of the main render path.
//!
//! Below-the-fold sections are produced by a task that runs alongside the
//! main page render. Until it resolves the page shows a placeholder; if the
//! owner goes away first the task is aborted.

use std::future::Future;

use tokio::task::{JoinError, JoinHandle};

/// Errors from resolving a deferred task.
#[derive(Debug, thiserror::Error)]
pub enum DeferredError {
    #[error("Deferred task was cancelled")]
    Cancelled,

    #[error("Deferred task panicked: {0}")]
    Panicked(String),
}

impl From<JoinError> for DeferredError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            DeferredError::Cancelled
        } else {
            DeferredError::Panicked(err.to_string())
        }
    }
}

/// A cancellable task producing `T`. Dropping it before [`resolve`](Self::resolve)
/// aborts the task.
#[derive(Debug)]
pub struct Deferred<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Run an async task.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
        }
    }

    /// Run CPU-bound work on the blocking pool. Abort only takes effect if
    /// the work has not started yet.
    pub fn spawn_blocking<F>(work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            handle: Some(tokio::task::spawn_blocking(work)),
        }
    }

    /// Whether the task has completed (or been aborted).
    pub fn is_ready(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }

    /// Wait for the result.
    pub async fn resolve(mut self) -> Result<T, DeferredError> {
        match self.handle.take() {
            Some(handle) => Ok(handle.await?),
            None => Err(DeferredError::Cancelled),
        }
    }

    /// Abort the task.
    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Deferred<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn resolves_blocking_work() {
        let deferred = Deferred::spawn_blocking(|| "<section>feed</section>".to_string());
        let html = deferred.resolve().await.unwrap();
        assert_eq!(html, "<section>feed</section>");
    }

    #[tokio::test]
    async fn resolves_async_work() {
        let deferred = Deferred::spawn(async { 2 + 2 });
        assert_eq!(deferred.resolve().await.unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_aborts_pending_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        let deferred = Deferred::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        });
        drop(deferred);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn resolve_waits_for_task() {
        let deferred = Deferred::spawn(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "done"
        });

        let mut resolve = tokio_test::task::spawn(deferred.resolve());
        tokio_test::assert_pending!(resolve.poll());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(tokio_test::assert_ready!(resolve.poll()).unwrap(), "done");
    }

    #[tokio::test]
    async fn reports_panics() {
        let deferred: Deferred<()> = Deferred::spawn(async { panic!("template exploded") });
        assert!(matches!(
            deferred.resolve().await,
            Err(DeferredError::Panicked(_))
        ));
    }

    #[test]
    fn ready_flag_tracks_completion() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let deferred = Deferred::spawn(async { 1 });
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            assert!(deferred.is_ready());
            deferred.cancel();
        });
    }
}
