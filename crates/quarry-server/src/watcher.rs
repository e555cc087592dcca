//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The site content file was written
    ContentModified(PathBuf),

    /// A public file (image, favicon) was modified
    AssetModified(PathBuf),

    /// A public file was created
    Created(PathBuf),

    /// A watched file was deleted
    Deleted(PathBuf),
}

/// What the watcher looks at.
#[derive(Debug, Clone)]
struct WatchTargets {
    content_file: PathBuf,
    public_dir: Option<PathBuf>,
}

/// File watcher for the content file and the public directory.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `content_file` and everything under `public_dir`.
    ///
    /// The content file's directory is watched rather than the file itself,
    /// since editors often save by replacing the file.
    pub fn new(
        content_file: &Path,
        public_dir: &Path,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let content_file = absolute(content_file)?;
        let content_dir = content_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let public_dir = if public_dir.exists() {
            Some(absolute(public_dir)?)
        } else {
            tracing::debug!("Not watching missing {}", public_dir.display());
            None
        };

        let targets = WatchTargets {
            content_file,
            public_dir,
        };

        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        watcher
            .watch(&content_dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        if let Some(dir) = &targets.public_dir {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .map_err(std::io::Error::other)?;
        }

        std::thread::spawn(move || {
            let debounce = Duration::from_millis(100);
            let mut last: Option<(WatchEvent, Instant)> = None;

            while let Ok(event) = sync_rx.recv() {
                for path in &event.paths {
                    let Some(watch_event) = classify_event(&targets, path, &event.kind) else {
                        continue;
                    };

                    // Editors fire several writes per save
                    let now = Instant::now();
                    if let Some((prev, at)) = &last {
                        if *prev == watch_event && now.duration_since(*at) < debounce {
                            continue;
                        }
                    }
                    last = Some((watch_event.clone(), now));

                    if async_tx.blocking_send(watch_event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn absolute(path: &Path) -> Result<PathBuf, std::io::Error> {
    if path.exists() {
        path.canonicalize()
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(targets: &WatchTargets, path: &Path, kind: &EventKind) -> Option<WatchEvent> {
    let path_buf = path.to_path_buf();

    if path == targets.content_file {
        return match kind {
            EventKind::Create(_) | EventKind::Modify(_) => {
                Some(WatchEvent::ContentModified(path_buf))
            }
            EventKind::Remove(_) => Some(WatchEvent::Deleted(path_buf)),
            _ => None,
        };
    }

    let public_dir = targets.public_dir.as_ref()?;
    if !path.starts_with(public_dir) {
        return None;
    }

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path_buf)),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path_buf)),
        EventKind::Modify(_) => Some(WatchEvent::AssetModified(path_buf)),
        _ => None,
    }
}
