//! Directory watching and per-event dispatch.
//!
//! Design principles:
//! - run() consumes self - the watch loop can only be started once
//! - only moved-to events are acted on; a file still being written never
//!   reaches a handler
//! - units of work are fire-and-forget with internal error capture; the
//!   coordinating task never awaits a handler
//! - a failure of the watch primitive itself is fatal and ends run()

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{Result, WatchError};
use crate::event::FileEvent;

/// Per-event callback invoked from a spawned unit of work.
///
/// Returning an error drops the event: the dispatcher logs it with the
/// offending path and moves on. Nothing a handler does can stall the loop.
#[async_trait]
pub trait FileHandler: Send + Sync + 'static {
    async fn handle(&self, event: FileEvent) -> anyhow::Result<()>;
}

/// Watches a fixed set of directories and spawns one unit of work per
/// arriving file.
pub struct Dispatcher {
    dirs: Vec<PathBuf>,
}

impl Dispatcher {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Register watches on every directory, then service the notification
    /// stream until the watch primitive fails.
    ///
    /// Never returns Ok while the watcher is healthy; the Ok-less return
    /// type would be `!` if the stream were truly infinite.
    pub async fn run<H: FileHandler>(self, handler: Arc<H>) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        // The notify callback runs on its own thread; the unbounded sender
        // bridges it into the tokio runtime without blocking either side.
        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        for dir in &self.dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            info!(dir = %dir.display(), "Watching directory");
        }

        while let Some(res) = rx.recv().await {
            let event = res?;
            if !is_moved_to(&event.kind) {
                continue;
            }
            for path in event.paths {
                info!(path = %path.display(), "File detected");
                let file_event = FileEvent::new(path);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let path = file_event.path.clone();
                    if let Err(error) = handler.handle(file_event).await {
                        // Processing continues; only this event is dropped.
                        warn!(path = %path.display(), error = %error, "Dropped event after handler failure");
                    }
                });
            }
        }

        Err(WatchError::StreamClosed)
    }
}

/// True for files fully renamed/moved into a watched directory.
///
/// Create and write notifications are deliberately ignored so a bulletin
/// still being written is never picked up half-finished.
fn is_moved_to(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Name(RenameMode::To))
    )
}
