use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use seisrelay_watch::{Dispatcher, FileEvent, FileHandler};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Handler that reports every invocation on a channel and optionally fails
/// for paths containing a marker.
struct ChannelHandler {
    tx: mpsc::UnboundedSender<PathBuf>,
    fail_marker: Option<&'static str>,
}

#[async_trait]
impl FileHandler for ChannelHandler {
    async fn handle(&self, event: FileEvent) -> anyhow::Result<()> {
        let path = event.path.clone();
        let _ = self.tx.send(path.clone());
        if let Some(marker) = self.fail_marker {
            if path.to_string_lossy().contains(marker) {
                anyhow::bail!("synthetic failure for {}", path.display());
            }
        }
        Ok(())
    }
}

fn move_in(staging: &TempDir, watched: &Path, name: &str, contents: &str) {
    let src = staging.path().join(name);
    fs::write(&src, contents).expect("write staged file");
    fs::rename(&src, watched.join(name)).expect("move file into watched dir");
}

async fn start_dispatcher(
    watched: &Path,
    fail_marker: Option<&'static str>,
) -> mpsc::UnboundedReceiver<PathBuf> {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler = Arc::new(ChannelHandler { tx, fail_marker });
    let dispatcher = Dispatcher::new(vec![watched.to_path_buf()]);
    tokio::spawn(dispatcher.run(handler));
    // Give the watch registration a moment before files start moving.
    tokio::time::sleep(Duration::from_millis(250)).await;
    rx
}

async fn recv_one(rx: &mut mpsc::UnboundedReceiver<PathBuf>) -> PathBuf {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a dispatched event")
        .expect("dispatcher channel closed")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_moved_file_is_dispatched() {
    let watched = TempDir::new().expect("watched dir");
    let staging = TempDir::new().expect("staging dir");
    let mut rx = start_dispatcher(watched.path(), None).await;

    move_in(&staging, watched.path(), "bulletin.xml", "<Report/>");

    let path = recv_one(&mut rx).await;
    assert_eq!(path, watched.path().join("bulletin.xml"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_in_place_writes_are_ignored() {
    let watched = TempDir::new().expect("watched dir");
    let staging = TempDir::new().expect("staging dir");
    let mut rx = start_dispatcher(watched.path(), None).await;

    // Written in place: create + data-change events only, no rename-into.
    fs::write(watched.path().join("partial.xml"), "<Report/>").expect("write in place");
    move_in(&staging, watched.path(), "complete.xml", "<Report/>");

    let path = recv_one(&mut rx).await;
    assert_eq!(
        path,
        watched.path().join("complete.xml"),
        "only the moved-in file may be dispatched"
    );
    assert!(rx.try_recv().is_err(), "no further events expected");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failing_handler_does_not_stall_the_loop() {
    let watched = TempDir::new().expect("watched dir");
    let staging = TempDir::new().expect("staging dir");
    let mut rx = start_dispatcher(watched.path(), Some("bad")).await;

    move_in(&staging, watched.path(), "bad_bulletin.xml", "garbage");
    move_in(&staging, watched.path(), "good_bulletin.xml", "<Report/>");

    let mut seen = vec![recv_one(&mut rx).await, recv_one(&mut rx).await];

    // The loop keeps accepting events after the failure.
    move_in(&staging, watched.path(), "later_bulletin.xml", "<Report/>");
    seen.push(recv_one(&mut rx).await);

    let names: Vec<String> = seen
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.contains(&"bad_bulletin.xml".to_string()));
    assert!(names.contains(&"good_bulletin.xml".to_string()));
    assert!(names.contains(&"later_bulletin.xml".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_multiple_directories_are_watched() {
    let watched_a = TempDir::new().expect("watched dir a");
    let watched_b = TempDir::new().expect("watched dir b");
    let staging = TempDir::new().expect("staging dir");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler = Arc::new(ChannelHandler {
        tx,
        fail_marker: None,
    });
    let dispatcher = Dispatcher::new(vec![
        watched_a.path().to_path_buf(),
        watched_b.path().to_path_buf(),
    ]);
    tokio::spawn(dispatcher.run(handler));
    tokio::time::sleep(Duration::from_millis(250)).await;

    move_in(&staging, watched_a.path(), "a.xml", "<Report/>");
    move_in(&staging, watched_b.path(), "b.xml", "<Report/>");

    let first = recv_one(&mut rx).await;
    let second = recv_one(&mut rx).await;
    let mut names: Vec<String> = [first, second]
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.xml".to_string(), "b.xml".to_string()]);
}
