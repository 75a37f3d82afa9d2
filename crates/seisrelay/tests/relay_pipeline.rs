use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use seisrelay::Relay;
use seisrelay_convert::JmaBulletinConverter;
use seisrelay_publish::{HttpPublisher, RetryPolicy};
use seisrelay_test_utils::MockSink;
use seisrelay_watch::Dispatcher;
use tempfile::TempDir;

const QUAKE_BULLETIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Report>
  <Control>
    <Title>震源・震度に関する情報</Title>
    <DateTime>2024-01-01T12:00:05Z</DateTime>
    <Status>通常</Status>
    <EditorialOffice>気象庁本庁</EditorialOffice>
    <PublishingOffice>気象庁</PublishingOffice>
  </Control>
  <Head>
    <ReportDateTime>2024-01-01T21:00:00+09:00</ReportDateTime>
    <TargetDateTime>2024-01-01T20:55:00+09:00</TargetDateTime>
    <EventID>20240101205500</EventID>
    <Serial>1</Serial>
    <InfoKind>地震情報</InfoKind>
    <InfoType>発表</InfoType>
  </Head>
</Report>"#;

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        base: Duration::from_millis(5),
        growth: 1.5,
        ceiling: Duration::from_millis(150),
    }
}

fn move_in(staging: &TempDir, watched: &Path, name: &str, contents: &str) {
    let src = staging.path().join(name);
    fs::write(&src, contents).expect("write staged file");
    fs::rename(&src, watched.join(name)).expect("move file into watched dir");
}

async fn wait_for_hits(sink: &MockSink, n: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while sink.hits() < n {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {n} deliveries, saw {}",
            sink.hits()
        );
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pipeline_relays_bulletins_and_isolates_failures() {
    let sink = MockSink::ok().await.expect("start sink");
    let watched = TempDir::new().expect("watched dir");
    let staging = TempDir::new().expect("staging dir");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("build client");
    let publisher = HttpPublisher::new(sink.endpoint().to_string(), client, fast_policy());
    let relay = Arc::new(Relay::new(Arc::new(JmaBulletinConverter), publisher));

    tokio::spawn(Dispatcher::new(vec![watched.path().to_path_buf()]).run(relay));
    tokio::time::sleep(Duration::from_millis(250)).await;

    // One valid quake bulletin, one that fails conversion, one with an
    // unrecognized name. Only the first may reach the sink.
    move_in(&staging, watched.path(), "20240101_VXSE53_1.xml", QUAKE_BULLETIN);
    move_in(&staging, watched.path(), "20240101_VXSE51_broken.xml", "not xml at all");
    move_in(&staging, watched.path(), "notes.txt", "hello");

    wait_for_hits(&sink, 1).await;

    // The coordinating loop keeps accepting events after the failures.
    move_in(&staging, watched.path(), "20240102_VTSE41_1.xml", QUAKE_BULLETIN);
    wait_for_hits(&sink, 2).await;

    // Allow any stray deliveries from the dropped events to surface.
    tokio::time::sleep(Duration::from_millis(300)).await;

    let requests = sink.requests();
    assert_eq!(requests.len(), 2, "dropped events must not publish");
    assert_eq!(requests[0].path, "/jma.earthquake");
    assert_eq!(requests[1].path, "/jma.tsunami");

    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("payload is JSON");
    assert_eq!(body["event_id"], "20240101205500");
    assert_eq!(body["timestamp"]["register"], "");
    let convert_ts = body["timestamp"]["convert"].as_str().expect("convert ts");
    assert_eq!(convert_ts.len(), "2024/01/01 21:00:00.000".len());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delivery_retries_until_sink_recovers() {
    let sink = MockSink::start(vec![503, 200]).await.expect("start sink");
    let watched = TempDir::new().expect("watched dir");
    let staging = TempDir::new().expect("staging dir");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("build client");
    let publisher = HttpPublisher::new(sink.endpoint().to_string(), client, fast_policy());
    let relay = Arc::new(Relay::new(Arc::new(JmaBulletinConverter), publisher));

    tokio::spawn(Dispatcher::new(vec![watched.path().to_path_buf()]).run(relay));
    tokio::time::sleep(Duration::from_millis(250)).await;

    move_in(&staging, watched.path(), "20240101_VXSE52_1.xml", QUAKE_BULLETIN);

    wait_for_hits(&sink, 2).await;
    let requests = sink.requests();
    assert!(requests.iter().all(|r| r.path == "/jma.earthquake"));
}
