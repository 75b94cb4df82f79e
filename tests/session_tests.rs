//! Integration tests for channel session management
//!
//! These tests drive the session manager against wiremock sites and
//! assert the start-on-first-viewer / stop-on-last-viewer lifecycle.

use sitepulse::config::ChannelConfig;
use sitepulse::server::SessionManager;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn single_page() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string("<html><body>no links</body></html>")
        .insert_header("content-type", "text/html")
}

fn channel(name: &str, seed_url: String) -> ChannelConfig {
    ChannelConfig {
        name: name.to_string(),
        seed_url,
    }
}

#[tokio::test]
async fn test_first_viewer_starts_crawl_and_receives_events() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(single_page())
        .mount(&mock_server)
        .await;

    let sessions = SessionManager::new(&[channel("site", seed.clone())]);
    let mut events = sessions.join("site").expect("known channel");

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Event stream closed before first event");

    assert_eq!(event.url, seed);
    assert_eq!(event.metrics.success_count, 1);
}

#[tokio::test]
async fn test_second_viewer_does_not_restart_crawl() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    // Exactly one fetch of the seed regardless of viewer count
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(single_page())
        .expect(1)
        .mount(&mock_server)
        .await;

    let sessions = SessionManager::new(&[channel("site", seed)]);
    let _first = sessions.join("site").expect("known channel");
    let _second = sessions.join("site").expect("known channel");
    assert_eq!(sessions.viewer_count("site"), Some(2));

    // Give the single crawl time to run before wiremock verifies
    tokio::time::sleep(Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_last_viewer_leaving_stops_the_session() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    // Slow response keeps the crawl in flight while we tear it down
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(single_page().set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let sessions = SessionManager::new(&[channel("site", seed)]);
    let mut events = sessions.join("site").expect("known channel");

    sessions.leave("site");
    assert_eq!(sessions.viewer_count("site"), Some(0));

    // The session's broadcast sender is dropped on stop, so the stream
    // closes without ever emitting
    let result = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("Timed out waiting for stream close");
    assert!(result.is_err(), "Expected closed stream, got {:?}", result);
}

#[tokio::test]
async fn test_rejoin_after_empty_starts_a_fresh_crawl() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    // One fetch per session: the rejoin must start a second crawl
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(single_page())
        .expect(2)
        .mount(&mock_server)
        .await;

    let sessions = SessionManager::new(&[channel("site", seed)]);

    let mut events = sessions.join("site").expect("known channel");
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Event stream closed before first event");
    sessions.leave("site");

    let mut events = sessions.join("site").expect("known channel");
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Event stream closed before first event");
    sessions.leave("site");
}

#[tokio::test]
async fn test_channels_are_independent() {
    let mock_a = MockServer::start().await;
    let mock_b = MockServer::start().await;
    let seed_a = format!("{}/", mock_a.uri());
    let seed_b = format!("{}/", mock_b.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(single_page())
        .mount(&mock_a)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(single_page())
        .mount(&mock_b)
        .await;

    let sessions = SessionManager::new(&[
        channel("a", seed_a.clone()),
        channel("b", seed_b.clone()),
    ]);

    let mut events_a = sessions.join("a").expect("known channel");
    let mut events_b = sessions.join("b").expect("known channel");

    let event_a = tokio::time::timeout(Duration::from_secs(5), events_a.recv())
        .await
        .expect("Timed out on channel a")
        .expect("Channel a closed");
    let event_b = tokio::time::timeout(Duration::from_secs(5), events_b.recv())
        .await
        .expect("Timed out on channel b")
        .expect("Channel b closed");

    assert_eq!(event_a.url, seed_a);
    assert_eq!(event_b.url, seed_b);

    // Tearing down one channel leaves the other's pool untouched
    sessions.leave("a");
    assert_eq!(sessions.viewer_count("a"), Some(0));
    assert_eq!(sessions.viewer_count("b"), Some(1));
}

#[tokio::test]
async fn test_viewer_joining_mid_run_sees_later_events_only() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Seed responds slowly so the second viewer can join before the
    // first event is emitted
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/next">n</a></body></html>"#)
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(single_page())
        .mount(&mock_server)
        .await;

    let sessions = SessionManager::new(&[channel("site", format!("{}/", base_url))]);

    let mut early = sessions.join("site").expect("known channel");
    let mut late = sessions.join("site").expect("known channel");

    let first_early = tokio::time::timeout(Duration::from_secs(5), early.recv())
        .await
        .expect("Timed out")
        .expect("Stream closed");
    let first_late = tokio::time::timeout(Duration::from_secs(5), late.recv())
        .await
        .expect("Timed out")
        .expect("Stream closed");

    // Both joined before the crawl's first completion, so both see the
    // seed event first
    assert_eq!(first_early.url, first_late.url);
}
