use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::tempdir;
use tower::ServiceExt;

use hlsfront::config::Config;
use hlsfront::http::{build_router, state::AppState};

fn make_app(dir: &Path, host: Option<&str>) -> axum::Router {
    let config = Config {
        port: 8350,
        name: "Test Front".to_string(),
        dir: dir.to_path_buf(),
        host: host.map(str::to_string),
        localhost: true,
    };
    build_router(AppState {
        config: Arc::new(config),
    })
}

fn seed_channels(dir: &Path) {
    fs::write(dir.join("news.m3u8"), "#EXTM3U\n").unwrap();
    fs::write(dir.join("sports.m3u8"), "#EXTM3U\n").unwrap();
    fs::write(
        dir.join("channels.csv"),
        "News,news/stream.m3u8\nSports,sports/stream.m3u8\n",
    )
    .unwrap();
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ── GET / ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_is_200_even_with_nothing_scanned() {
    let dir = tempdir().unwrap();
    let response = make_app(dir.path(), None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_content_type_is_html() {
    let dir = tempdir().unwrap();
    let response = make_app(dir.path(), None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let ct = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(ct.contains("text/html"), "Expected text/html, got: {ct}");
}

#[tokio::test]
async fn index_points_at_daemon_when_no_index_found() {
    let dir = tempdir().unwrap();
    let response = make_app(dir.path(), None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert!(
        text.contains("No channel index found. Check that the capture daemon is running."),
        "Expected daemon hint in page:\n{text}"
    );
}

#[tokio::test]
async fn index_lists_channels_when_ready() {
    let dir = tempdir().unwrap();
    seed_channels(dir.path());
    let response = make_app(dir.path(), None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert!(text.contains("<p>Ready</p>"), "Expected Ready status:\n{text}");
    assert!(text.contains("<li>News</li>"), "Expected News entry:\n{text}");
    assert!(text.contains("<li>Sports</li>"), "Expected Sports entry:\n{text}");
    assert!(
        text.contains("href=\"/playlist\""),
        "Expected playlist link:\n{text}"
    );
}

#[tokio::test]
async fn index_reports_filling_while_manifests_lag() {
    let dir = tempdir().unwrap();
    seed_channels(dir.path());
    fs::remove_file(dir.path().join("sports.m3u8")).unwrap();
    let response = make_app(dir.path(), None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert!(
        text.contains("<p>Filling channel buffers</p>"),
        "Expected Filling status:\n{text}"
    );
}

#[tokio::test]
async fn index_escapes_channel_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rd.m3u8"), "#EXTM3U\n").unwrap();
    fs::write(
        dir.path().join("channels.csv"),
        "\"R&D <Live>\",rd/stream.m3u8\n",
    )
    .unwrap();
    let response = make_app(dir.path(), None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert!(
        text.contains("R&amp;D &lt;Live&gt;"),
        "Expected escaped name:\n{text}"
    );
    assert!(
        !text.contains("<Live>"),
        "Raw markup from a channel name leaked into the page:\n{text}"
    );
}

// ── GET /playlist ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn playlist_headers_mark_it_as_a_download() {
    let dir = tempdir().unwrap();
    seed_channels(dir.path());
    let response = make_app(dir.path(), None)
        .oneshot(Request::builder().uri("/playlist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ct = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(ct, "application/x-mpegurl");
    let cd = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(cd, "attachment; filename=channels.m3u8");
}

#[tokio::test]
async fn playlist_round_trip_with_configured_host() {
    let dir = tempdir().unwrap();
    seed_channels(dir.path());
    let response = make_app(dir.path(), Some("example.com"))
        .oneshot(Request::builder().uri("/playlist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert_eq!(
        text,
        "#EXTM3U\n\n\
         #EXTINF:-1, News\n\
         http://example.com/streams/news/stream.m3u8\n\n\
         #EXTINF:-1, Sports\n\
         http://example.com/streams/sports/stream.m3u8\n\n"
    );
}

#[tokio::test]
async fn playlist_uses_request_host_when_not_configured() {
    let dir = tempdir().unwrap();
    seed_channels(dir.path());
    let response = make_app(dir.path(), None)
        .oneshot(
            Request::builder()
                .uri("/playlist")
                .header(header::HOST, "tv.local:8350")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let text = body_text(response).await;
    assert!(
        text.contains("http://tv.local:8350/streams/news/stream.m3u8"),
        "Expected request host in URLs:\n{text}"
    );
}

#[tokio::test]
async fn playlist_names_are_raw_text() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rd.m3u8"), "#EXTM3U\n").unwrap();
    fs::write(
        dir.path().join("channels.csv"),
        "\"R&D <Live>\",rd/stream.m3u8\n",
    )
    .unwrap();
    let response = make_app(dir.path(), Some("example.com"))
        .oneshot(Request::builder().uri("/playlist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert!(
        text.contains("#EXTINF:-1, R&D <Live>"),
        "Playlist names must not be HTML-escaped:\n{text}"
    );
}

#[tokio::test]
async fn playlist_percent_encodes_stream_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("live.m3u8"), "#EXTM3U\n").unwrap();
    fs::write(
        dir.path().join("channels.csv"),
        "Live TV,live tv/stream.m3u8\n",
    )
    .unwrap();
    let response = make_app(dir.path(), Some("example.com"))
        .oneshot(Request::builder().uri("/playlist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert!(
        text.contains("http://example.com/streams/live%20tv/stream.m3u8"),
        "Expected encoded path segment:\n{text}"
    );
}

#[tokio::test]
async fn playlist_on_empty_directory_is_header_only() {
    let dir = tempdir().unwrap();
    let response = make_app(dir.path(), Some("example.com"))
        .oneshot(Request::builder().uri("/playlist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_text(response).await;
    assert_eq!(text, "#EXTM3U\n\n");
}
