use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::channels::index::ChannelIndex;
use crate::channels::scanner;
use crate::http::state::AppState;

/// Characters percent-encoded within a URL path segment: controls, space,
/// the RFC 3986 path delimiters, and `%` itself so encoding is unambiguous.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// GET /playlist — scan the daemon's directory and serve the channel list
/// as a downloadable extended-M3U file.
pub async fn serve_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let index = scanner::scan(&state.config.dir);
    let host = advertised_host(&state, &headers);
    let body = render_playlist(&index, &host);
    (
        [
            (header::CONTENT_TYPE, "application/x-mpegurl"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=channels.m3u8",
            ),
        ],
        body,
    )
}

/// Host to advertise in stream URLs: explicit config wins, then the
/// request's Host header, then a localhost fallback.
fn advertised_host(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(host) = &state.config.host {
        return host.clone();
    }
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", state.config.port))
}

/// Render the extended-M3U channel playlist.
///
/// Stream URLs point at the daemon's segment tree under `/streams/` on
/// `host`; the duration is always -1 since every channel is live. Channel
/// names are emitted verbatim — M3U is plain text, not markup.
pub fn render_playlist(index: &ChannelIndex, host: &str) -> String {
    let mut playlist = String::from("#EXTM3U\n\n");
    for chan in &index.channels {
        playlist.push_str(&format!(
            "#EXTINF:-1, {}\nhttp://{}/streams/{}\n\n",
            chan.name,
            host,
            encode_stream_path(&chan.stream_path)
        ));
    }
    playlist
}

/// Percent-encode each segment of a relative stream path, keeping the `/`
/// separators intact.
fn encode_stream_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
