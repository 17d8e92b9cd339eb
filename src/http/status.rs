use std::borrow::Cow;
use std::fmt::Write;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::channels::index::ChannelIndex;
use crate::channels::scanner;
use crate::http::state::AppState;

/// Thin wrapper around `html_escape::encode_text`.
///
/// Escapes `&`, `<`, `>` so that channel names from the daemon's CSV can be
/// safely embedded in HTML text nodes.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

/// GET / — scan the daemon's directory and render the status page.
pub async fn status_page(State(state): State<AppState>) -> impl IntoResponse {
    let index = scanner::scan(&state.config.dir);
    let body = render_status_page(&state.config.name, &index);
    ([(header::CONTENT_TYPE, "text/html; charset=\"utf-8\"")], body)
}

/// Render the status page for one scan result.
///
/// With no channels at all the Ready/Filling distinction is meaningless
/// (zero rows equals zero manifests, which reads as Ready), so that case
/// points at the daemon instead of reporting a status.
pub fn render_status_page(name: &str, index: &ChannelIndex) -> String {
    let mut page = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{}</title>\n</head>\n<body>\n<h2>Status:</h2>\n",
        escape_html(name)
    );
    if index.channels.is_empty() {
        page.push_str("<p>No channel index found. Check that the capture daemon is running.</p>\n");
    } else {
        let _ = writeln!(page, "<p>{}</p>", index.status());
        page.push_str("<h2>Channel Listing:</h2>\n<ul>\n");
        for chan in &index.channels {
            let _ = writeln!(page, "  <li>{}</li>", escape_html(&chan.name));
        }
        page.push_str("</ul>\n<p><a target=\"_blank\" href=\"/playlist\">Open playlist</a></p>\n");
    }
    page.push_str("</body>\n</html>\n");
    page
}
