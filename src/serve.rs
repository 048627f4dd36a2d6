//! Read-only HTTP endpoint serving art records.
//!
//! `GET /` answers with a uniformly random record; a request whose final path
//! segment parses as an integer selects that index modulo the collection
//! size, so any number maps to a record. Every response is 200: malformed
//! selectors fall back to random selection instead of erroring.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use rand::Rng;
use tracing::{info, warn};

use crate::store::ArtCollection;

/// Serve `db` over HTTP until the process is terminated.
///
/// An empty collection is refused up front; with at least one record every
/// request can be answered.
pub async fn run(db: ArtCollection, listen_address: &str, port: u16) -> Result<()> {
    if db.is_empty() {
        bail!("refusing to serve an empty database");
    }

    let app = Router::new()
        .route("/", get(serve_random))
        .route("/*path", get(serve_selected))
        .with_state(Arc::new(db));

    let listener = tokio::net::TcpListener::bind((listen_address, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", listen_address, port))?;

    info!("serving on {}:{}", listen_address, port);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")?;

    Ok(())
}

async fn serve_random(State(db): State<Arc<ArtCollection>>, headers: HeaderMap) -> Response {
    let index = rand::thread_rng().gen_range(0..db.len());
    respond(&db, index, wants_html(&headers))
}

async fn serve_selected(
    State(db): State<Arc<ArtCollection>>,
    UrlPath(path): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    let basename = path.rsplit('/').next().unwrap_or(path.as_str());
    let index = resolve_index(basename, db.len())
        .unwrap_or_else(|| rand::thread_rng().gen_range(0..db.len()));

    respond(&db, index, wants_html(&headers))
}

/// Map a path segment to a record index.
///
/// Integers select `n mod len` (Euclidean, so negative selectors wrap from
/// the end); anything else is `None` and the caller picks randomly.
fn resolve_index(segment: &str, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let n: i64 = segment.parse().ok()?;
    Some(n.rem_euclid(len as i64) as usize)
}

/// Whether the request negotiates an HTML response.
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|accept| {
            accept
                .split(',')
                .any(|part| part.split(';').next().map(str::trim) == Some("text/html"))
        })
        .unwrap_or(false)
}

fn respond(db: &ArtCollection, index: usize, html: bool) -> Response {
    info!("Serving art record #{index}");

    // The index is always reduced modulo len, so the lookup cannot fail;
    // a record that no longer decodes is served as an empty body.
    let art = match db.get(index) {
        Ok(record) => record.decode().unwrap_or_else(|err| {
            warn!("record #{index} failed to decode: {err}");
            String::new()
        }),
        Err(_) => String::new(),
    };

    if html {
        Html(render_html(&art, index)).into_response()
    } else {
        (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            art,
        )
            .into_response()
    }
}

fn render_html(art: &str, index: usize) -> String {
    format!(
        "<html><head></head>\
         <body style='color:#000;background-color:#FFF;'>\
         <div style='position:float;align:center;margin:auto;'>\
         <pre style='font-family:courier;font-size:12pt;'>{art}</pre></div>\
         <div style='margin-top:50px;margin-left:30px;'>\
         <a href='{index}' style='color:#AAA;'>link</a>\
         </body></html>",
        art = escape_html(art),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_resolve_index_wraps_modulo() {
        assert_eq!(resolve_index("5", 3), Some(2));
        assert_eq!(resolve_index("0", 3), Some(0));
        assert_eq!(resolve_index("3", 3), Some(0));
    }

    #[test]
    fn test_resolve_index_negative_wraps_from_end() {
        assert_eq!(resolve_index("-1", 3), Some(2));
        assert_eq!(resolve_index("-4", 3), Some(2));
    }

    #[test]
    fn test_resolve_index_non_numeric_falls_back() {
        assert_eq!(resolve_index("favourite", 3), None);
        assert_eq!(resolve_index("", 3), None);
        assert_eq!(resolve_index("1.5", 3), None);
    }

    #[test]
    fn test_wants_html() {
        let mut headers = HeaderMap::new();
        assert!(!wants_html(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/plain"));
        assert!(!wants_html(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9"),
        );
        assert!(wants_html(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/xml, text/html;q=0.8"),
        );
        assert!(wants_html(&headers));
    }

    #[test]
    fn test_render_html_escapes_art() {
        let html = render_html("<art> & co", 7);

        assert!(html.contains("&lt;art&gt; &amp; co"));
        assert!(html.contains("href='7'"));
    }
}
