use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use search_core::{encoding, Engine, SearchResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Defaults to the engine's configured result count.
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub title: String,
    /// Snippet of the document body.
    pub content: String,
    pub url: String,
    pub doc_id: String,
    pub score: f64,
}

impl From<SearchResult> for SearchHit {
    fn from(r: SearchResult) -> Self {
        Self { url: format!("/doc/{}", r.doc_id), title: r.title, content: r.snippet, doc_id: r.doc_id, score: r.score }
    }
}

/// Shared by every handler. The engine is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    /// Directory holding the static front-end.
    pub web_root: PathBuf,
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .fallback(static_handler)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(query) = params.q else {
        return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": "Invalid query", "total": 0 }))).into_response();
    };
    let start = std::time::Instant::now();
    let k = params.k.unwrap_or(state.engine.config().default_max_results).clamp(1, MAX_K);
    let results: Vec<SearchHit> = state.engine.search(&query, k).into_iter().map(SearchHit::from).collect();
    let elapsed = start.elapsed();
    tracing::info!(query = %query, hits = results.len(), took_ms = elapsed.as_millis() as u64, "search");
    Json(SearchResponse { query, took_ms: elapsed.as_millis(), took_s: elapsed.as_secs_f64(), total: results.len(), results }).into_response()
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<String>) -> Response {
    if !state.engine.contains(&doc_id) {
        return not_found("<h1>404 Not Found</h1><p>Document does not exist</p>");
    }
    let (title, content) = state.engine.get_document(&doc_id);
    Html(render_document(&title, &content)).into_response()
}

/// Serve files from the web root, normalizing their encoding on the way out.
pub async fn static_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let requested = match uri.path().trim_start_matches('/') {
        "" => "index.html",
        p => p,
    };
    let rel = PathBuf::from(requested);
    if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return not_found("<h1>404 Not Found</h1>");
    }
    let path = state.web_root.join(&rel);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let body = encoding::normalize(&bytes);
            ([(header::CONTENT_TYPE, content_type(requested))], body).into_response()
        }
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "static file not found");
            not_found("<h1>404 Not Found</h1>")
        }
    }
}

fn not_found(body: &'static str) -> Response {
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).as_deref() {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "text/html; charset=utf-8",
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_document(title: &str, content: &str) -> String {
    let title = escape_html(title);
    let content = escape_html(content);
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: 'Microsoft YaHei', Arial, sans-serif; line-height: 1.6; margin: 40px; background: #f5f5f5; }}
        .container {{ max-width: 800px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; }}
        .content {{ white-space: pre-wrap; color: #555; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="content">{content}</div>
        <a href="/">&larr; Back to search</a>
    </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type("app.JS"), "application/javascript; charset=utf-8");
        assert_eq!(content_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type("style.css"), "text/css; charset=utf-8");
    }
}
