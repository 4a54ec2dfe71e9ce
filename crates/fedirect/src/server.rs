//! HTTP front end: lookup form, resolution endpoint, redirect
//!
//! All resolution logic lives in webfinger-client; this layer only parses
//! the submitted form values, maps errors to status codes, and renders the
//! redirect response.

use std::sync::Arc;

use acct_address::Address;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use webfinger_client::{LookupResult, WebFingerError, WebFingerResolver};

pub struct ServerConfig {
    pub port: u16,
    /// Optional operator contact line shown on the index page
    pub footer: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<WebFingerResolver>,
    pub footer: Option<String>,
}

/// Downstream caches may keep the redirect for three days
const CACHE_CONTROL_VALUE: &str = "max-age=259200, public";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>fedirect</title>
</head>
<body>
<h1>fedirect</h1>
<p>Jump to the profile page behind any fediverse address.</p>
<form action="/" method="get">
<label>Address: <input type="text" name="id" placeholder="user@example.social"></label>
<input type="submit" value="Go">
</form>
{footer}</body>
</html>
"#;

#[derive(Deserialize)]
struct LookupParams {
    id: Option<String>,
    #[serde(rename = "type")]
    requested_type: Option<String>,
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(lookup))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(
    resolver: Arc<WebFingerResolver>,
    config: ServerConfig,
) -> std::io::Result<()> {
    let state = AppState {
        resolver,
        footer: config.footer,
    };
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

async fn lookup(State(state): State<AppState>, Query(params): Query<LookupParams>) -> Response {
    let id = params.id.as_deref().unwrap_or("").trim();
    if id.is_empty() {
        return index_page(state.footer.as_deref()).into_response();
    }

    let address = match Address::parse(id) {
        Ok(address) => address,
        Err(err) => {
            warn!(id, "Rejected malformed identifier");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    let requested_type = params.requested_type.as_deref();
    match state.resolver.resolve_account(&address, requested_type).await {
        Ok(result) => redirect_response(&address, &result),
        Err(err) => {
            warn!(address = %address, error = %err, "Lookup failed");
            (status_for(&err), err.to_string()).into_response()
        }
    }
}

/// Map resolution errors to response status codes
///
/// The original service answered every failure with 500; distinguishing the
/// caller's mistake from upstream trouble is friendlier to both humans and
/// crawlers.
fn status_for(err: &WebFingerError) -> StatusCode {
    match err {
        WebFingerError::Parse(_) => StatusCode::BAD_REQUEST,
        WebFingerError::NotFound => StatusCode::NOT_FOUND,
        WebFingerError::Http(_) | WebFingerError::Status { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn redirect_response(address: &Address, result: &LookupResult) -> Response {
    // The href comes from the remote JRD; reject anything that is not a
    // valid header value instead of letting the builder panic
    let location = match HeaderValue::try_from(result.href.as_str()) {
        Ok(location) => location,
        Err(_) => {
            warn!(address = %address, "Resolved href is not a usable Location header");
            return (
                StatusCode::BAD_GATEWAY,
                "resolved profile URL is not usable".to_string(),
            )
                .into_response();
        }
    };

    let resolved = result
        .subject
        .strip_prefix("acct:")
        .unwrap_or(&result.subject);
    let body = format!(
        "Request succeeded for {address}\nFound {resolved} at {href}\nRedirecting …\n",
        href = result.href
    );

    // Remaining header names and values are static and always valid
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .header(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap()
}

fn index_page(footer: Option<&str>) -> Html<String> {
    let footer = footer
        .map(|f| format!("<p>\n<address>{f}</address>\n"))
        .unwrap_or_default();
    Html(INDEX_HTML.replace("{footer}", &footer))
}
