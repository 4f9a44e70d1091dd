use std::collections::BTreeMap;

use axum::{
    extract::Path,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;

/// Body served by `GET /`.
pub const HELLO: &str = "Hello, World!";

/// One paragraph of filler; `GET /lorem` serves it repeated [`LOREM_REPEAT`]
/// times so clients see a body far larger than any single read.
pub const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing \
    elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. ";

pub const LOREM_REPEAT: usize = 64;

pub fn lorem_page() -> String {
    LOREM.repeat(LOREM_REPEAT)
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/login", get(login))
        .route("/lorem", get(lorem))
        .route("/whoami", get(whoami))
        .route("/status/{code}", get(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> &'static str {
    HELLO
}

async fn login() -> impl IntoResponse {
    (
        AppendHeaders([
            (SET_COOKIE, "uid=1001; Path=/"),
            (SET_COOKIE, "sess=abc123; Path=/; HttpOnly"),
        ]),
        "ok",
    )
}

async fn lorem() -> String {
    lorem_page()
}

/// Echo selected request headers back as JSON so clients can verify what
/// they actually sent over the wire.
async fn whoami(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let mut seen = BTreeMap::new();
    for name in [
        "user-agent",
        "accept",
        "accept-language",
        "accept-charset",
        "connection",
    ] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            seen.insert(name.to_string(), value.to_string());
        }
    }
    Json(seen)
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}
