//! Directory API and encyclopedia stand-in for tests, served by axum.
//!
//! Every route hands a normalised target (`/cookie`, `/countries`,
//! `/leaders?country=XX`, `/wiki/Page`) to the test's `route` function,
//! except the page named [`STALLED_PAGE`], which sends part of a body and
//! then never finishes.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures::{stream, StreamExt};
use tokio::net::TcpListener;

/// Hosts that `client` resolves to the test server.
pub const WIKI_HOSTS: &[&str] = &["en.wikipedia.test", "fr.wikipedia.test"];

/// Wiki page that stalls mid-body.
pub const STALLED_PAGE: &str = "Stalled";

type Route = Arc<dyn Fn(&str) -> (u16, String) + Send + Sync>;

pub async fn serve<F>(route: F) -> SocketAddr
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let route: Route = Arc::new(route);
    let app = Router::new()
        .route("/cookie", get(cookie))
        .route("/countries", get(countries))
        .route("/leaders", get(leaders))
        .route("/wiki/:page", get(wiki))
        .with_state(route);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Client that sends the encyclopedia test hosts to `addr` and ignores proxies.
pub fn client(addr: SocketAddr) -> reqwest::Client {
    WIKI_HOSTS
        .iter()
        .fold(reqwest::Client::builder(), |builder, host| builder.resolve(host, addr))
        .cookie_store(true)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn wiki_url(addr: SocketAddr, lang: &str, page: &str) -> String {
    format!("http://{}.wikipedia.test:{}/wiki/{}", lang, addr.port(), page)
}

fn reply((status, body): (u16, String)) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response()
}

async fn cookie(State(route): State<Route>) -> Response {
    let mut response = reply(route("/cookie"));
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_static("user_cookie=test; Path=/"),
    );
    response
}

async fn countries(State(route): State<Route>) -> Response {
    reply(route("/countries"))
}

async fn leaders(
    State(route): State<Route>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let country = params.get("country").map(String::as_str).unwrap_or("");
    reply(route(&format!("/leaders?country={}", country)))
}

async fn wiki(State(route): State<Route>, Path(page): Path<String>) -> Response {
    if page == STALLED_PAGE {
        return stalled();
    }
    reply(route(&format!("/wiki/{}", page)))
}

/// Promises 1000 bytes, sends a few, then holds the connection open.
fn stalled() -> Response {
    let head = stream::once(async {
        Ok::<_, Infallible>(Bytes::from_static(b"<html><body><div lang=\"en\"><p>Partial"))
    });
    let body = Body::from_stream(head.chain(stream::pending()));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_LENGTH, "1000"),
        ],
        body,
    )
        .into_response()
}
