//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path normalization, dispatch
//! between the customer API and static file serving, and access logging.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    // Captured up front; the request is consumed by body-reading handlers
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let referer = header_value(&req, "referer");
    let user_agent = header_value(&req, "user-agent");

    // 1. Check body size before anything reads it
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        log_access(&state, &remote_addr, &method, &uri, version, referer, user_agent, &resp);
        return Ok(resp);
    }

    // 2. Normalize and dispatch
    let raw_path = uri.path().to_string();
    let path = normalize_path(&raw_path);

    let response = if is_api_path(path) {
        api::handle_customers(req, Arc::clone(&state), path).await?
    } else {
        match method {
            Method::GET | Method::HEAD => {
                let ctx = RequestContext {
                    path,
                    is_head: method == Method::HEAD,
                };
                static_files::serve_root(&ctx, &state.config.routes).await
            }
            _ => http::build_405_response("GET, HEAD"),
        }
    };

    log_access(&state, &remote_addr, &method, &uri, version, referer, user_agent, &response);
    Ok(response)
}

/// Strip trailing slashes so `/customers/` routes like `/customers`
fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Whether a normalized path belongs to the customer API
fn is_api_path(path: &str) -> bool {
    path == "/customers" || path.starts_with("/customers/")
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

/// Emit an access log entry for a completed request
#[allow(clippy::too_many_arguments)]
fn log_access(
    state: &AppState,
    remote_addr: &SocketAddr,
    method: &Method,
    uri: &hyper::Uri,
    version: Version,
    referer: Option<String>,
    user_agent: Option<String>,
    response: &Response<Full<Bytes>>,
) {
    if !state.config.logging.access_log {
        return;
    }

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        method.as_str().to_string(),
        uri.path().to_string(),
    );
    entry.query = uri.query().map(ToString::to_string);
    entry.http_version = http_version_label(version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.referer = referer;
    entry.user_agent = user_agent;

    logger::log_access(&entry, &state.config.logging.access_log_format);
}
