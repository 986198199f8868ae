//! Static file serving module
//!
//! Serves the root page and other assets from the configured directory,
//! with index file resolution and MIME type detection.

use crate::config::RoutesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a request path from the static directory
pub async fn serve_root(ctx: &RequestContext<'_>, routes: &RoutesConfig) -> Response<Full<Bytes>> {
    match load_from_directory(&routes.static_dir, ctx.path, &routes.index_files).await {
        Some((content, content_type)) => {
            response::build_file_response(content, content_type, ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a static file with index file support.
///
/// The resolved path is canonicalized and checked against the static
/// directory so `..` segments cannot escape it.
async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let relative_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(static_dir).join(&relative_path);

    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Directory requests resolve through the configured index files
    if file_path.is_dir() || relative_path.is_empty() {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}
