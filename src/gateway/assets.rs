//! Front-end asset lookup.
//!
//! Assets are compiled into the binary unless a static directory is
//! configured. Request paths are percent-decoded first; decoded paths
//! containing `..`, backslashes or NUL bytes never resolve.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::gateway::GatewayState;

const DEFAULT_DOCUMENT: &str = "/index.html";

const EMBEDDED: &[(&str, &str)] = &[
    ("/index.html", include_str!("../../frontend/index.html")),
    ("/style.css", include_str!("../../frontend/style.css")),
    ("/script.js", include_str!("../../frontend/script.js")),
];

/// A resolved asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub body: Cow<'static, [u8]>,
    pub content_type: &'static str,
}

/// Content type by extension; anything unrecognised is served as HTML.
pub fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else {
        "text/html"
    }
}

/// Map a request path to the asset key, or `None` if it tries to escape.
pub fn normalize(path: &str) -> Option<&str> {
    if path == "/" || path.is_empty() {
        return Some(DEFAULT_DOCUMENT);
    }
    if path.contains('\\') || path.contains('\0') {
        return None;
    }
    if path.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(path)
}

/// Look up an asset from the embedded set or from `root` on disk.
///
/// `path` is the raw request path; invalid UTF-8 after decoding is a miss.
pub async fn lookup(path: &str, root: Option<&Path>) -> Option<Asset> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let key = normalize(&decoded)?;
    let content_type = content_type_for(key);

    match root {
        None => EMBEDDED
            .iter()
            .find(|(name, _)| *name == key)
            .map(|&(_, body)| Asset {
                body: Cow::Borrowed(body.as_bytes()),
                content_type,
            }),
        Some(root) => {
            let file = resolve_under(root, key)?;
            match tokio::fs::read(&file).await {
                Ok(bytes) => Some(Asset {
                    body: Cow::Owned(bytes),
                    content_type,
                }),
                Err(e) => {
                    tracing::debug!("Static file {} not served: {}", file.display(), e);
                    None
                }
            }
        }
    }
}

/// Join only plain components of `key` onto `root`.
fn resolve_under(root: &Path, key: &str) -> Option<PathBuf> {
    let mut file = root.to_path_buf();
    for component in Path::new(key.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => file.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(file)
}

/// Fallback handler: serve a front-end file or 404 with no body.
pub async fn serve(State(state): State<GatewayState>, uri: Uri) -> Response {
    match lookup(uri.path(), state.static_dir.as_deref()).await {
        Some(asset) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, asset.content_type)],
            asset.body.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
