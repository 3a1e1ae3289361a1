//! Request routing and file lookup.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use crate::http::mime::{ContentTypeResolver, GuessResolver, is_supported};
use crate::http::path::{Namespace, PathResolver};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::server::state::ServerState;

/// Where a GET request is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Debug,
    /// Namespace plus the path relative to its root
    File(Namespace, &'a str),
}

impl<'a> Route<'a> {
    /// Applies the routing rules in order; first match wins.
    pub fn classify(path: &'a str) -> Self {
        if path == "/debug" {
            Route::Debug
        } else if let Some(rest) = path.strip_prefix("/assets/") {
            Route::File(Namespace::Images, rest)
        } else if let Some(rest) = path.strip_prefix("/misc/") {
            Route::File(Namespace::Misc, rest)
        } else {
            Route::File(Namespace::Site, path.strip_prefix('/').unwrap_or(path))
        }
    }
}

pub struct Router {
    state: Arc<ServerState>,
    paths: PathResolver,
    content_types: Arc<dyn ContentTypeResolver>,
}

impl Router {
    pub fn new(state: Arc<ServerState>, paths: PathResolver) -> Self {
        Self::with_resolver(state, paths, Arc::new(GuessResolver))
    }

    pub fn with_resolver(
        state: Arc<ServerState>,
        paths: PathResolver,
        content_types: Arc<dyn ContentTypeResolver>,
    ) -> Self {
        Self { state, paths, content_types }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Produces the response for one parsed request.
    ///
    /// Every call counts as one request, whatever the outcome.
    pub async fn handle(&self, req: &Request) -> Response {
        self.state.record_request();

        if req.method != Method::GET {
            return Response::method_not_allowed();
        }

        match Route::classify(&req.path) {
            Route::Debug => self.debug(),
            Route::File(namespace, relative) => self.serve_file(namespace, relative).await,
        }
    }

    fn debug(&self) -> Response {
        match self.state.snapshot().to_json() {
            Ok(body) => Response::json(body),
            Err(e) => {
                tracing::error!("Failed to encode debug report: {}", e);
                Response::internal_error()
            }
        }
    }

    async fn serve_file(&self, namespace: Namespace, relative: &str) -> Response {
        let path = match self.paths.resolve(namespace, relative) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(?namespace, relative, "Rejected path: {:?}", e);
                return Response::not_found();
            }
        };

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Response::not_found(),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), "Stat failed: {}", e);
                }
                return Response::not_found();
            }
        };

        if !self.within_root(namespace, &path).await {
            tracing::warn!(path = %path.display(), "Path escapes its root");
            return Response::not_found();
        }

        let content_type = match self.content_types.content_type(&path) {
            Some(ct) if is_supported(&ct) => ct,
            other => {
                tracing::debug!(path = %path.display(), content_type = ?other, "Unsupported content type");
                return Response::unsupported_media_type();
            }
        };

        match tokio::fs::read(&path).await {
            Ok(body) => {
                tracing::debug!(path = %path.display(), bytes = metadata.len(), "Serving file");
                Response::ok(content_type, body)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "Failed to read file: {}", e);
                Response::internal_error()
            }
        }
    }

    /// Checks the real location of `path`, after symlinks, against its root.
    async fn within_root(&self, namespace: Namespace, path: &Path) -> bool {
        let root = self.paths.root(namespace);
        match (tokio::fs::canonicalize(root).await, tokio::fs::canonicalize(path).await) {
            (Ok(root), Ok(path)) => path.starts_with(root),
            _ => false,
        }
    }
}
