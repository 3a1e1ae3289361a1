//! tinyserve - minimal static file server
//!
//! Serves files from a site directory (with `images/` and `misc/`
//! namespaces) plus a JSON diagnostics endpoint at `/debug`.

pub mod config;
pub mod http;
pub mod server;
