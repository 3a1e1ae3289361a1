//! Content type detection and the allow-list of types the server will send.

use std::collections::HashMap;
use std::path::Path;

/// The only content types a file may be served with.
pub const SUPPORTED_CONTENT_TYPES: [&str; 3] = ["text/plain", "text/html", "image/png"];

/// Maps a file on disk to a MIME type.
///
/// Implementations are shared by every connection, hence `Send + Sync`.
/// `None` means the type is unknown, which callers treat as unsupported.
pub trait ContentTypeResolver: Send + Sync {
    fn content_type(&self, path: &Path) -> Option<String>;
}

/// Returns true if `content_type` is one the server is willing to send.
///
/// ```
/// # use tinyserve::http::mime::is_supported;
/// assert!(is_supported("image/png"));
/// assert!(!is_supported("application/pdf"));
/// assert!(!is_supported(""));
/// ```
pub fn is_supported(content_type: &str) -> bool {
    SUPPORTED_CONTENT_TYPES.contains(&content_type)
}

/// Guesses from the file extension using the `mime_guess` database.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessResolver;

impl ContentTypeResolver for GuessResolver {
    fn content_type(&self, path: &Path) -> Option<String> {
        mime_guess::from_path(path)
            .first_raw()
            .map(str::to_string)
    }
}

/// Fixed extension table. Lookups ignore ASCII case of the extension.
#[derive(Debug, Clone, Default)]
pub struct ExtensionMap {
    types: HashMap<String, String>,
}

impl ExtensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, extension: &str, content_type: impl Into<String>) -> Self {
        self.insert(extension, content_type);
        self
    }

    pub fn insert(&mut self, extension: &str, content_type: impl Into<String>) {
        self.types.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            content_type.into(),
        );
    }
}

impl ContentTypeResolver for ExtensionMap {
    fn content_type(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.types.get(&ext).cloned()
    }
}
