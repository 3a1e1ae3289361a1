//! Mapping URL paths onto the three resource namespaces.

use std::path::{Component, Path, PathBuf};

use crate::config::SiteConfig;

/// The directory tree a request is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Site,
    Images,
    Misc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Nothing left after the namespace prefix
    Empty,
    /// `..`, `.`, an absolute component, or a NUL byte
    Traversal,
}

/// Resolves relative URL paths against fixed root directories.
///
/// Resolution is purely lexical and never touches the filesystem.
#[derive(Debug, Clone)]
pub struct PathResolver {
    site: PathBuf,
    images: PathBuf,
    misc: PathBuf,
    index: String,
}

impl PathResolver {
    pub fn new(site: impl Into<PathBuf>, images: impl Into<PathBuf>, misc: impl Into<PathBuf>) -> Self {
        Self {
            site: site.into(),
            images: images.into(),
            misc: misc.into(),
            index: "index.html".to_string(),
        }
    }

    pub fn from_config(site: &SiteConfig) -> Self {
        Self::new(site.root.clone(), site.images_dir(), site.misc_dir())
            .with_index(site.index.clone())
    }

    /// Document served for `/`.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn root(&self, namespace: Namespace) -> &Path {
        match namespace {
            Namespace::Site => &self.site,
            Namespace::Images => &self.images,
            Namespace::Misc => &self.misc,
        }
    }

    /// Joins `relative` onto the namespace root.
    ///
    /// `relative` is the URL path with its namespace prefix (and, for the site
    /// namespace, the leading `/`) already stripped. An empty site path means
    /// the index document.
    pub fn resolve(&self, namespace: Namespace, relative: &str) -> Result<PathBuf, PathError> {
        let relative = match (namespace, relative) {
            (Namespace::Site, "") => self.index.as_str(),
            (_, "") => return Err(PathError::Empty),
            (_, rel) => rel,
        };

        if relative.contains('\0') {
            return Err(PathError::Traversal);
        }

        let mut resolved = self.root(namespace).to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                _ => return Err(PathError::Traversal),
            }
        }

        Ok(resolved)
    }
}
