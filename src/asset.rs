// src/asset.rs

//! Assets and the transform seam.
//!
//! An [`Asset`] is an immutable snapshot of one item flowing through a
//! pipeline: a logical (destination-relative) path plus its content bytes.
//! Transforms consume one asset stream and produce another; the concrete
//! transforms (CSS compilers, minifiers, image codecs) are external
//! collaborators behind the [`Transform`] trait.

use std::path::PathBuf;

use anyhow::Result;

/// One item in an asset stream.
///
/// `path` is logical and relative (forward slashes); the pipeline decides the
/// destination directory it is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl Asset {
    pub fn new(path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }

    /// Convenience constructor for text assets.
    pub fn text(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into().into_bytes(),
        }
    }

    /// Contents interpreted as UTF-8, lossy. Text transforms use this; binary
    /// transforms should work on `contents` directly.
    pub fn contents_str(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }

    /// Replace the contents, keeping the path.
    pub fn with_contents(&self, contents: Vec<u8>) -> Self {
        Self {
            path: self.path.clone(),
            contents,
        }
    }
}

/// A single asset-to-asset processing stage.
///
/// Contract for collaborators:
/// - must be deterministic given identical input and mode
/// - must not fail for recoverable per-asset issues; fail the whole stream
///   only for unrecoverable conditions
pub trait Transform: Send + Sync {
    /// Stage name, used in error reporting and logs.
    fn name(&self) -> &str;

    /// Consume one asset stream and produce the next.
    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>>;
}
