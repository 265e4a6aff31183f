// src/config/mod.rs

//! Project configuration for assetflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and validate it (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{BuildSection, PackageMeta, ProjectConfig, WatchSection};
