// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from `Assetflow.toml`.
///
/// ```toml
/// [package]
/// name = "mysite"
/// version = "1.2.0"
/// author = "Jane Doe"
/// description = "Marketing site"
///
/// [build]
/// source = "src"
/// dest = "dist"
///
/// [watch]
/// debounce_ms = 250
/// reload_port = 35729
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Package metadata used for banner generation.
    #[serde(default)]
    pub package: PackageMeta,

    /// Source and destination roots.
    #[serde(default)]
    pub build: BuildSection,

    /// Watch-mode behaviour.
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[package]` section: opaque metadata feeding the production banner.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMeta {
    #[serde(default = "default_package_name")]
    pub name: String,
    #[serde(default = "default_package_version")]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

fn default_package_name() -> String {
    "site".to_string()
}

fn default_package_version() -> String {
    "0.0.0".to_string()
}

impl Default for PackageMeta {
    fn default() -> Self {
        Self {
            name: default_package_name(),
            version: default_package_version(),
            author: String::new(),
            description: String::new(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Source tree root, relative to the config file's directory.
    #[serde(default = "default_source")]
    pub source: String,

    /// Destination artifact tree, relative to the config file's directory.
    #[serde(default = "default_dest")]
    pub dest: String,
}

fn default_source() -> String {
    "src".to_string()
}

fn default_dest() -> String {
    "dist".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            dest: default_dest(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Quiet period in milliseconds before a change burst triggers a rebuild.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Preferred port for the live-reload websocket.
    #[serde(default = "default_reload_port")]
    pub reload_port: u16,
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_reload_port() -> u16 {
    35729
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            reload_port: default_reload_port(),
        }
    }
}
