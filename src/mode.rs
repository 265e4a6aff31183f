// src/mode.rs

//! Build mode resolution.
//!
//! The mode is resolved exactly once at startup from the `--target` flag and
//! then passed by value; nothing downstream re-reads the environment. Pipeline
//! construction uses it to decide which stages exist at all, so a development
//! build carries no production code paths.

use std::fmt;

/// The two build modes. Everything that isn't recognizably a production
/// target resolves to `Development`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Resolve a raw `--target` value. Recognized production spellings are
    /// `prod`, `production` and `staging` (case-insensitive, whitespace
    /// trimmed); anything else, including absence, is `Development`.
    pub fn resolve(target: Option<&str>) -> Self {
        match target.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("prod" | "production" | "staging") => Mode::Production,
            _ => Mode::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Mode::Production)
    }

    pub fn is_development(self) -> bool {
        matches!(self, Mode::Development)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}
