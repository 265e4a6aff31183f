// src/transforms.rs

//! Small reference transforms used by the default project wiring and tests.
//!
//! These are deliberately trivial: the real CSS/JS/image filters are external
//! collaborators. What matters here is that they honour the [`Transform`]
//! contract (deterministic, stream-in stream-out, fail only as a whole).

use anyhow::Result;

use crate::asset::{Asset, Transform};
use crate::config::PackageMeta;

/// Concatenate all text assets in stream order into a single output asset.
pub struct Concat {
    output: String,
}

impl Concat {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl Transform for Concat {
    fn name(&self) -> &str {
        "concat"
    }

    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        if assets.is_empty() {
            return Ok(assets);
        }
        let joined = assets
            .iter()
            .map(Asset::contents_str)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(vec![Asset::text(&self.output, joined)])
    }
}

/// Prepend a license banner comment to every asset in the stream.
pub struct Banner {
    text: String,
}

impl Banner {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Transform for Banner {
    fn name(&self) -> &str {
        "banner"
    }

    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        Ok(assets
            .into_iter()
            .map(|asset| {
                let body = asset.contents_str();
                asset.with_contents(format!("{}\n{}", self.text, body).into_bytes())
            })
            .collect())
    }
}

/// Strip `/* ... */` comments, line comments and blank lines from text assets.
///
/// Bang comments (`/*! ... */`) survive, so license banners stamped earlier
/// in the pipeline stay in the output. A poor man's minifier, good enough to
/// make Development and Production output visibly different without pulling
/// in a real codec.
pub struct Compact;

impl Transform for Compact {
    fn name(&self) -> &str {
        "compact"
    }

    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        Ok(assets
            .into_iter()
            .map(|asset| {
                let compacted = compact_text(&asset.contents_str());
                asset.with_contents(compacted.into_bytes())
            })
            .collect())
    }
}

fn compact_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let without_blocks = strip_block_comments(text);

    for line in without_blocks.lines() {
        let line = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(trimmed);
    }

    out
}

fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("/*") {
        let keep = rest[start..].starts_with("/*!");
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => {
                let comment_end = start + 2 + end + 2;
                if keep {
                    out.push_str(&rest[start..comment_end]);
                }
                rest = &rest[comment_end..];
            }
            None => {
                // Unterminated comment swallows the tail.
                if keep {
                    out.push_str(&rest[start..]);
                }
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Render the production license banner from package metadata.
///
/// Shape follows the classic `/*! name version ... */` header so minifiers
/// that preserve `/*!` comments keep it intact.
pub fn banner_text(pkg: &PackageMeta) -> String {
    format!(
        "/*!\n {} {}\n Copyright {}\n All rights reserved.\n {}\n*/",
        pkg.name, pkg.version, pkg.author, pkg.description
    )
}
