// src/pipeline.rs

//! Mode-specialized transform pipelines.
//!
//! A [`PipelineBuilder`] composes an ordered list of transforms into a
//! [`Pipeline`]. Stage predicates are evaluated once, at build time, against
//! the resolved mode: an excluded stage is never stored, so Development and
//! Production pipelines differ in shape, not in runtime branches. The mode
//! never changes within a process, which is what makes this specialization
//! safe.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::asset::{Asset, Transform};
use crate::errors::PipelineError;
use crate::mode::Mode;

/// Builder for a mode-specialized pipeline.
pub struct PipelineBuilder {
    mode: Mode,
    stages: Vec<Arc<dyn Transform>>,
}

impl PipelineBuilder {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            stages: Vec::new(),
        }
    }

    /// Append an unconditional stage.
    pub fn stage(mut self, transform: impl Transform + 'static) -> Self {
        self.stages.push(Arc::new(transform));
        self
    }

    /// Append a stage only if `include` holds for the resolved mode.
    ///
    /// The predicate runs now, not at pipeline execution time.
    pub fn stage_if(
        self,
        include: impl Fn(Mode) -> bool,
        transform: impl Transform + 'static,
    ) -> Self {
        if include(self.mode) {
            self.stage(transform)
        } else {
            self
        }
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

/// An ordered composition of transforms applied to an asset stream.
///
/// Cloning is cheap; task actions capture a clone per invocation.
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Transform>>,
}

impl Pipeline {
    /// Read matching source assets under `root`, thread them through the
    /// stages in declared order, and write the final stream under `dest`.
    ///
    /// The first stage failure aborts the pipeline. Destination writes are
    /// atomic per asset, not per pipeline: a partially written destination
    /// may remain after a failure, and re-running overwrites it.
    pub fn run(
        &self,
        root: &Path,
        sources: &[String],
        dest: &Path,
    ) -> Result<(), PipelineError> {
        let matcher = build_globset(sources)?;
        let mut assets = collect_assets(root, &matcher)?;

        for stage in &self.stages {
            debug!(stage = stage.name(), count = assets.len(), "applying stage");
            assets = stage.apply(assets).map_err(|cause| PipelineError::Transform {
                stage: stage.name().to_string(),
                cause,
            })?;
        }

        for asset in &assets {
            let target = dest.join(&asset.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &asset.contents)?;
            debug!(path = %target.display(), "wrote asset");
        }

        Ok(())
    }

    /// Number of stages the builder kept for the resolved mode.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, PipelineError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| PipelineError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| PipelineError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Walk `root` and read every file whose root-relative path matches.
///
/// Paths are relativized with forward slashes so glob patterns behave the
/// same on every platform. The walk is sorted for a deterministic stream
/// order, which matters for stages like concat.
fn collect_assets(root: &Path, matcher: &GlobSet) -> Result<Vec<Asset>, PipelineError> {
    let mut paths = Vec::new();
    walk(root, root, matcher, &mut paths)?;
    paths.sort();

    let mut assets = Vec::with_capacity(paths.len());
    for rel in paths {
        let contents = fs::read(root.join(&rel))?;
        assets.push(Asset::new(rel, contents));
    }
    Ok(assets)
}

fn walk(
    root: &Path,
    dir: &Path,
    matcher: &GlobSet,
    out: &mut Vec<PathBuf>,
) -> Result<(), PipelineError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        // A source directory that doesn't exist yet yields an empty stream.
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(root, &path, matcher, out)?;
        } else if let Some(rel) = relative_str(root, &path) {
            if matcher.is_match(&rel) {
                out.push(PathBuf::from(rel));
            }
        }
    }
    Ok(())
}

/// Convert a path into a string relative to `root`, with forward slashes.
pub(crate) fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
