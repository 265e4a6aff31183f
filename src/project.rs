// src/project.rs

//! Default project wiring: the standard asset-site task graph.
//!
//! Registers the conventional tasks (clean, styles, scripts, images, fonts,
//! default) against a project root, with pipelines specialized for the
//! resolved mode. Real CSS/JS/image filters plug in as extra [`Transform`]
//! stages; the bundled ones are trivial reference transforms.
//!
//! [`Transform`]: crate::asset::Transform

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::ProjectConfig;
use crate::errors::GraphError;
use crate::graph::{OutputCategory, Task, TaskGraph};
use crate::mode::Mode;
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::transforms::{Banner, Compact, Concat, banner_text};

/// Register the standard asset tasks on `graph`.
///
/// Dependency shape: `clean` -> {styles, scripts, images, fonts} -> `default`.
pub fn register_tasks(
    graph: &mut TaskGraph,
    mode: Mode,
    root: &Path,
    cfg: &ProjectConfig,
) -> Result<(), GraphError> {
    let src = cfg.build.source.clone();
    let dest = root.join(&cfg.build.dest);
    let banner = banner_text(&cfg.package);

    graph.register(clean_task(dest.clone()))?;

    let styles = PipelineBuilder::new(mode)
        .stage_if(Mode::is_production, Banner::new(banner.clone()))
        .stage_if(Mode::is_production, Compact)
        .build();
    graph.register(pipeline_task(
        "styles",
        OutputCategory::Styles,
        styles,
        root.join(&src).join("css"),
        vec!["**/*.css".into()],
        dest.join("css"),
        vec![format!("{src}/css/**/*.css")],
    ))?;

    let scripts = PipelineBuilder::new(mode)
        .stage(Concat::new("main.js"))
        .stage_if(Mode::is_production, Banner::new(banner))
        .stage_if(Mode::is_production, Compact)
        .build();
    graph.register(pipeline_task(
        "scripts",
        OutputCategory::Scripts,
        scripts,
        root.join(&src).join("js"),
        vec!["**/*.js".into()],
        dest.join("js"),
        vec![format!("{src}/js/**/*.js")],
    ))?;

    // Images and fonts are straight copies; an empty pipeline passes the
    // stream through untouched.
    graph.register(pipeline_task(
        "images",
        OutputCategory::Images,
        PipelineBuilder::new(mode).build(),
        root.join(&src).join("img"),
        vec!["**/*.{gif,jpg,png,svg}".into()],
        dest.join("img"),
        vec![format!("{src}/img/**/*.{{gif,jpg,png,svg}}")],
    ))?;

    graph.register(pipeline_task(
        "fonts",
        OutputCategory::Fonts,
        PipelineBuilder::new(mode).build(),
        root.join(&src).join("fonts"),
        vec!["**/*.{ttf,woff,woff2,eot,svg}".into()],
        dest.join("fonts"),
        vec![format!("{src}/fonts/**/*.{{ttf,woff,woff2,eot,svg}}")],
    ))?;

    graph.register(Task::group(
        "default",
        ["styles", "scripts", "images", "fonts"],
    ))?;

    Ok(())
}

/// Destination-clearing task; naturally idempotent.
fn clean_task(dest: PathBuf) -> Task {
    Task::new("clean").action(move || {
        let dest = dest.clone();
        async move {
            for sub in ["css", "js", "img", "fonts"] {
                let dir = dest.join(sub);
                match tokio::fs::remove_dir_all(&dir).await {
                    Ok(()) => {}
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => {
                        return Err(err).with_context(|| format!("removing {dir:?}"));
                    }
                }
            }
            Ok(())
        }
    })
}

/// Wrap a pipeline run in a task. The blocking file I/O runs on the
/// blocking pool so wave concurrency stays useful.
fn pipeline_task(
    name: &str,
    category: OutputCategory,
    pipeline: Pipeline,
    base: PathBuf,
    globs: Vec<String>,
    dest: PathBuf,
    watch: Vec<String>,
) -> Task {
    Task::new(name)
        .after(["clean"])
        .sources(watch)
        .category(category)
        .action(move || {
            let pipeline = pipeline.clone();
            let base = base.clone();
            let globs = globs.clone();
            let dest = dest.clone();
            async move {
                tokio::task::spawn_blocking(move || pipeline.run(&base, &globs, &dest))
                    .await
                    .context("pipeline worker panicked")??;
                Ok(())
            }
        })
}
