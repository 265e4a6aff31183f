// src/lib.rs

pub mod asset;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod graph;
pub mod logging;
pub mod mode;
pub mod pipeline;
pub mod project;
pub mod transforms;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::ProjectConfig;
use crate::exec::ExecutionRecord;
use crate::graph::TaskGraph;
use crate::mode::Mode;
use crate::watch::{ReloadServer, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and mode resolution
/// - task graph registration (pipelines specialized for the mode)
/// - one-shot execution of the requested root task
/// - (optional) the watch loop with live-reload notifications
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = config::load_or_default(&config_path)?;

    let mode = Mode::resolve(args.target.as_deref());
    info!(%mode, "resolved build mode");

    let root_dir = config_root_dir(&config_path);
    let mut graph = TaskGraph::new();
    project::register_tasks(&mut graph, mode, &root_dir, &cfg)?;

    if args.dry_run {
        print_dry_run(&graph, &cfg);
        return Ok(());
    }

    if !graph.contains(&args.task) {
        return Err(anyhow!("no task named '{}' is registered", args.task));
    }

    let record = exec::execute(&graph, &args.task).await?;
    report_record(&record);

    if args.watch {
        // A failed initial build is reported but doesn't stop watch mode;
        // the next edit gets a fresh chance.
        return run_watch(graph, root_dir, cfg).await;
    }

    if !record.success() {
        return Err(anyhow!("build '{}' finished with failed tasks", args.task));
    }

    Ok(())
}

/// Long-lived watch mode: filesystem events drive debounced subgraph rebuilds
/// and every rebuild is announced to connected browser clients.
async fn run_watch(graph: TaskGraph, root_dir: PathBuf, cfg: ProjectConfig) -> Result<()> {
    let graph = Arc::new(graph);

    let reload = ReloadServer::start(cfg.watch.reload_port)?;
    info!(port = reload.port(), "live-reload channel listening");

    let (paths_tx, paths_rx) = mpsc::channel::<String>(64);
    let _watcher = watch::spawn_watcher(root_dir, paths_tx)?;

    let (complete_tx, mut complete_rx) = mpsc::channel::<watch::RebuildComplete>(16);
    tokio::spawn(async move {
        while let Some(note) = complete_rx.recv().await {
            reload.notify(&note);
        }
    });

    let options = WatchOptions {
        debounce: Duration::from_millis(cfg.watch.debounce_ms),
    };

    tokio::select! {
        res = watch::watch_loop(graph, paths_rx, options, complete_tx) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested, stopping watch mode");
            Ok(())
        }
    }
}

/// Log terminal states; failures carry their rendered cause.
fn report_record(record: &ExecutionRecord) {
    for (task, cause) in record.failures() {
        warn!(task, cause, "task failed");
    }
    info!(
        tasks = record.len(),
        success = record.success(),
        "build finished"
    );
}

/// Directory containing the config file, or `.`; globs and destinations are
/// resolved against it.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Simple dry-run output: tasks, dependencies and watch globs.
fn print_dry_run(graph: &TaskGraph, cfg: &ProjectConfig) {
    println!("assetflow dry-run");
    println!("  build.source = {}", cfg.build.source);
    println!("  build.dest = {}", cfg.build.dest);
    println!();

    let mut names: Vec<&str> = graph.task_names().collect();
    names.sort_unstable();

    println!("tasks ({}):", names.len());
    for name in names {
        println!("  - {name}");
        let deps = graph.dependencies_of(name);
        if !deps.is_empty() {
            println!("      after: {deps:?}");
        }
        if let Some(category) = graph.category_of(name) {
            println!("      category: {category:?}");
        }
        let sources = graph.sources_of(name);
        if !sources.is_empty() {
            println!("      watch: {sources:?}");
        }
    }
}
