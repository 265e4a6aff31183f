// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::exec::execute_subset;
use crate::graph::{OutputCategory, TaskGraph};
use crate::pipeline::relative_str;

/// Options for the debounce loop.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period after the last matching event before a rebuild fires.
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
        }
    }
}

/// Emitted after every triggered rebuild, success or failure.
///
/// `categories` lists the output categories of the re-run tasks so a browser
/// client can choose full reload vs. in-place style injection.
#[derive(Debug, Clone, Serialize)]
pub struct RebuildComplete {
    pub tasks: Vec<String>,
    pub categories: BTreeSet<OutputCategory>,
    pub success: bool,
}

/// Handle keeping the underlying `notify` watcher alive.
///
/// Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and forward root-relative paths of created,
/// modified or removed files into `paths_tx`.
///
/// The `notify` callback runs on its own thread; an unbounded channel bridges
/// it into the async world, where a forwarding task relativizes paths.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    paths_tx: mpsc::Sender<String>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // tracing isn't reliably usable on the notify thread.
                    eprintln!("assetflow: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("assetflow: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!(root = %root.display(), "file watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                continue;
            }
            for path in &event.paths {
                match relative_str(&root, path) {
                    Some(rel) => {
                        if paths_tx.send(rel).await.is_err() {
                            debug!("debounce loop gone; stopping event forwarding");
                            return;
                        }
                    }
                    None => warn!(
                        path = %path.display(),
                        "could not relativize changed path against watch root"
                    ),
                }
            }
        }
        debug!("notify event stream ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// The Idle -> Debouncing -> Rebuilding -> Idle loop.
///
/// Matching change events accumulate affected task names and reset the
/// debounce timer, so a burst of events from a single save coalesces into one
/// rebuild. Paths matched by no task subscription never start the timer. On
/// expiry the affected subgraph runs to completion inline; events arriving
/// mid-rebuild wait in the channel and feed the next cycle, which serializes
/// overlapping rebuilds. A failed rebuild is reported and watching continues.
///
/// Returns when `paths_rx` closes.
pub async fn watch_loop(
    graph: Arc<TaskGraph>,
    mut paths_rx: mpsc::Receiver<String>,
    options: WatchOptions,
    complete_tx: mpsc::Sender<RebuildComplete>,
) -> Result<()> {
    let mut pending: BTreeSet<String> = BTreeSet::new();
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            maybe_path = paths_rx.recv() => {
                let Some(rel) = maybe_path else { break };
                let affected = graph.affected_tasks(&rel);
                if affected.is_empty() {
                    debug!(path = %rel, "change matched no task subscription");
                } else {
                    debug!(path = %rel, tasks = ?affected, "change mapped to tasks");
                    pending.extend(affected);
                    deadline = Some(Instant::now() + options.debounce);
                }
            }
            _ = sleep_until_opt(deadline), if deadline.is_some() => {
                deadline = None;
                let tasks: Vec<String> = std::mem::take(&mut pending).into_iter().collect();
                info!(?tasks, "rebuilding affected tasks");

                let record = execute_subset(graph.as_ref(), &tasks).await?;
                let success = record.success();
                for (task, cause) in record.failures() {
                    warn!(task, cause, "rebuild task failed");
                }

                let categories = tasks
                    .iter()
                    .filter_map(|task| graph.category_of(task))
                    .collect();
                let note = RebuildComplete {
                    tasks,
                    categories,
                    success,
                };
                info!(tasks = ?note.tasks, success, "rebuild complete");

                if complete_tx.send(note).await.is_err() {
                    break;
                }
            }
        }
    }

    Ok(())
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
