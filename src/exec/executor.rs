// src/exec/executor.rs

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::GraphError;
use crate::exec::record::{ExecutionRecord, TaskState};
use crate::graph::TaskGraph;

/// Execute the dependency closure of `root`.
///
/// Graph-resolution problems (unknown root, cycle) are hard errors; task
/// failures are contained in the returned record.
pub async fn execute(graph: &TaskGraph, root: &str) -> Result<ExecutionRecord, GraphError> {
    let waves = graph.resolve_order(root)?;
    run_waves(graph, waves).await
}

/// Execute exactly the given task set, layered among themselves.
///
/// Dependencies outside the set are assumed satisfied by a prior full run.
/// This is the watcher's entry point for affected subgraphs.
pub async fn execute_subset<S: AsRef<str>>(
    graph: &TaskGraph,
    tasks: &[S],
) -> Result<ExecutionRecord, GraphError> {
    let waves = graph.resolve_order_many(tasks)?;
    run_waves(graph, waves).await
}

/// Run waves in order, with a full-settlement barrier between waves.
///
/// Within a wave, tasks are mutually independent by construction and run
/// concurrently. A failed task marks its (transitive) dependents `Skipped`
/// via the direct-dependency check at the start of each later wave; sibling
/// branches keep executing to maximize useful work.
async fn run_waves(
    graph: &TaskGraph,
    waves: Vec<Vec<String>>,
) -> Result<ExecutionRecord, GraphError> {
    let mut record = ExecutionRecord::with_pending(waves.iter().flatten().cloned());

    for wave in waves {
        debug!(?wave, "starting execution wave");
        let mut join: JoinSet<(String, anyhow::Result<()>)> = JoinSet::new();

        for name in wave {
            let blocked = graph.dependencies_of(&name).iter().any(|dep| {
                matches!(
                    record.state(dep),
                    Some(TaskState::Failed(_)) | Some(TaskState::Skipped)
                )
            });
            if blocked {
                warn!(task = %name, "skipping task: upstream dependency failed");
                record.set(&name, TaskState::Skipped);
                continue;
            }

            let Some(action) = graph.action_of(&name) else {
                // Waves only contain registered tasks, but don't crash if not.
                record.set(&name, TaskState::Failed("task has no action".into()));
                continue;
            };

            record.set(&name, TaskState::Running);
            info!(task = %name, "task started");
            join.spawn(async move {
                // Inner spawn isolates panics so a panicking action is
                // reported as a failure instead of tearing the wave down.
                let result = match tokio::spawn(action()).await {
                    Ok(result) => result,
                    Err(err) => Err(anyhow!("task panicked: {err}")),
                };
                (name, result)
            });
        }

        // Wave barrier: a later wave may depend on any task in this one.
        while let Some(joined) = join.join_next().await {
            match joined {
                Ok((name, Ok(()))) => {
                    info!(task = %name, "task succeeded");
                    record.set(&name, TaskState::Succeeded);
                }
                Ok((name, Err(err))) => {
                    warn!(task = %name, error = %err, "task failed");
                    record.set(&name, TaskState::Failed(format!("{err:#}")));
                }
                Err(err) => {
                    // The wrapper task itself cannot panic; log and move on.
                    warn!(error = %err, "wave worker join error");
                }
            }
        }
    }

    Ok(record)
}
