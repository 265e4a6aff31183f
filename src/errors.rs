// src/errors.rs

//! Structured error taxonomy for the orchestration core.
//!
//! Graph-construction errors are fatal: no partial graph can be executed
//! safely, so `run()` surfaces them before any task starts. Pipeline errors
//! are contained per task and end up in the `ExecutionRecord` instead.

use thiserror::Error;

/// Errors raised while building or resolving the task graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("task '{0}' is already registered")]
    DuplicateTask(String),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("cycle detected in task graph involving task '{0}'")]
    CyclicDependency(String),

    #[error("no task named '{0}' is registered")]
    TaskNotFound(String),

    #[error("invalid source glob '{pattern}' for task '{task}': {source}")]
    InvalidGlob {
        task: String,
        pattern: String,
        source: globset::Error,
    },
}

/// Errors raised while running a pipeline inside a task.
#[derive(Error, Debug)]
pub enum PipelineError {
    // The cause is rendered into Display; anyhow::Error is not a std Error,
    // so it can't be a #[source].
    #[error("transform '{stage}' failed: {cause:#}")]
    Transform { stage: String, cause: anyhow::Error },

    #[error("invalid source glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: globset::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
