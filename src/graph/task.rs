// src/graph/task.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

/// Boxed, re-invocable task body.
///
/// Actions must be idempotent: the executor may re-invoke a task after a
/// prior partial failure, and watch mode re-runs affected tasks on every
/// change. Asset-writing actions overwrite rather than append.
pub type TaskAction =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Output category carried in reload notifications, so a browser client can
/// choose between a full reload and in-place style injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputCategory {
    Styles,
    Scripts,
    Images,
    Fonts,
    Markup,
}

/// A named, dependency-aware unit of build work.
///
/// `sources` doubles as the watch subscription: a filesystem change matching
/// one of these globs re-triggers the task (and everything downstream of it).
#[derive(Clone)]
pub struct Task {
    pub(crate) name: String,
    pub(crate) depends_on: Vec<String>,
    pub(crate) sources: Vec<String>,
    pub(crate) category: Option<OutputCategory>,
    pub(crate) action: TaskAction,
}

impl Task {
    /// Start a task with a no-op action; chain builders to fill it in.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            sources: Vec::new(),
            category: None,
            action: noop_action(),
        }
    }

    /// Aggregate task: runs nothing itself, completes once all `members` have
    /// completed. This is the "run group G, then task T" barrier: anything
    /// declaring `after([group])` waits for the whole group.
    pub fn group<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name).after(members)
    }

    /// Declare dependencies; this task starts only after all of them have
    /// reached terminal success.
    pub fn after<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Declare the source globs this task reads (and should be re-run for).
    pub fn sources<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(globs.into_iter().map(Into::into));
        self
    }

    pub fn category(mut self, category: OutputCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Attach the task body.
    pub fn action<F, Fut>(mut self, body: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.action = Arc::new(move || Box::pin(body()));
        self
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field("sources", &self.sources)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

fn noop_action() -> TaskAction {
    Arc::new(|| Box::pin(async { Ok(()) }))
}
