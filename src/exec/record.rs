// src/exec/record.rs

use std::collections::BTreeMap;

/// Per-run state of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    /// Participates in this invocation but hasn't been dispatched yet.
    Pending,
    /// Dispatched and currently executing.
    Running,
    /// Terminal: completed successfully.
    Succeeded,
    /// Terminal: the action returned an error (rendered cause attached).
    Failed(String),
    /// Terminal: never executed because an upstream dependency failed.
    Skipped,
}

/// Mapping from task name to state for one executor invocation.
///
/// Created fresh per invocation and scoped to the requested subgraph; watch
/// mode produces a new record per triggered re-run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionRecord {
    states: BTreeMap<String, TaskState>,
}

impl ExecutionRecord {
    pub(crate) fn with_pending<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            states: tasks
                .into_iter()
                .map(|name| (name.into(), TaskState::Pending))
                .collect(),
        }
    }

    pub(crate) fn set(&mut self, name: &str, state: TaskState) {
        self.states.insert(name.to_string(), state);
    }

    pub fn state(&self, name: &str) -> Option<&TaskState> {
        self.states.get(name)
    }

    /// Aggregate outcome: true when no task terminated `Failed`.
    pub fn success(&self) -> bool {
        !self
            .states
            .values()
            .any(|state| matches!(state, TaskState::Failed(_)))
    }

    /// Failing tasks with their rendered causes, in name order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.states.iter().filter_map(|(name, state)| match state {
            TaskState::Failed(cause) => Some((name.as_str(), cause.as_str())),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
