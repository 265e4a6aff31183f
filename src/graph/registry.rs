// src/graph/registry.rs

use std::collections::{BTreeSet, HashMap, HashSet};

use globset::{Glob, GlobSet, GlobSetBuilder};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::errors::GraphError;
use crate::graph::task::{OutputCategory, Task, TaskAction};

struct TaskEntry {
    task: Task,
    /// Compiled watch subscription; empty set when the task declares no sources.
    matcher: GlobSet,
}

/// Registry of named tasks with validated dependency edges.
///
/// Edge direction is dependency -> dependent, so a task's dependencies are
/// its incoming neighbors. Registration is leaf-first: [`TaskGraph::register`]
/// rejects forward references outright, which statically rules out cycles for
/// incrementally built graphs. Batch registration ([`TaskGraph::register_many`])
/// allows intra-batch references in any order and runs an explicit cycle
/// check before committing.
#[derive(Default)]
pub struct TaskGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
    entries: HashMap<String, TaskEntry>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single task. All of its dependencies must already be
    /// registered. On any error the graph is left untouched.
    pub fn register(&mut self, task: Task) -> Result<(), GraphError> {
        if self.index.contains_key(&task.name) {
            return Err(GraphError::DuplicateTask(task.name));
        }
        for dep in &task.depends_on {
            if !self.index.contains_key(dep) {
                return Err(GraphError::UnknownDependency {
                    task: task.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
        let matcher = compile_sources(&task.name, &task.sources)?;

        let idx = self.graph.add_node(task.name.clone());
        for dep in &task.depends_on {
            let dep_idx = self.index[dep];
            self.graph.add_edge(dep_idx, idx, ());
        }
        self.index.insert(task.name.clone(), idx);
        debug!(task = %task.name, deps = ?task.depends_on, "registered task");
        self.entries
            .insert(task.name.clone(), TaskEntry { task, matcher });
        Ok(())
    }

    /// Register a batch of tasks that may reference each other in any order.
    ///
    /// Validates names, dependencies and acyclicity across the whole batch
    /// before committing anything; a failing batch leaves the graph unchanged.
    pub fn register_many(&mut self, tasks: Vec<Task>) -> Result<(), GraphError> {
        let mut batch_names = HashSet::new();
        for task in &tasks {
            if self.index.contains_key(&task.name) || !batch_names.insert(task.name.clone()) {
                return Err(GraphError::DuplicateTask(task.name.clone()));
            }
        }
        for task in &tasks {
            for dep in &task.depends_on {
                if !self.index.contains_key(dep) && !batch_names.contains(dep) {
                    return Err(GraphError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let mut matchers = Vec::with_capacity(tasks.len());
        for task in &tasks {
            matchers.push(compile_sources(&task.name, &task.sources)?);
        }

        // Stage the additions on a copy so a cycle can't leave a half-built graph.
        let mut candidate = self.graph.clone();
        let mut candidate_index = self.index.clone();
        for task in &tasks {
            let idx = candidate.add_node(task.name.clone());
            candidate_index.insert(task.name.clone(), idx);
        }
        for task in &tasks {
            let idx = candidate_index[&task.name];
            for dep in &task.depends_on {
                candidate.add_edge(candidate_index[dep], idx, ());
            }
        }

        if let Err(cycle) = toposort(&candidate, None) {
            let name = candidate[cycle.node_id()].clone();
            return Err(GraphError::CyclicDependency(name));
        }

        self.graph = candidate;
        self.index = candidate_index;
        for (task, matcher) in tasks.into_iter().zip(matchers) {
            debug!(task = %task.name, deps = ?task.depends_on, "registered task");
            self.entries
                .insert(task.name.clone(), TaskEntry { task, matcher });
        }
        Ok(())
    }

    /// Resolve the execution order for the dependency closure of `root`.
    ///
    /// Returns execution waves: each wave is a set of tasks whose dependencies
    /// all lie in strictly earlier waves; tasks within a wave have no
    /// dependency relationship among themselves and may run concurrently.
    pub fn resolve_order(&self, root: &str) -> Result<Vec<Vec<String>>, GraphError> {
        let root_idx = self
            .index
            .get(root)
            .copied()
            .ok_or_else(|| GraphError::TaskNotFound(root.to_string()))?;

        // Everything the root transitively depends on participates.
        let mut reachable = BTreeSet::new();
        let mut stack = vec![root_idx];
        while let Some(idx) = stack.pop() {
            if reachable.insert(self.graph[idx].clone()) {
                stack.extend(self.graph.neighbors_directed(idx, Direction::Incoming));
            }
        }

        self.waves_for(reachable)
    }

    /// Resolve execution waves restricted to exactly the given task set.
    ///
    /// Dependencies outside the set are assumed already satisfied by a prior
    /// full run; this is what the watcher uses for affected subgraphs.
    pub fn resolve_order_many<S: AsRef<str>>(
        &self,
        tasks: &[S],
    ) -> Result<Vec<Vec<String>>, GraphError> {
        let mut set = BTreeSet::new();
        for name in tasks {
            let name = name.as_ref();
            if !self.index.contains_key(name) {
                return Err(GraphError::TaskNotFound(name.to_string()));
            }
            set.insert(name.to_string());
        }
        self.waves_for(set)
    }

    /// Kahn layering: repeatedly peel the tasks with no unsatisfied
    /// dependencies inside the remaining set.
    fn waves_for(&self, mut remaining: BTreeSet<String>) -> Result<Vec<Vec<String>>, GraphError> {
        let mut waves = Vec::new();

        while !remaining.is_empty() {
            let wave: Vec<String> = remaining
                .iter()
                .filter(|name| {
                    self.dependencies_of(name)
                        .iter()
                        .all(|dep| !remaining.contains(dep))
                })
                .cloned()
                .collect();

            if wave.is_empty() {
                // No zero-in-degree task left: the remainder is cyclic.
                let witness = remaining
                    .iter()
                    .next()
                    .cloned()
                    .unwrap_or_default();
                return Err(GraphError::CyclicDependency(witness));
            }

            for name in &wave {
                remaining.remove(name);
            }
            waves.push(wave);
        }

        Ok(waves)
    }

    /// Every task whose source globs match `rel_path`, plus (transitively)
    /// every task depending on one of those: a dependency's output may feed a
    /// dependent's input, so dependents must re-run too.
    pub fn affected_tasks(&self, rel_path: &str) -> BTreeSet<String> {
        let mut affected = BTreeSet::new();
        let mut stack: Vec<NodeIndex> = self
            .entries
            .values()
            .filter(|entry| entry.matcher.is_match(rel_path))
            .map(|entry| self.index[&entry.task.name])
            .collect();

        while let Some(idx) = stack.pop() {
            if affected.insert(self.graph[idx].clone()) {
                stack.extend(self.graph.neighbors_directed(idx, Direction::Outgoing));
            }
        }

        affected
    }

    /// Direct dependencies of a task. Unknown names yield an empty list.
    pub fn dependencies_of(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|dep| self.graph[dep].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sources_of(&self, name: &str) -> &[String] {
        self.entries
            .get(name)
            .map(|entry| entry.task.sources.as_slice())
            .unwrap_or(&[])
    }

    pub fn category_of(&self, name: &str) -> Option<OutputCategory> {
        self.entries.get(name).and_then(|entry| entry.task.category)
    }

    pub(crate) fn action_of(&self, name: &str) -> Option<TaskAction> {
        self.entries.get(name).map(|entry| entry.task.action.clone())
    }
}

fn compile_sources(task: &str, sources: &[String]) -> Result<GlobSet, GraphError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in sources {
        let glob = Glob::new(pattern).map_err(|source| GraphError::InvalidGlob {
            task: task.to_string(),
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| GraphError::InvalidGlob {
        task: task.to_string(),
        pattern: sources.join(", "),
        source,
    })
}
