use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use assetflow::exec::{TaskState, execute, execute_subset};
use assetflow::graph::{Task, TaskGraph};

type TestResult = Result<(), Box<dyn Error>>;

fn counting_task(name: &str, counter: Arc<AtomicUsize>) -> Task {
    Task::new(name).action(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })
}

fn failing_task(name: &str) -> Task {
    Task::new(name).action(|| async { Err(anyhow!("boom")) })
}

#[tokio::test]
async fn chain_executes_each_task_exactly_once() -> TestResult {
    let counter = Arc::new(AtomicUsize::new(0));

    let mut graph = TaskGraph::new();
    graph.register(counting_task("a", counter.clone()))?;
    graph.register(counting_task("b", counter.clone()).after(["a"]))?;
    graph.register(counting_task("c", counter.clone()).after(["b"]))?;

    let record = execute(&graph, "c").await?;

    assert!(record.success());
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    for task in ["a", "b", "c"] {
        assert_eq!(record.state(task), Some(&TaskState::Succeeded));
    }

    Ok(())
}

#[tokio::test]
async fn failure_cascades_skipped_to_transitive_dependents() -> TestResult {
    // clean -> {build-styles, build-scripts} -> package, with build-scripts failing.
    let mut graph = TaskGraph::new();
    graph.register(Task::new("clean"))?;
    graph.register(Task::new("build-styles").after(["clean"]))?;
    graph.register(failing_task("build-scripts").after(["clean"]))?;
    graph.register(Task::group("package", ["build-styles", "build-scripts"]))?;

    let record = execute(&graph, "package").await?;

    assert!(!record.success());
    assert_eq!(record.state("clean"), Some(&TaskState::Succeeded));
    assert_eq!(record.state("build-styles"), Some(&TaskState::Succeeded));
    assert!(matches!(
        record.state("build-scripts"),
        Some(TaskState::Failed(cause)) if cause.contains("boom")
    ));
    assert_eq!(record.state("package"), Some(&TaskState::Skipped));

    Ok(())
}

#[tokio::test]
async fn unrelated_branches_keep_executing_after_a_failure() -> TestResult {
    let counter = Arc::new(AtomicUsize::new(0));

    let mut graph = TaskGraph::new();
    graph.register(failing_task("broken"))?;
    graph.register(Task::new("broken-child").after(["broken"]))?;
    graph.register(counting_task("healthy", counter.clone()))?;
    graph.register(counting_task("healthy-child", counter.clone()).after(["healthy"]))?;
    graph.register(Task::group("all", ["broken-child", "healthy-child"]))?;

    let record = execute(&graph, "all").await?;

    assert!(!record.success());
    assert_eq!(record.state("broken-child"), Some(&TaskState::Skipped));
    assert_eq!(record.state("all"), Some(&TaskState::Skipped));
    assert_eq!(record.state("healthy"), Some(&TaskState::Succeeded));
    assert_eq!(record.state("healthy-child"), Some(&TaskState::Succeeded));
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn re_invocation_after_failure_is_safe() -> TestResult {
    let counter = Arc::new(AtomicUsize::new(0));

    let mut graph = TaskGraph::new();
    graph.register(counting_task("ok", counter.clone()))?;
    graph.register(failing_task("flaky").after(["ok"]))?;

    let first = execute(&graph, "flaky").await?;
    assert!(!first.success());

    let second = execute(&graph, "flaky").await?;
    assert!(!second.success());
    assert_eq!(second.state("ok"), Some(&TaskState::Succeeded));

    // Both invocations ran the full subgraph; records are per invocation.
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn panicking_action_is_reported_as_failure() -> TestResult {
    let mut graph = TaskGraph::new();
    graph.register(Task::new("explodes").action(|| async {
        panic!("kaboom");
        #[allow(unreachable_code)]
        Ok(())
    }))?;
    graph.register(Task::new("after").after(["explodes"]))?;

    let record = execute(&graph, "after").await?;

    assert!(!record.success());
    assert!(matches!(
        record.state("explodes"),
        Some(TaskState::Failed(cause)) if cause.contains("panicked")
    ));
    assert_eq!(record.state("after"), Some(&TaskState::Skipped));

    Ok(())
}

#[tokio::test]
async fn subset_execution_runs_only_the_given_tasks() -> TestResult {
    let counter = Arc::new(AtomicUsize::new(0));
    let clean_counter = Arc::new(AtomicUsize::new(0));

    let mut graph = TaskGraph::new();
    graph.register(counting_task("clean", clean_counter.clone()))?;
    graph.register(counting_task("styles", counter.clone()).after(["clean"]))?;
    graph.register(counting_task("default", counter.clone()).after(["styles"]))?;

    let record = execute_subset(&graph, &["styles", "default"]).await?;

    assert!(record.success());
    assert_eq!(record.len(), 2);
    assert_eq!(record.state("clean"), None);
    assert_eq!(clean_counter.load(Ordering::SeqCst), 0);
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    Ok(())
}
