use std::collections::{BTreeSet, HashMap};

use assetflow::graph::{Task, TaskGraph};
use proptest::prelude::*;

// Generate a random acyclic dependency layout: task N may only depend on
// tasks 0..N, so registration order doubles as a valid leaf-first order.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(move |raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, candidates)| {
                    let mut deps: BTreeSet<usize> = BTreeSet::new();
                    for c in candidates {
                        if i > 0 {
                            deps.insert(c % i);
                        }
                    }
                    deps.into_iter().collect()
                })
                .collect()
        })
    })
}

fn build_graph(layout: &[Vec<usize>]) -> TaskGraph {
    let mut graph = TaskGraph::new();
    for (i, deps) in layout.iter().enumerate() {
        let task = Task::new(format!("task_{i}"))
            .after(deps.iter().map(|d| format!("task_{d}")));
        graph.register(task).expect("layout is leaf-first by construction");
    }
    graph
}

fn reachable(layout: &[Vec<usize>], root: usize) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        if seen.insert(i) {
            stack.extend(layout[i].iter().copied());
        }
    }
    seen
}

proptest! {
    #[test]
    fn waves_cover_the_closure_exactly_once_with_deps_strictly_earlier(
        layout in dag_strategy(12),
        root_seed in any::<usize>(),
    ) {
        let graph = build_graph(&layout);
        let root = root_seed % layout.len();

        let waves = graph
            .resolve_order(&format!("task_{root}"))
            .expect("acyclic by construction");

        // Each reachable task appears exactly once.
        let mut wave_of: HashMap<String, usize> = HashMap::new();
        for (w, wave) in waves.iter().enumerate() {
            for name in wave {
                prop_assert!(
                    wave_of.insert(name.clone(), w).is_none(),
                    "task {name} appears twice"
                );
            }
        }

        let expected: BTreeSet<String> = reachable(&layout, root)
            .into_iter()
            .map(|i| format!("task_{i}"))
            .collect();
        let actual: BTreeSet<String> = wave_of.keys().cloned().collect();
        prop_assert_eq!(&actual, &expected);

        // Every dependency lives in a strictly earlier wave.
        for (name, &w) in &wave_of {
            for dep in graph.dependencies_of(name) {
                prop_assert!(
                    wave_of[&dep] < w,
                    "dependency {dep} of {name} is not in an earlier wave"
                );
            }
        }

        // Tasks within a wave have no dependency relationship among themselves.
        for wave in &waves {
            let members: BTreeSet<&str> = wave.iter().map(String::as_str).collect();
            for name in wave {
                for dep in graph.dependencies_of(name) {
                    prop_assert!(!members.contains(dep.as_str()));
                }
            }
        }
    }
}
