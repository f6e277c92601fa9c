use super::*;
use crate::view::InMemorySources;

fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for (name, deps) in edges {
        graph.insert(
            ViewName::new(*name),
            deps.iter().map(|d| d.to_string()).collect(),
        );
    }
    graph
}

fn names(order: &[ViewName]) -> Vec<&str> {
    order.iter().map(ViewName::as_str).collect()
}

#[test]
fn test_empty_graph() {
    let graph = DependencyGraph::new();
    assert!(graph.topological_order().unwrap().is_empty());
}

#[test]
fn test_single_node() {
    let graph = graph(&[("only", &[])]);
    assert_eq!(names(&graph.topological_order().unwrap()), vec!["only"]);
}

#[test]
fn test_chain_order() {
    let graph = graph(&[("top", &["mid"]), ("mid", &["base"]), ("base", &[])]);
    assert_eq!(
        names(&graph.topological_order().unwrap()),
        vec!["base", "mid", "top"]
    );
}

#[test]
fn test_ready_nodes_follow_insertion_order() {
    let graph = graph(&[
        ("fct", &["stg_b", "stg_a"]),
        ("stg_b", &[]),
        ("stg_a", &[]),
        ("report", &["fct"]),
    ]);
    assert_eq!(
        names(&graph.topological_order().unwrap()),
        vec!["stg_b", "stg_a", "fct", "report"]
    );
}

#[test]
fn test_dependencies_precede_dependents() {
    let graph = graph(&[
        ("e", &["d", "b"]),
        ("d", &["c"]),
        ("c", &["a"]),
        ("b", &["a"]),
        ("a", &[]),
        ("f", &[]),
    ]);
    let order = graph.topological_order().unwrap();
    assert_eq!(order.len(), graph.len());

    let position = |n: &str| order.iter().position(|v| v == n).unwrap();
    for (view, deps) in graph.iter() {
        for dep in deps {
            assert!(position(dep.as_str()) < position(view.as_str()), "{} before {}", dep, view);
        }
    }
}

#[test]
fn test_dangling_dependency_is_satisfied() {
    let graph = graph(&[("a", &["external_table"]), ("b", &["a"])]);
    assert_eq!(names(&graph.topological_order().unwrap()), vec!["a", "b"]);
}

#[test]
fn test_duplicate_references_do_not_block() {
    let graph = graph(&[("b", &["a", "a"]), ("a", &[])]);
    assert_eq!(names(&graph.topological_order().unwrap()), vec!["a", "b"]);
}

#[test]
fn test_cycle_names_all_nodes() {
    let graph = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
    let err = graph.topological_order().unwrap_err();
    match &err {
        CoreError::CircularDependency { nodes } => {
            assert_eq!(nodes, &vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        }
        other => panic!("expected cycle error, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("a, b, c"));
}

#[test]
fn test_cycle_reports_only_unresolved_nodes() {
    let graph = graph(&[("root", &[]), ("x", &["root", "y"]), ("y", &["x"])]);
    match graph.topological_order().unwrap_err() {
        CoreError::CircularDependency { nodes } => assert_eq!(nodes, vec!["x", "y"]),
        other => panic!("expected cycle error, got {other:?}"),
    }
}

#[test]
fn test_self_reference_is_cycle() {
    let graph = graph(&[("loop", &["loop"])]);
    assert!(matches!(
        graph.topological_order(),
        Err(CoreError::CircularDependency { .. })
    ));
}

#[test]
fn test_order_is_repeatable() {
    let graph = graph(&[("c", &["a"]), ("b", &["a"]), ("a", &[])]);
    let first = graph.topological_order().unwrap();
    let second = graph.topological_order().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_order_for_targets() {
    let graph = graph(&[("top", &["mid"]), ("mid", &["base"]), ("base", &[])]);
    let order = graph
        .order_for(&[ViewName::new("top"), ViewName::new("base")])
        .unwrap();
    assert_eq!(names(&order), vec!["base", "top"]);
}

#[test]
fn test_order_for_fails_on_cycle_outside_targets() {
    let graph = graph(&[("ok", &[]), ("x", &["y"]), ("y", &["x"])]);
    assert!(graph.order_for(&[ViewName::new("ok")]).is_err());
}

#[test]
fn test_reinsert_replaces_dependencies() {
    let mut graph = graph(&[("a", &["b"]), ("b", &[])]);
    graph.insert(ViewName::new("a"), vec![]);
    assert_eq!(graph.dependencies("a"), Some(&[][..]));
    assert_eq!(names(&graph.discovery_order()), vec!["a", "b"]);
}

#[test]
fn test_dependents() {
    let graph = graph(&[("base", &[]), ("mid", &["base"]), ("other", &["base"])]);
    assert_eq!(names(&graph.dependents("base")), vec!["mid", "other"]);
    assert!(graph.dependents("mid").is_empty());
}

#[test]
fn test_from_sources_extracts_refs_and_skips_unreadable() {
    let mut sources = InMemorySources::new();
    let base = sources.insert("views/base.sql", "SELECT 1");
    let mid = sources.insert("views/mid.sql", "SELECT * FROM {{ ref('base') }}");
    let gone = ViewFile::from_path("views/gone.sql").unwrap();

    let graph = DependencyGraph::from_sources(&[base, mid, gone], &sources);
    assert_eq!(graph.len(), 2);
    assert!(!graph.contains("gone"));
    assert_eq!(graph.dependencies("mid"), Some(&["base".to_string()][..]));
}
