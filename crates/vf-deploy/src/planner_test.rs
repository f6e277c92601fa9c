use super::*;
use tempfile::TempDir;
use vf_core::{FsSourceProvider, InMemorySources};

fn config() -> Config {
    Config::from_yaml("warehouse:\n  catalog: memory\n  schema: main\n").unwrap()
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let views = temp.path().join("sql/views");
    std::fs::create_dir_all(&views).unwrap();
    for (name, content) in files {
        let path = views.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    temp
}

fn chain() -> Vec<(&'static str, &'static str)> {
    vec![
        ("top.sql", "SELECT * FROM {{ ref('mid') }}"),
        ("base.sql", "SELECT 1 AS id"),
        ("mid.sql", "SELECT * FROM {{ ref('base') }}"),
    ]
}

fn names(order: &[ViewName]) -> Vec<&str> {
    order.iter().map(ViewName::as_str).collect()
}

#[test]
fn test_plan_orders_dependencies_first() {
    let temp = project(&chain());
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let plan = planner.plan(&Selection::All).unwrap();
    assert_eq!(names(&plan.order), vec!["base", "mid", "top"]);
    assert_eq!(plan.len(), 3);
    assert!(plan.failures.is_empty());
    assert!(plan.warnings.is_empty());

    let mid = &plan.views[1];
    assert_eq!(mid.name, "mid");
    assert!(mid.compiled_content.contains(r#""memory"."main"."base""#));
    assert!(!mid.compiled_content.contains("ref("));
    assert_eq!(mid.full_name, r#""memory"."main"."mid""#);
}

#[test]
fn test_plan_order_is_repeatable() {
    let temp = project(&chain());
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let first = planner.plan(&Selection::All).unwrap().order;
    let second = planner.plan(&Selection::All).unwrap().order;
    assert_eq!(first, second);
}

#[test]
fn test_plan_rejects_dangling_reference() {
    let mut files = chain();
    files.push(("bad.sql", "SELECT * FROM {{ ref('ghost') }}"));
    let temp = project(&files);
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    match planner.plan(&Selection::All) {
        Err(DeployError::Validation { errors }) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("ghost"));
            assert!(errors[0].contains("bad"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_plan_rejects_cycle() {
    let temp = project(&[
        ("a.sql", "SELECT * FROM {{ ref('b') }}"),
        ("b.sql", "SELECT * FROM {{ ref('a') }}"),
        ("c.sql", "SELECT 1"),
    ]);
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    match planner.plan(&Selection::All) {
        Err(DeployError::Cycle { nodes }) => assert_eq!(nodes, vec!["a", "b"]),
        other => panic!("expected cycle error, got {:?}", other),
    }
}

#[test]
fn test_compile_failure_excludes_only_that_view() {
    let mut files = chain();
    files.push(("broken.sql", "SELECT {{ 1 + }}"));
    let temp = project(&files);
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let plan = planner.plan(&Selection::All).unwrap();
    assert_eq!(plan.order.len(), 4);
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.failures.len(), 1);
    assert_eq!(plan.failures[0].name, "broken");
}

#[test]
fn test_non_view_statement_is_a_parse_error() {
    let temp = project(&[("drop_it.sql", "DROP VIEW something")]);
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let plan = planner.plan(&Selection::All).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.failures.len(), 1);
}

#[test]
fn test_explicit_selection_resolves_against_whole_repository() {
    let temp = project(&[
        (
            "base.sql",
            r#"CREATE OR REPLACE VIEW "memory"."main"."base_v2" AS SELECT 1 AS id"#,
        ),
        ("mid.sql", "SELECT * FROM {{ ref('base') }}"),
    ]);
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let plan = planner
        .plan(&Selection::Explicit(vec!["mid".to_string()]))
        .unwrap();
    assert_eq!(names(&plan.order), vec!["mid"]);
    assert!(plan.views[0]
        .compiled_content
        .contains(r#""memory"."main"."base_v2""#));
}

#[test]
fn test_explicit_selection_unknown_names_only() {
    let temp = project(&chain());
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let err = planner
        .plan(&Selection::Explicit(vec!["nope".to_string()]))
        .unwrap_err();
    assert!(matches!(err, DeployError::NoViews));
}

#[test]
fn test_missing_views_dir_is_fatal_for_full_scan() {
    let temp = TempDir::new().unwrap();
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let err = planner.plan(&Selection::All).unwrap_err();
    assert!(matches!(
        err,
        DeployError::Core(vf_core::CoreError::ViewsDirNotFound { .. })
    ));
}

#[test]
fn test_duplicate_view_names_abort_planning() {
    let temp = project(&[
        ("a/x.sql", "SELECT 1"),
        ("b/x.sql", "SELECT * FROM {{ ref('y') }}"),
        ("y.sql", "SELECT 2"),
    ]);
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let err = planner.plan(&Selection::All).unwrap_err();
    let message = err.to_string();
    assert!(matches!(
        err,
        DeployError::Core(vf_core::CoreError::DuplicateViewName { .. })
    ));
    assert!(message.contains("a/x.sql"), "{}", message);
    assert!(message.contains("b/x.sql"), "{}", message);
}

#[test]
fn test_explicit_target_shadowing_repository_view_aborts() {
    let temp = project(&[("x.sql", "SELECT 1"), ("y.sql", "SELECT 2")]);
    let adhoc = temp.path().join("adhoc");
    std::fs::create_dir_all(&adhoc).unwrap();
    std::fs::write(adhoc.join("x.sql"), "SELECT 3").unwrap();
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();

    let err = planner
        .plan(&Selection::Explicit(vec!["adhoc/x.sql".to_string()]))
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::Core(vf_core::CoreError::DuplicateViewName { .. })
    ));
}

#[test]
fn test_compiled_output_is_saved() {
    let temp = project(&chain());
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider).unwrap();
    planner.plan(&Selection::All).unwrap();

    let saved = std::fs::read_to_string(temp.path().join("compiled/views/mid.sql")).unwrap();
    assert!(saved.starts_with("-- Compiled SQL from:"));
    assert!(saved.contains("CREATE OR REPLACE VIEW"));
}

#[test]
fn test_compiled_output_can_be_disabled() {
    let temp = project(&chain());
    let config = config();
    let planner = DeploymentPlanner::new(temp.path(), &config, &FsSourceProvider)
        .unwrap()
        .with_output(None);
    planner.plan(&Selection::All).unwrap();

    assert!(!temp.path().join("compiled").exists());
}

#[test]
fn test_compile_view_reregisters_declared_name() {
    let mut sources = InMemorySources::new();
    let file = sources.insert(
        "views/orders.sql",
        r#"CREATE VIEW "warehouse"."sales"."orders_current" AS SELECT 1"#,
    );
    let config = config();
    let planner = DeploymentPlanner::new("/project", &config, &sources)
        .unwrap()
        .with_output(None);

    let mut registry = ViewRegistry::new();
    registry.register(file.name.clone(), "placeholder");
    let (view, warnings) = planner.compile_view(&file, &mut registry).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(view.full_name, r#""warehouse"."sales"."orders_current""#);
    assert_eq!(
        registry.get("orders"),
        Some(r#""warehouse"."sales"."orders_current""#)
    );
    assert_eq!(view.catalog().as_deref(), Some("warehouse"));
}

#[test]
fn test_compile_view_collects_unresolved_ref_warnings() {
    let mut sources = InMemorySources::new();
    let file = sources.insert("views/report.sql", "SELECT * FROM {{ ref('elsewhere') }}");
    let config = config();
    let planner = DeploymentPlanner::new("/project", &config, &sources)
        .unwrap()
        .with_output(None);

    let mut registry = ViewRegistry::new();
    let (view, warnings) = planner.compile_view(&file, &mut registry).unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("elsewhere"));
    assert!(view
        .compiled_content
        .contains(r#""memory"."main"."elsewhere""#));
}
