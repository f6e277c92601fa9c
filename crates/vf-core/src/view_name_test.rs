use super::*;

#[test]
fn test_view_name_creation() {
    let name = ViewName::new("user_metrics");
    assert_eq!(name.as_str(), "user_metrics");
    assert_eq!(format!("{}", name), "user_metrics");
}

#[test]
fn test_view_name_equality() {
    let name = ViewName::new("user_metrics");
    assert_eq!(name, "user_metrics");
    assert_eq!(name, "user_metrics".to_string());
}

#[test]
fn test_view_name_try_new_empty() {
    assert!(ViewName::try_new("").is_none());
    assert!(ViewName::try_from("").is_err());
}

#[test]
#[should_panic(expected = "ViewName must not be empty")]
fn test_view_name_new_panics_on_empty() {
    let _ = ViewName::new("");
}

#[test]
fn test_view_name_from_path_uses_stem() {
    let name = ViewName::from_path(Path::new("sql/views/marts/orders.sql")).unwrap();
    assert_eq!(name, "orders");
}

#[test]
fn test_view_name_from_path_keeps_inner_dots() {
    let name = ViewName::from_path(Path::new("daily.backup.sql")).unwrap();
    assert_eq!(name, "daily.backup");
}

#[test]
fn test_view_name_deserialize_rejects_empty() {
    let result: Result<ViewName, _> = serde_yaml::from_str("''");
    assert!(result.is_err());

    let ok: ViewName = serde_yaml::from_str("orders").unwrap();
    assert_eq!(ok, "orders");
}
