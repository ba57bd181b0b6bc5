use serde_json::{json, Value};
use surveyor::path::{self, parse_path, Segment};

#[test]
fn test_set_leaves_root_untouched() {
    let root = json!({"q1": ["0"], "q2": [["a", "b"]]});
    let snapshot = root.clone();

    let updated = path::set(&root, &surveyor::path!["q2", 0, 1], json!("z")).unwrap();

    assert_eq!(root, snapshot);
    assert_eq!(updated["q2"][0][1], json!("z"));
    assert_eq!(updated["q1"], json!(["0"]));
}

#[test]
fn test_get_after_set_returns_value() {
    let root = json!({});
    let cases: Vec<(Vec<Segment>, Value)> = vec![
        (surveyor::path!["title"], json!("Census")),
        (surveyor::path!["q1", "params", 0], json!("Yes")),
        (surveyor::path!["q2", 0, 0], json!("child")),
        (surveyor::path!["deep", "a", "b"], json!({"c": true})),
    ];
    for (p, value) in cases {
        let updated = path::set(&root, &p, value.clone()).unwrap();
        assert_eq!(path::get(&updated, &p), Some(&value), "path {}", path::display(&p));
    }
}

#[test]
fn test_missing_containers_are_created_by_segment_kind() {
    let updated = path::set(&json!({}), &surveyor::path!["g", 0, 0], json!("x")).unwrap();
    assert_eq!(updated, json!({"g": [["x"]]}));
}

#[test]
fn test_index_past_end_is_rejected() {
    let root = json!({"g": []});
    let err = path::set(&root, &surveyor::path!["g", 2], json!("x")).unwrap_err();
    assert!(matches!(err, surveyor::Error::InvalidPath { .. }));
}

#[test]
fn test_index_at_end_appends() {
    let root = json!({"g": ["a"]});
    let updated = path::set(&root, &surveyor::path!["g", 1], json!("b")).unwrap();
    assert_eq!(updated["g"], json!(["a", "b"]));
}

#[test]
fn test_key_into_scalar_is_rejected() {
    let root = json!({"q1": "text"});
    let err = path::set(&root, &parse_path("q1.extra").unwrap(), json!(1)).unwrap_err();
    assert!(err.to_string().contains("q1.extra"));
}
