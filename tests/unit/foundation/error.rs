use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReplayError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReplayError::scene("x").to_string().contains("scene error:"));
    assert!(
        ReplayError::schema(4, "missing self")
            .to_string()
            .contains("trace schema error at line 4")
    );
}

#[test]
fn unknown_tree_type_names_the_code() {
    let err = ReplayError::unknown_tree_type("Z");
    assert!(err.to_string().contains("'Z'"));
}

#[test]
fn parse_error_keeps_line_and_source() {
    let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    let err = ReplayError::TraceParse { line: 7, source };
    assert!(err.to_string().contains("line 7"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReplayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
