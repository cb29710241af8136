use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NrtError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(NrtError::not_ready("x").to_string().contains("not ready:"));
    assert!(NrtError::runtime("x").to_string().contains("runtime error:"));
    assert!(
        NrtError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn not_ready_is_distinct() {
    assert!(NrtError::not_ready("loading").is_not_ready());
    assert!(!NrtError::validation("bad").is_not_ready());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NrtError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: NrtError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, NrtError::Serde(_)));
}
