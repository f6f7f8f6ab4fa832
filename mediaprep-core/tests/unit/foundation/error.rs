use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MediaprepError::invalid_argument("x")
            .to_string()
            .contains("invalid argument:")
    );
    assert!(
        MediaprepError::process("x")
            .to_string()
            .contains("process error:")
    );
    assert!(
        MediaprepError::manifest("x")
            .to_string()
            .contains("manifest error:")
    );
    assert_eq!(
        MediaprepError::not_found("foto/a.png").to_string(),
        "file not found: foto/a.png"
    );
}

#[test]
fn not_found_is_detectable() {
    assert!(MediaprepError::not_found("x").is_not_found());
    assert!(!MediaprepError::process("x").is_not_found());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MediaprepError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
