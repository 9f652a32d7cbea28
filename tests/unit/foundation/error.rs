use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DistortionError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DistortionError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        DistortionError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        DistortionError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DistortionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
