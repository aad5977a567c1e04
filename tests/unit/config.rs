use super::*;

#[test]
fn test_default_settings() {
    let settings = EditorSettings::default();
    assert_eq!(settings.initial_mode, Mode::Preview);
    assert_eq!(settings.sides, vec![Side::Left, Side::Right]);
    assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
}

#[test]
fn test_partial_settings_fill_defaults() {
    let settings: EditorSettings = serde_json::from_str(r#"{"initial_mode": "edit"}"#).unwrap();
    assert_eq!(settings.initial_mode, Mode::Edit);
    assert_eq!(settings.sides, Side::default_set());
}

#[test]
fn test_ensure_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    ensure_settings_file(&path).unwrap();
    assert!(path.exists());
    assert_eq!(load_settings(&path), Some(EditorSettings::default()));

    std::fs::write(&path, r#"{"sides": ["left", "right", "top"]}"#).unwrap();
    ensure_settings_file(&path).unwrap();
    let loaded = load_settings(&path).unwrap();
    assert_eq!(loaded.sides, vec![Side::Left, Side::Right, Side::Top]);
}

#[test]
fn test_load_missing_or_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    assert_eq!(load_settings(&path), None);

    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(load_settings(&path), None);

    std::fs::write(&path, r#"{"sides": ["middle"]}"#).unwrap();
    assert_eq!(load_settings(&path), None);
}
