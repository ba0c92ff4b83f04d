use super::*;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "scenewright_config_{name}_{}_{nanos}.json",
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_are_valid() {
    let cfg = EngineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.scene_path, PathBuf::from("revideo/scene.tsx"));
    assert_eq!(cfg.backup_suffix, ".backup");
    assert_eq!(cfg.io_timeout(), Duration::from_secs(5));
    assert!(cfg.history_path.is_none());
}

#[test]
fn partial_file_keeps_defaults() {
    let path = temp_file(
        "partial",
        r#"{ "scene_path": "out/scene.tsx", "history_path": "out/history.json",
             "boilerplate": { "scene_name": "intro" } }"#,
    );
    let cfg = EngineConfig::from_path(&path).unwrap();
    assert_eq!(cfg.scene_path, PathBuf::from("out/scene.tsx"));
    assert_eq!(cfg.history_path, Some(PathBuf::from("out/history.json")));
    assert_eq!(cfg.io_timeout_ms, 5000);
    assert_eq!(cfg.boilerplate.scene_name, "intro");
    assert_eq!(cfg.boilerplate.view_param, "view: View2D");
    let _ = std::fs::remove_file(path);
}

#[test]
fn unknown_fields_and_bad_values_are_rejected() {
    let typo = temp_file("typo", r#"{ "scene_pth": "x.tsx" }"#);
    assert!(EngineConfig::from_path(&typo).is_err());
    let _ = std::fs::remove_file(typo);

    let zero = temp_file("zero", r#"{ "io_timeout_ms": 0 }"#);
    let err = EngineConfig::from_path(&zero).unwrap_err();
    assert!(err.to_string().contains("io_timeout_ms"));
    let _ = std::fs::remove_file(zero);
}

#[test]
fn validate_checks_each_field() {
    let bad = [
        EngineConfig {
            backup_suffix: String::new(),
            ..EngineConfig::default()
        },
        EngineConfig {
            backup_suffix: "/tmp/x".to_string(),
            ..EngineConfig::default()
        },
        EngineConfig {
            scene_path: PathBuf::new(),
            ..EngineConfig::default()
        },
        EngineConfig {
            history_path: Some(PathBuf::from("revideo/scene.tsx")),
            ..EngineConfig::default()
        },
        EngineConfig {
            boilerplate: SceneBoilerplate {
                view_param: "view) { (".to_string(),
                ..SceneBoilerplate::default()
            },
            ..EngineConfig::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "{cfg:?}");
    }
}

#[test]
fn missing_file_is_an_error() {
    let missing = std::env::temp_dir().join("scenewright_config_definitely_missing.json");
    let err = EngineConfig::from_path(&missing).unwrap_err();
    assert!(err.to_string().contains("read config"));
}
