//! Config file loading.

use certdesigner::config::DesignerConfig;
use certdesigner::error::ConfigError;
use certdesigner::export::ExportOptions;
use std::path::PathBuf;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "rasterScale": 4,
            "searchableText": false,
            "grid": { "enabled": false },
            "fontDir": "/usr/share/fonts/truetype",
            "logFilter": "certdesigner=debug"
        }"#,
    )
    .unwrap();

    let config = DesignerConfig::load_from(&path).unwrap();
    assert_eq!(config.raster_scale, 4);
    assert!(!config.searchable_text);
    assert!(!config.grid.enabled);
    assert_eq!(config.grid.spacing, 20.0);
    assert_eq!(config.font_dir, Some(PathBuf::from("/usr/share/fonts/truetype")));
    assert_eq!(config.log_filter.as_deref(), Some("certdesigner=debug"));
    assert!(config.image_root.is_none());

    let options = ExportOptions::from_config(&config);
    assert_eq!(options.raster_scale, 4);
    assert!(!options.searchable_text);
    assert_eq!(options.overlay_padding, 4.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DesignerConfig::load_from(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_serialized_defaults_omit_unset_paths() {
    let json = serde_json::to_value(DesignerConfig::default()).unwrap();
    assert_eq!(json["rasterScale"], 3);
    assert_eq!(json["searchableText"], true);
    assert!(json.get("fontDir").is_none());
    assert!(json.get("imageRoot").is_none());
}
