use partmatch::catalog::{default_catalog, default_competitors, Dataset};
use partmatch::PartMatchError;
use std::fs;
use tempfile::TempDir;

fn write_dataset(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("dataset.json");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_without_path_uses_builtin_data() {
    let dataset = Dataset::load(None).unwrap();

    assert_eq!(dataset.catalog, default_catalog());
    assert_eq!(dataset.competitors, default_competitors());
    assert_eq!(dataset.catalog[0].sku, "Y001");
    assert_eq!(dataset.competitors[0].sku, "C101");
}

#[test]
fn test_builtin_competitors_are_the_six_samples() {
    let skus: Vec<String> = default_competitors().into_iter().map(|c| c.sku).collect();
    assert_eq!(skus, vec!["C101", "C104", "C105", "C106", "C108", "C110"]);
}

#[test]
fn test_load_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        &dir,
        r#"{
            "catalog": [
                {"sku": "P1", "description": "Relay 12V DPDT"},
                {"sku": "P2", "desc": "Fuse 2A slow blow"}
            ],
            "competitors": [
                {"sku": "X1", "description": "12V relay double pole"}
            ]
        }"#,
    );

    let dataset = Dataset::load(Some(path.as_path())).unwrap();

    assert_eq!(dataset.catalog.len(), 2);
    assert_eq!(dataset.catalog[1].description, "Fuse 2A slow blow");
    assert_eq!(dataset.competitors.len(), 1);
    assert_eq!(dataset.competitors[0].sku, "X1");
}

#[test]
fn test_missing_competitors_default_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        &dir,
        r#"{"catalog": [{"sku": "P1", "description": "Relay 12V DPDT"}]}"#,
    );

    let dataset = Dataset::from_path(&path).unwrap();
    assert!(dataset.competitors.is_empty());
}

#[test]
fn test_duplicate_sku_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        &dir,
        r#"{"catalog": [
            {"sku": "P1", "description": "Relay 12V DPDT"},
            {"sku": "P1", "description": "Fuse 2A"}
        ]}"#,
    );

    let err = Dataset::from_path(&path).unwrap_err();
    assert!(matches!(err, PartMatchError::Validation { .. }));
    assert!(err.to_string().contains("P1"));
}

#[test]
fn test_empty_catalog_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, r#"{"catalog": [], "competitors": []}"#);

    let err = Dataset::from_path(&path).unwrap_err();
    assert!(matches!(err, PartMatchError::Validation { .. }));
}

#[test]
fn test_blank_description_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, r#"{"catalog": [{"sku": "P1", "description": "  "}]}"#);

    assert!(matches!(
        Dataset::from_path(&path),
        Err(PartMatchError::Validation { .. })
    ));
}

#[test]
fn test_malformed_json_is_json_error() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, r#"{"catalog": [ {"sku": "P1" "#);

    let err = Dataset::from_path(&path).unwrap_err();
    assert!(matches!(err, PartMatchError::Json(_)));
    assert_eq!(err.category(), "json");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Dataset::from_path(dir.path().join("absent.json")).unwrap_err();

    assert!(matches!(err, PartMatchError::Io(_)));
}

#[test]
fn test_competitor_with_empty_description_is_accepted_at_load() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        &dir,
        r#"{"catalog": [{"sku": "P1", "description": "Relay"}],
            "competitors": [{"sku": "X1", "description": ""}]}"#,
    );

    let dataset = Dataset::from_path(&path).unwrap();
    assert_eq!(dataset.competitors[0].description, "");
}
