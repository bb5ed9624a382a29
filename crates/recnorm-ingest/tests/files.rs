use std::fs;

use recnorm_ingest::{IngestError, load_config, load_records, write_records};
use serde_json::json;

#[test]
fn loads_records_and_config_from_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("records.json");
    let config = dir.path().join("config.json");
    fs::write(&input, r#"[{"id": 1, "value": 3}, {"id": 1, "value": 4}]"#).expect("write input");
    fs::write(
        &config,
        r#"{"primaryKey": "id", "primarySources": ["id"], "fieldRules": {"value": {"reducer": "unique"}}}"#,
    )
    .expect("write config");

    let records = load_records(&input).expect("load records");
    let config = load_config(&config).expect("load config");

    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["value"], json!(4));
    assert_eq!(config.primary_key, "id");
    assert!(config.field_rules.get("value").is_some());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("missing.json");

    let err = load_records(&path).unwrap_err();

    assert!(matches!(err, IngestError::Read { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn malformed_config_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"primaryKey": "id"}"#).expect("write config");

    let err = load_config(&path).unwrap_err();

    assert!(matches!(err, IngestError::Json { .. }));
}

#[test]
fn writes_records_as_json_array() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("out.json");
    let records = vec![
        json!({"id": 1, "value": [3, 4]})
            .as_object()
            .cloned()
            .expect("object"),
    ];

    write_records(&path, &records, false).expect("write output");

    let written = fs::read_to_string(&path).expect("read output");
    assert_eq!(written, r#"[{"id":1,"value":[3,4]}]"#);
}
