//! File logging through the global subscriber.
//!
//! Lives in its own test binary because the subscriber can be installed once
//! per process.

use elevate::config::LoggingSettings;
use elevate::logging::{init_logging, LogFormat};

#[test]
fn test_json_records_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("elevate.log");

    let settings = LoggingSettings {
        level: "info".to_string(),
        format: LogFormat::Json,
        file: Some(path.clone()),
    };
    let guard = init_logging(&settings).unwrap();

    tracing::info!(lookups = 3, "batch resolved");
    tracing::debug!("filtered out");
    drop(guard);

    let contents = std::fs::read_to_string(&path).unwrap();
    let line = contents.lines().next().unwrap();
    let record: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["fields"]["message"], "batch resolved");
    assert_eq!(record["fields"]["lookups"], 3);
    assert!(!contents.contains("filtered out"));

    assert!(init_logging(&settings).is_err());
}
