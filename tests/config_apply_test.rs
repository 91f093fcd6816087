use std::fs;
use std::io::Write;

use logtune::{log_level, LoggingConfig, Verbosity};
use tempfile::TempDir;
use tracing::{info, warn};

#[test]
fn apply_wires_level_and_file_handler() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("configured.log");

    let toml_content = format!(
        r#"
level = "debug"

[file]
path = "{}"
verbose = "warning"
"#,
        log_path.display()
    );

    let config_path = dir.path().join("logging.toml");
    let mut config_file = fs::File::create(&config_path).unwrap();
    config_file.write_all(toml_content.as_bytes()).unwrap();
    drop(config_file);

    let config = LoggingConfig::from_file(&config_path).unwrap();
    let guard = config.apply().unwrap().expect("file handler configured");

    assert_eq!(log_level().unwrap(), Verbosity::Debug);

    // The handler's own threshold keeps info out of the file even
    // though the global level admits it.
    info!("info passes the global gate only");
    warn!("warning reaches the file");

    guard.close().unwrap();
    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("warning reaches the file"));
    assert!(!content.contains("info passes the global gate only"));

    // Re-applying with the same format is fine; a different console
    // format is a conflict.
    let same = LoggingConfig::from_toml_str("level = \"info\"").unwrap();
    assert!(same.apply().unwrap().is_none());
    assert_eq!(log_level().unwrap(), Verbosity::Info);

    let conflicting = LoggingConfig::from_toml_str("format = \"json\"").unwrap();
    assert!(conflicting.apply().is_err());
}
