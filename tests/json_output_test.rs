use std::fs;

use logtune::{add_file_handler, init_with_format, set_log_level, Format, LogError};
use tempfile::TempDir;
use tracing::info;

#[test]
fn json_console_format_keeps_file_output_plain() {
    init_with_format(Format::Json).unwrap();

    // Same format again is a no-op; a different one is an error.
    init_with_format(Format::Json).unwrap();
    match init_with_format(Format::Compact) {
        Err(LogError::AlreadyInitialized { active }) => assert_eq!(active, Format::Json),
        other => panic!("expected AlreadyInitialized, got {other:?}"),
    }

    set_log_level("info").unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.log");
    let guard = add_file_handler(&path).unwrap();
    info!("file output stays human readable");
    guard.close().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("file output stays human readable"));
    assert!(!content.trim_start().starts_with('{'));
}
