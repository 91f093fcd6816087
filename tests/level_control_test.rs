use std::fs;

use logtune::{add_file_handler, log_level, scoped_log_level, set_log_level, Verbosity};
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

#[test]
fn set_log_level_controls_what_is_emitted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("levels.log");

    set_log_level(Verbosity::Warning).unwrap();
    assert_eq!(log_level().unwrap(), Verbosity::Warning);

    let guard = add_file_handler(&path).unwrap();

    debug!("hidden debug");
    info!("hidden info");
    warn!("visible warn");
    error!("visible error");

    // Absent value leaves the level unchanged.
    set_log_level(None::<Verbosity>).unwrap();
    assert_eq!(log_level().unwrap(), Verbosity::Warning);
    info!("still hidden info");

    // Boolean shorthand: true means info.
    set_log_level(true).unwrap();
    assert_eq!(log_level().unwrap(), Verbosity::Info);
    info!("info after true");
    debug!("still hidden debug");

    // Numeric scale: 10 is the top of the debug decade.
    set_log_level(10).unwrap();
    assert_eq!(log_level().unwrap(), Verbosity::Debug);
    debug!("debug after ten");

    // Boolean shorthand: false means warning.
    set_log_level(false).unwrap();
    info!("hidden after false");

    // A scoped override restores the previous level on drop.
    {
        let _scope = scoped_log_level("debug").unwrap();
        assert_eq!(log_level().unwrap(), Verbosity::Debug);
        debug!("debug inside scope");
    }
    assert_eq!(log_level().unwrap(), Verbosity::Warning);
    debug!("hidden outside scope");

    guard.close().unwrap();
    let content = fs::read_to_string(&path).unwrap();

    assert!(!content.contains("hidden debug"));
    assert!(!content.contains("hidden info"));
    assert!(content.contains("visible warn"));
    assert!(content.contains("visible error"));
    assert!(!content.contains("still hidden info"));
    assert!(content.contains("info after true"));
    assert!(!content.contains("still hidden debug"));
    assert!(content.contains("debug after ten"));
    assert!(!content.contains("hidden after false"));
    assert!(content.contains("debug inside scope"));
    assert!(!content.contains("hidden outside scope"));

    // Invalid tokens are rejected without touching the current level.
    assert!(set_log_level("verbose-ish").is_err());
    assert!(set_log_level(0).is_err());
    assert!(set_log_level(51).is_err());
    assert_eq!(log_level().unwrap(), Verbosity::Warning);
}
