//! Tests for `src/logging.rs`.

use telegram_bridge::config::LoggingConfig;
use telegram_bridge::logging::LoggingGuard;

#[test]
fn logging_guard_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LoggingGuard>();
}

#[test]
fn init_production_creates_logs_dir() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let logs_dir = tmp.path().join("logs");
    assert!(!logs_dir.exists());

    // Only one global subscriber per process; a second install errors after
    // the directory has been created.
    let _result = telegram_bridge::logging::init_production(&logs_dir);
    assert!(logs_dir.exists(), "logs directory should be created");
}

#[test]
fn console_only_init_returns_no_guard() {
    let config = LoggingConfig { dir: None };
    let guard = telegram_bridge::logging::init(&config).expect("console init never fails");
    assert!(guard.is_none());
}
