use std::{fs, thread::sleep, time::Duration};

use tempfile::tempdir;

#[test]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    quick_rewriter::logging::init(true, Some(path.clone()));
    tracing::info!("test");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("test"));
}

#[test]
fn startup_logging_is_info_level() {
    let (info, debug) = quick_rewriter::logging::with_startup_logging(|| {
        (
            tracing::enabled!(tracing::Level::INFO),
            tracing::enabled!(tracing::Level::DEBUG),
        )
    });
    assert!(info);
    assert!(!debug);
}
