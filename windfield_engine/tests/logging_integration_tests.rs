//! Integration tests for Engine logging system
//!
//! These tests verify the logging facade and what the engine reports
//! through it during builds and culling.
//!
//! Run with: cargo test --test logging_integration_tests

use windfield_engine::glam::Vec3;
use windfield_engine::windfield::Engine;
use windfield_engine::windfield::log::{Logger, LogEntry, LogSeverity};
use windfield_engine::windfield::spatial::{SpatialIndex, SpatialObject};
use windfield_engine::windfield::CullingConfig;
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn from_source(entries: &[LogEntry], source: &str) -> Vec<LogEntry> {
    entries.iter().filter(|e| e.source == source).cloned().collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert_eq!(captured[2].severity, LogSeverity::Error);
    assert_eq!(captured[2].message, "Test error message");
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_build_summary_is_logged() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let objects: Vec<SpatialObject> = (0..100u64)
        .map(|i| SpatialObject::on_ground(i, (i % 10) as f32, (i / 10) as f32, 0.1, ()))
        .collect();
    SpatialIndex::build(&objects, None, &CullingConfig::default()).unwrap();

    let captured = from_source(&entries.lock().unwrap(), "windfield::SpatialIndex");
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Info && e.message.contains("100 objects")));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_empty_build_warns() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let objects: Vec<SpatialObject> = Vec::new();
    let index = SpatialIndex::build(&objects, None, &CullingConfig::default()).unwrap();
    assert!(!index.warnings().is_empty());

    let captured = from_source(&entries.lock().unwrap(), "windfield::SpatialIndex");
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Warn));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_build_error_logged_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let objects = vec![
        SpatialObject::new(7u64, Vec3::ZERO, 1.0, ()),
        SpatialObject::new(7u64, Vec3::ONE, 1.0, ()),
    ];
    assert!(SpatialIndex::build(&objects, None, &CullingConfig::default()).is_err());

    let captured = from_source(&entries.lock().unwrap(), "windfield::SpatialIndex");
    let error = captured
        .iter()
        .find(|e| e.severity == LogSeverity::Error)
        .expect("build error should be logged");
    assert!(error.message.contains("duplicate"));
    assert!(error.file.is_some());
    assert!(error.line.is_some());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_min_severity_filters_entries() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);
    Engine::set_min_severity(LogSeverity::Warn);

    Engine::log(LogSeverity::Info, "test::module", "dropped".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "kept".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].message, "kept");
    drop(captured);

    Engine::set_min_severity(LogSeverity::Info);
    Engine::reset_logger();
}
