use bookly_backend::bootstrap;
use bookly_backend::config::{BooklyConfig, BooklyPaths};
use tempfile::tempdir;

#[test]
fn bootstrap_creates_layout_once() {
    let temp = tempdir().expect("tempdir");
    let config = BooklyConfig::new(0, BooklyPaths::from_base_dir(temp.path()).expect("paths"));

    let first = bootstrap::initialize(&config).expect("first bootstrap");
    assert!(first.database_initialized);
    assert_eq!(first.directories_created.len(), 2);
    assert!(config.paths.db_path.exists());
    drop(first);

    let second = bootstrap::initialize(&config).expect("second bootstrap");
    assert!(!second.database_initialized);
    assert!(second.directories_created.is_empty());
}
