//! Environment layer. Kept in its own test binary (and a single test) so
//! the variables cannot leak into other tests.

use dupewalk::config::Config;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_env_overrides_file_and_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dupewalk.toml");
    fs::write(&path, "size = \"5MB\"\npattern = \"*.iso\"\n").unwrap();

    std::env::set_var("DUPEWALK_SIZE", "10KB");
    std::env::set_var("DUPEWALK_FOLLOW_SYMLINKS", "true");

    let loaded = Config::load(Some(&path));

    std::env::remove_var("DUPEWALK_SIZE");
    std::env::remove_var("DUPEWALK_FOLLOW_SYMLINKS");

    let (config, _) = loaded.unwrap();
    assert_eq!(config.min_size().unwrap(), 10 * 1024);
    assert!(config.follow_symlinks);
    // Keys without an env override still come from the file
    assert_eq!(config.pattern, "*.iso");
}
