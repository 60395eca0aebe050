use dupewalk::duplicates::{DuplicateFinder, DuplicateRole, FinderConfig};
use dupewalk::actions::ActionHandler;
use dupewalk::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) {
    File::create(dir.join(name))
        .unwrap()
        .write_all(content)
        .unwrap();
}

fn finder(min_size: u64, pattern: Option<&str>) -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_walker_config(WalkerConfig::new(
        false,
        min_size,
        pattern.map(str::to_string),
    )))
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (results, summary) = finder(0, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(summary.files_examined, 0);
    assert_eq!(summary.duplicate_pairs, 0);
}

#[test]
fn test_scan_unique_sizes_never_hashed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"1");
    write(dir.path(), "b.txt", b"22");
    write(dir.path(), "c.txt", b"333");

    let (results, summary) = finder(0, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(summary.files_examined, 3);
    assert_eq!(summary.checksums_computed, 0);
}

#[test]
fn test_scan_a_b_c() {
    // a and c are identical; b has the same length but different bytes
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"same-bytes");
    write(dir.path(), "b", b"diff-bytes");
    write(dir.path(), "c", b"same-bytes");

    let (results, summary) = finder(0, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(summary.duplicate_pairs, 1);
    assert_eq!(results.len(), 2);
    assert_eq!(results[&root.join("a")].role, DuplicateRole::Original);
    assert_eq!(results[&root.join("c")].role, DuplicateRole::Duplicate);
    assert!(!results.contains_key(&root.join("b")));
    assert_eq!(results[&root.join("a")].digest, results[&root.join("c")].digest);
    assert_eq!(results[&root.join("c")].sequence, 1);
    // At most one checksum per file of the shared length
    assert_eq!(summary.checksums_computed, 3);
}

#[test]
fn test_scan_three_copies_share_one_original() {
    let dir = tempdir().unwrap();
    write(dir.path(), "1.bin", b"payload");
    write(dir.path(), "2.bin", b"payload");
    write(dir.path(), "3.bin", b"payload");

    let (results, summary) = finder(0, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(summary.duplicate_pairs, 2);
    assert_eq!(summary.wasted_bytes, 14);
    let original = &results[&root.join("1.bin")];
    assert_eq!(original.role, DuplicateRole::Original);
    assert_eq!(original.sequence, 1);
    assert_eq!(results[&root.join("2.bin")].sequence, 1);
    assert_eq!(results[&root.join("3.bin")].sequence, 2);
}

#[test]
fn test_scan_nested_directories_in_name_order() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/deep")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    write(&dir.path().join("b"), "copy", b"nested");
    write(&dir.path().join("a/deep"), "first", b"nested");

    let (results, _) = finder(0, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(
        results[&root.join("a/deep/first")].role,
        DuplicateRole::Original
    );
    assert_eq!(results[&root.join("b/copy")].role, DuplicateRole::Duplicate);
}

#[test]
fn test_scan_size_threshold() {
    let dir = tempdir().unwrap();
    write(dir.path(), "small1", &[1u8; 100]);
    write(dir.path(), "small2", &[1u8; 100]);
    write(dir.path(), "big1", &[2u8; 2048]);
    write(dir.path(), "big2", &[2u8; 2048]);

    let (results, summary) = finder(1024, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    assert_eq!(summary.files_examined, 4);
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.duplicate_pairs, 1);
    assert!(results.keys().all(|p| p.to_string_lossy().contains("big")));
}

#[test]
fn test_scan_pattern_crosses_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("music")).unwrap();
    write(&dir.path().join("music"), "song.mp3", b"tune");
    write(dir.path(), "song.mp3", b"tune");
    write(dir.path(), "song.txt", b"tune");

    let (results, summary) = finder(0, Some("*.mp3"))
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    assert_eq!(summary.duplicate_pairs, 1);
    assert_eq!(results.len(), 2);
    assert!(results
        .keys()
        .all(|p| p.extension().is_some_and(|e| e == "mp3")));
}

#[test]
fn test_scan_empty_files_are_duplicates_at_zero_threshold() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();

    let (_, summary) = finder(0, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    assert_eq!(summary.duplicate_pairs, 1);
    assert_eq!(summary.wasted_bytes, 0);
}

#[cfg(unix)]
#[test]
fn test_scan_unreadable_file_excluded() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"content");
    write(dir.path(), "b", b"content");
    write(dir.path(), "c", b"content");
    let locked = dir.path().join("b");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to check then
    if File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let (results, summary) = finder(0, None)
        .find_duplicates(dir.path(), &mut ActionHandler::NoOp)
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(summary.duplicate_pairs, 1);
    assert_eq!(summary.hash_errors.len(), 1);
    assert!(summary.has_errors());
    assert!(!results.contains_key(&root.join("b")));
    assert_eq!(results[&root.join("c")].role, DuplicateRole::Duplicate);
}
