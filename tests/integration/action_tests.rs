use dupewalk::actions::{delete_file, ActionHandler, DeleteConfig, DeleteError, Prompter};
use dupewalk::duplicates::{DuplicateFinder, DuplicateRole, FinderConfig};
use dupewalk::scanner::WalkerConfig;
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;
use tempfile::tempdir;

fn three_copies(dir: &Path) {
    fs::write(dir.join("1.dat"), b"copy").unwrap();
    fs::write(dir.join("2.dat"), b"copy").unwrap();
    fs::write(dir.join("3.dat"), b"copy").unwrap();
}

#[test]
fn test_automatic_delete_keeps_originals() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());

    let mut action = ActionHandler::Automatic(DeleteConfig::permanent());
    let (results, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), &mut action)
        .unwrap();

    assert!(dir.path().join("1.dat").exists());
    assert!(!dir.path().join("2.dat").exists());
    assert!(!dir.path().join("3.dat").exists());
    assert_eq!(summary.files_removed, 2);
    assert_eq!(summary.bytes_freed, 8);
    // Removed files still appear in the results
    assert_eq!(results.len(), 3);
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());

    let mut action = ActionHandler::Automatic(DeleteConfig::permanent().with_dry_run(true));
    let (_, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), &mut action)
        .unwrap();

    assert_eq!(summary.duplicate_pairs, 2);
    assert_eq!(summary.files_removed, 0);
    for name in ["1.dat", "2.dat", "3.dat"] {
        assert!(dir.path().join(name).exists());
    }
}

#[test]
fn test_interactive_answers_apply_per_file() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());

    let prompter = Prompter::new(Box::new(Cursor::new("n\nYES\n")), Box::new(io::sink()));
    let mut action = ActionHandler::Interactive(prompter, DeleteConfig::permanent());
    let (results, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), &mut action)
        .unwrap();

    assert!(dir.path().join("1.dat").exists());
    assert!(dir.path().join("2.dat").exists());
    assert!(!dir.path().join("3.dat").exists());
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.files_removed, 1);

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(results[&root.join("1.dat")].role, DuplicateRole::Original);
}

#[test]
fn test_interactive_eof_declines_everything() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());

    let prompter = Prompter::new(Box::new(Cursor::new("")), Box::new(io::sink()));
    let mut action = ActionHandler::Interactive(prompter, DeleteConfig::permanent());
    let (_, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), &mut action)
        .unwrap();

    assert_eq!(summary.files_skipped, 2);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_delete_refuses_file_touched_after_scan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dupe.bin");
    fs::write(&path, b"payload").unwrap();
    let scanned = fs::metadata(&path).unwrap().modified().unwrap();

    set_file_mtime(&path, FileTime::from_unix_time(1_000_000_000, 0)).unwrap();

    let result = delete_file(&path, Some(scanned), &DeleteConfig::permanent());
    assert!(matches!(result, Err(DeleteError::Modified(_))));
    assert!(path.exists());
}

#[cfg(unix)]
#[test]
fn test_following_links_never_deletes_the_target() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("z_real.bin");
    fs::write(&real, b"only copy").unwrap();
    std::os::unix::fs::symlink(&real, dir.path().join("a_link.bin")).unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("data.bin"), b"other data").unwrap();
    std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("alias")).unwrap();

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, 0, None));
    let mut action = ActionHandler::Automatic(DeleteConfig::permanent());
    let (results, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path(), &mut action)
        .unwrap();

    assert!(real.exists());
    assert!(dir.path().join("sub").join("data.bin").exists());
    assert_eq!(summary.duplicate_pairs, 0);
    assert_eq!(summary.files_removed, 0);
    assert!(results.is_empty());
}
