use dupewalk::actions::ActionHandler;
use dupewalk::duplicates::{DuplicateFinder, DuplicateRole, FinderError};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();

    File::create(dir1.path().join("a.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();
    File::create(dir2.path().join("b.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (results, summary) = finder
        .find_duplicates_in_paths::<File>(
            &[dir1.path().to_path_buf(), dir2.path().to_path_buf()],
            &mut ActionHandler::NoOp,
            None,
        )
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(summary.files_examined, 2);
    assert_eq!(summary.roots.len(), 2);
}

#[test]
fn test_root_order_decides_original() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    fs::write(dir1.path().join("z.txt"), b"same").unwrap();
    fs::write(dir2.path().join("a.txt"), b"same").unwrap();

    let finder = DuplicateFinder::with_defaults();

    // dir2 listed first: its file is the original even though it sorts later
    let (results, _) = finder
        .find_duplicates_in_paths::<File>(
            &[dir2.path().to_path_buf(), dir1.path().to_path_buf()],
            &mut ActionHandler::NoOp,
            None,
        )
        .unwrap();

    let first = dir2.path().canonicalize().unwrap().join("a.txt");
    let second = dir1.path().canonicalize().unwrap().join("z.txt");
    assert_eq!(results[&first].role, DuplicateRole::Original);
    assert_eq!(results[&second].role, DuplicateRole::Duplicate);
}

#[test]
fn test_scan_overlapping_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), b"content").unwrap();
    fs::write(sub.join("b.txt"), b"content").unwrap();

    let finder = DuplicateFinder::with_defaults();
    // Parent and child: the child is not walked twice
    let (results, summary) = finder
        .find_duplicates_in_paths::<File>(
            &[dir.path().to_path_buf(), sub.clone()],
            &mut ActionHandler::NoOp,
            None,
        )
        .unwrap();

    assert_eq!(summary.files_examined, 2);
    assert_eq!(summary.duplicate_pairs, 1);
    assert_eq!(results.len(), 2);
}

#[test]
fn test_same_directory_twice() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only.txt"), b"alone").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (results, summary) = finder
        .find_duplicates_in_paths::<File>(
            &[dir.path().to_path_buf(), dir.path().to_path_buf()],
            &mut ActionHandler::NoOp,
            None,
        )
        .unwrap();

    // A file never duplicates itself
    assert!(results.is_empty());
    assert_eq!(summary.duplicate_pairs, 0);
}

#[test]
fn test_invalid_second_root_fails_before_walk() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"x").unwrap();
    fs::write(dir.path().join("b.txt"), b"x").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let mut action = ActionHandler::NoOp;
    let result = finder.find_duplicates_in_paths::<File>(
        &[dir.path().to_path_buf(), dir.path().join("missing")],
        &mut action,
        None,
    );

    assert!(matches!(result, Err(FinderError::PathNotFound(_))));
}
