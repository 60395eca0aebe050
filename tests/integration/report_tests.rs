use dupewalk::actions::ActionHandler;
use dupewalk::duplicates::DuplicateFinder;
use dupewalk::output::report::{format_report_date, ReportDelimiter, ReportWriter};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn system_time(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

#[test]
fn test_report_rows_follow_pairs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same-bytes").unwrap();
    fs::write(dir.path().join("b"), b"diff-bytes").unwrap();
    fs::write(dir.path().join("c"), b"same-bytes").unwrap();
    set_file_mtime(dir.path().join("a"), FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
    set_file_mtime(dir.path().join("c"), FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

    let mut report = ReportWriter::from_writer(Vec::new(), ReportDelimiter::Tab).unwrap();
    let finder = DuplicateFinder::with_defaults();
    let (_, summary) = finder
        .find_duplicates_in_paths(
            &[dir.path().to_path_buf()],
            &mut ActionHandler::NoOp,
            Some(&mut report),
        )
        .unwrap();

    assert_eq!(summary.duplicate_pairs, 1);
    assert_eq!(report.pairs_written(), 1);

    let out = String::from_utf8(report.finish().unwrap()).unwrap();
    let root = dir.path().canonicalize().unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Path\tSize\tModDate".to_string(),
            "\t\t".to_string(),
            format!(
                "{}\t0 MB\t{}",
                root.join("a").display(),
                format_report_date(system_time(1_600_000_000))
            ),
            format!(
                "{}\t0 MB\t{}",
                root.join("c").display(),
                format_report_date(system_time(1_700_000_000))
            ),
        ]
    );
}

#[test]
fn test_report_comma_delimited_file() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let report_path = out_dir.path().join("dupes.csv");
    fs::write(dir.path().join("x"), vec![7u8; 3 * 1024 * 1024]).unwrap();
    fs::write(dir.path().join("y"), vec![7u8; 3 * 1024 * 1024]).unwrap();

    let mut report = ReportWriter::create(&report_path, ReportDelimiter::Comma).unwrap();
    DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(
            &[dir.path().to_path_buf()],
            &mut ActionHandler::NoOp,
            Some(&mut report),
        )
        .unwrap();
    report.finish().unwrap();

    let contents = fs::read_to_string(&report_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Path,Size,ModDate");
    assert_eq!(lines[1], ",,");
    assert!(lines[2].contains(",3 MB,"));
    assert!(lines[3].contains(",3 MB,"));
}

#[test]
fn test_report_header_only_without_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("lonely"), b"nobody like me").unwrap();

    let mut report = ReportWriter::from_writer(Vec::new(), ReportDelimiter::Tab).unwrap();
    DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(
            &[dir.path().to_path_buf()],
            &mut ActionHandler::NoOp,
            Some(&mut report),
        )
        .unwrap();

    let out = String::from_utf8(report.finish().unwrap()).unwrap();
    assert_eq!(out.lines().collect::<Vec<_>>(), vec!["Path\tSize\tModDate"]);
}
