use clap::Parser;
use dupescan::cli::Cli;
use dupescan::duplicates::{DuplicateFinder, ScanConfig};
use dupescan::error::{ConfigError, ExitCode};
use dupescan::scanner::{DigestKind, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn write_file(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

#[test]
fn test_finds_duplicates_across_directory_tree() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("nested").join("deeper");
    fs::create_dir_all(&sub).unwrap();

    write_file(dir.path(), "a.txt", b"same content");
    write_file(&sub, "b.txt", b"same content");
    write_file(&sub, "c.txt", b"same content");
    write_file(dir.path(), "other.txt", b"different payload");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].files.len(), 3);
    assert_eq!(summary.files_counted, 4);
    assert_eq!(summary.duplicate_files, 2);
    assert_eq!(summary.duplicate_bytes, 2 * 12);
}

#[test]
fn test_unique_sizes_produce_no_sets_and_no_hashing() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "one.txt", b"a");
    write_file(dir.path(), "two.txt", b"ab");
    write_file(dir.path(), "three.txt", b"abc");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert!(sets.is_empty());
    assert_eq!(summary.files_counted, 3);
    assert_eq!(summary.eliminated_by_size, 3);
    assert_eq!(summary.files_hashed, 0);
    assert_eq!(finder.hasher().invocations(), 0);
}

#[test]
fn test_same_size_different_content_not_duplicates() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"0123456789");
    write_file(dir.path(), "b.bin", b"9876543210");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    // Size collision forces hashing, content tells them apart
    assert!(sets.is_empty());
    assert_eq!(summary.files_hashed, 2);
    assert_eq!(summary.duplicate_files, 0);
}

#[test]
fn test_empty_files_form_duplicate_set() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1.txt")).unwrap();
    File::create(dir.path().join("empty2.txt")).unwrap();
    File::create(dir.path().join("empty3.txt")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    // Size 0 is an ordinary size: identical empty files are duplicates,
    // they just reclaim nothing
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].size, 0);
    assert_eq!(sets[0].files.len(), 3);
    assert_eq!(summary.duplicate_files, 2);
    assert_eq!(summary.duplicate_bytes, 0);
}

#[test]
fn test_extension_filter_scenario() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.jpg", b"image bytes");
    write_file(dir.path(), "b.jpg", b"image bytes");
    write_file(dir.path(), "a.png", b"image bytes");
    write_file(dir.path(), "b.png", b"image bytes");

    let config = ScanConfig::default()
        .with_walker(WalkerConfig::new(vec!["jpg".to_string()], false));
    let finder = DuplicateFinder::new(config);
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    // Only the jpg pair is even enumerated
    assert_eq!(summary.files_counted, 2);
    assert_eq!(sets.len(), 1);
    assert!(sets[0]
        .files
        .iter()
        .all(|f| f.path.to_string_lossy().ends_with(".jpg")));
}

#[test]
fn test_invalid_root_skipped_with_warning() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"payload");
    write_file(dir.path(), "b.txt", b"payload");
    let missing = dir.path().join("does_not_exist");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[missing, dir.path().to_path_buf()]);

    assert_eq!(sets.len(), 1);
    assert!(!summary.interrupted);
    assert!(summary.warnings.iter().any(|w| w.contains("does_not_exist")));
}

#[test]
fn test_file_as_root_skipped_with_warning() {
    let dir = tempdir().unwrap();
    let file_root = write_file(dir.path(), "not_a_dir.txt", b"x");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[file_root]);

    assert!(sets.is_empty());
    assert_eq!(summary.files_counted, 0);
    assert_eq!(summary.warnings.len(), 1);
    assert!(summary.warnings[0].contains("not_a_dir.txt"));
}

#[test]
fn test_nested_roots_enumerate_each_file_once() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(&sub, "only_copy.txt", b"solitary content");
    write_file(dir.path(), "twin_a.txt", b"real duplicate pair");
    write_file(&sub, "twin_b.txt", b"real duplicate pair");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf(), sub]);

    // The sub root repeats the parent's files: only_copy.txt must not
    // become a duplicate of itself, and the real pair reports once
    assert_eq!(summary.files_counted, 3);
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].files.len(), 2);
    assert_eq!(summary.duplicate_files, 1);
    assert!(sets[0]
        .files
        .iter()
        .all(|f| !f.path.ends_with("only_copy.txt")));
}

#[test]
fn test_duplicates_found_across_multiple_roots() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    write_file(dir_a.path(), "original.dat", b"cross-root payload");
    write_file(dir_b.path(), "copy.dat", b"cross-root payload");
    write_file(dir_b.path(), "unrelated.dat", b"something else entirely");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[
        dir_a.path().to_path_buf(),
        dir_b.path().to_path_buf(),
    ]);

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].files.len(), 2);
    assert_eq!(summary.files_counted, 3);
}

#[test]
fn test_kept_representative_is_lexicographically_first() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "zz_last.txt", b"identical");
    write_file(dir.path(), "mm_middle.txt", b"identical");
    write_file(dir.path(), "aa_first.txt", b"identical");

    let finder = DuplicateFinder::with_defaults();
    let (sets, _) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(sets.len(), 1);
    let kept = sets[0].kept().unwrap();
    assert!(kept.path.ends_with("aa_first.txt"));
    let redundant: Vec<_> = sets[0]
        .redundant()
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(redundant, vec!["mm_middle.txt", "zz_last.txt"]);
}

#[test]
fn test_rescan_of_unchanged_tree_is_identical() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "big_a.bin", &[b'x'; 300]);
    write_file(dir.path(), "big_b.bin", &[b'x'; 300]);
    write_file(dir.path(), "pair1_a.bin", &[b'p'; 40]);
    write_file(dir.path(), "pair1_b.bin", &[b'p'; 40]);
    write_file(dir.path(), "pair2_a.bin", &[b'q'; 40]);
    write_file(dir.path(), "pair2_b.bin", &[b'q'; 40]);
    write_file(dir.path(), "unique.bin", &[b'u'; 7]);

    let scan = || {
        let finder = DuplicateFinder::with_defaults();
        let (sets, _) = finder.find_duplicates(&[dir.path().to_path_buf()]);
        sets.iter()
            .map(|s| {
                (
                    s.size,
                    s.digest.to_hex(),
                    s.files.iter().map(|f| f.path.clone()).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>()
    };

    let first = scan();
    let second = scan();

    assert_eq!(first, second);
    // Largest sets come first, digest breaks the size tie
    assert_eq!(first[0].0, 300);
    assert_eq!(first[1].0, 40);
    assert_eq!(first[2].0, 40);
    assert!(first[1].1 < first[2].1);
}

#[test]
fn test_special_characters_in_filenames() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "file with spaces.txt", b"content");
    write_file(dir.path(), "duplicate1.txt", b"content");

    write_file(dir.path(), "café_🦀.txt", b"unicode content");
    write_file(dir.path(), "duplicate2.txt", b"unicode content");

    write_file(dir.path(), "special_!@#$%^&()_+.txt", b"special content");
    write_file(dir.path(), "duplicate3.txt", b"special content");

    let finder = DuplicateFinder::with_defaults();
    let (sets, _) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(sets.len(), 3);
}

#[test]
fn test_deeply_nested_paths() {
    let dir = tempdir().unwrap();
    let mut current_path = dir.path().to_path_buf();

    for i in 0..15 {
        current_path = current_path.join(format!("level_{i}"));
        fs::create_dir(&current_path).unwrap();
    }

    write_file(&current_path, "deep.txt", b"deep content");
    write_file(dir.path(), "shallow.txt", b"deep content");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(sets.len(), 1);
    assert_eq!(summary.files_counted, 2);
}

#[test]
fn test_hidden_files_are_scanned() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), ".hidden_copy", b"dotfile payload");
    write_file(dir.path(), "visible.txt", b"dotfile payload");

    let finder = DuplicateFinder::with_defaults();
    let (sets, _) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].files.len(), 2);
}

#[test]
fn test_digest_algorithm_is_configurable() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.dat", b"digested twice");
    write_file(dir.path(), "b.dat", b"digested twice");

    for kind in [DigestKind::Sha256, DigestKind::Blake3, DigestKind::Md5] {
        let finder = DuplicateFinder::new(ScanConfig::default().with_digest(kind));
        let (sets, _) = finder.find_duplicates(&[dir.path().to_path_buf()]);

        assert_eq!(sets.len(), 1, "one set expected for {kind:?}");
        assert_eq!(sets[0].digest.as_bytes().len(), kind.output_len());
    }
}

#[test]
fn test_preset_shutdown_flag_interrupts_scan() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"pair");
    write_file(dir.path(), "b.txt", b"pair");

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(ScanConfig::default().with_shutdown_flag(flag));
    let (sets, summary) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert!(sets.is_empty());
    assert!(summary.interrupted);
}

#[test]
fn test_run_app_succeeds_with_duplicates() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"pair");
    write_file(dir.path(), "b.txt", b"pair");

    let cli = Cli::try_parse_from([
        "dupescan",
        dir.path().to_str().unwrap(),
        "-q",
        "-o",
        "json",
    ])
    .unwrap();

    let code = dupescan::run_app(cli).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_run_app_succeeds_with_no_duplicates() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "alone.txt", b"nothing matches this");

    let cli = Cli::try_parse_from(["dupescan", dir.path().to_str().unwrap(), "-q"]).unwrap();

    // Zero duplicates is still a successful scan
    let code = dupescan::run_app(cli).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_run_app_rejects_missing_export_dir() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"pair");
    write_file(dir.path(), "b.txt", b"pair");
    let missing = dir.path().join("no_such_export_dir");

    let cli = Cli::try_parse_from([
        "dupescan",
        dir.path().to_str().unwrap(),
        "-q",
        "--export-dir",
        missing.to_str().unwrap(),
    ])
    .unwrap();

    let err = dupescan::run_app(cli).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ExportDirMissing(_))
    ));
}
