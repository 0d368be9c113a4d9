//! Scan, resolve and transfer a small library on a temporary directory.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::tempdir;

use media_shelf::record::TransferStatus;
use media_shelf::resolve::{Resolver, TagDictionary};
use media_shelf::scan::{ScanOptions, find_collisions, resolve_all, scan_directory};
use media_shelf::transfer::{NoProgress, TransferEngine, TransferOptions};

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    fs::write(path, content).expect("write file");
}

fn options() -> TransferOptions {
    TransferOptions {
        chunk_size: 1024,
        initial_backoff: Duration::from_millis(1),
        ..TransferOptions::default()
    }
}

#[test]
fn full_round_trip() {
    let dir = tempdir().expect("tempdir");
    let downloads = dir.path().join("downloads");
    let library = dir.path().join("library");

    let matrix: Vec<u8> = (0..100_000_u32).map(|i| (i % 251) as u8).collect();
    write(&downloads.join("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv"), &matrix);
    write(&downloads.join("season/Breaking.Bad.S01E02.720p.mkv"), b"episode");
    write(&downloads.join("1080p.x264.mkv"), b"unparsed");
    write(&downloads.join("notes.txt"), b"ignored");

    let paths = scan_directory(&downloads, &ScanOptions::new(&[], true)).expect("scan");
    assert_eq!(paths.len(), 3);

    let resolver = Resolver::new(library.clone(), TagDictionary::default());
    let records = resolve_all(paths, &resolver);
    assert!(find_collisions(&records).is_empty());

    let summary = TransferEngine::new(options()).transfer_all(records, &NoProgress);

    assert_eq!(summary.succeeded, 2);
    assert!(!summary.cancelled);
    assert_eq!(summary.count(TransferStatus::Unparsed), 1);

    let matrix_destination = library.join("M/The Matrix (1999)/The Matrix (1999).mkv");
    assert_eq!(fs::read(&matrix_destination).expect("read movie"), matrix);
    let episode_destination = library.join("B/Breaking Bad/Season 01/Breaking Bad - S01E02.mkv");
    assert_eq!(fs::read(&episode_destination).expect("read episode"), b"episode");
    assert!(!library.join("Unknown").exists());

    // Sources are copied, not moved
    assert!(downloads.join("1080p.x264.mkv").exists());
    assert!(downloads.join("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv").exists());
}

#[test]
fn failed_record_does_not_stop_batch() {
    let dir = tempdir().expect("tempdir");
    let downloads = dir.path().join("downloads");
    let library = dir.path().join("library");
    write(&downloads.join("Alien.1979.mkv"), b"alien");
    write(&downloads.join("Heat.1995.mkv"), b"heat");

    // Existing destination for the first record
    write(&library.join("A/Alien (1979)/Alien (1979).mkv"), b"old");

    let paths = scan_directory(&downloads, &ScanOptions::default()).expect("scan");
    let records = resolve_all(paths, &Resolver::new(library.clone(), TagDictionary::default()));
    let engine = TransferEngine::new(TransferOptions {
        overwrite: false,
        ..options()
    });

    let summary = engine.transfer_all(records, &NoProgress);

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.records[0].status(), TransferStatus::Failed);
    assert_eq!(
        summary.records[0].error_message(),
        Some("Destination file already exists")
    );
    assert_eq!(summary.records[1].status(), TransferStatus::Completed);
    assert_eq!(fs::read(library.join("A/Alien (1979)/Alien (1979).mkv")).expect("read"), b"old");
}
