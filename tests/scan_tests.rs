//! End-to-end scans over real temporary directories.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use syncscan::engine::blocks;
use syncscan::{
    Collaborators, EntryKind, FileInfo, IgnoreFile, LamportClock, MemoryIndex, PrefixTempNamer,
    ScanOpts, scan,
};

fn scan_all(root: &Path, opts: &ScanOpts, collab: Collaborators) -> Vec<FileInfo> {
    let mut records = scan(root, opts, collab).unwrap().collect_records().unwrap();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

fn names(records: &[FileInfo]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

fn fixture_a() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"0123456789").unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    dir
}

#[test]
fn test_first_scan_emits_file_and_dir() {
    let dir = fixture_a();
    let clock = Arc::new(LamportClock::default());
    let records = scan_all(dir.path(), &ScanOpts::default(), Collaborators::new(clock));

    assert_eq!(names(&records), vec!["a.txt", "b"]);

    let a = &records[0];
    assert_eq!(a.kind, EntryKind::File);
    assert_eq!(a.blocks.len(), 1);
    assert_eq!((a.blocks[0].offset, a.blocks[0].size), (0, 10));
    assert_eq!(a.blocks[0].hash, *blake3::hash(b"0123456789").as_bytes());
    assert!(a.modified > 0);

    let b = &records[1];
    assert_eq!(b.kind, EntryKind::Directory);
    assert!(b.blocks.is_empty());
    assert_ne!(a.version, b.version);
}

#[test]
fn test_rescan_unchanged_emits_nothing() {
    let dir = fixture_a();
    let clock = Arc::new(LamportClock::default());
    let first = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock.clone()),
    );
    let index = MemoryIndex::from_records(first);

    let second = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock).with_previous(Arc::new(index)),
    );
    assert!(second.is_empty(), "unexpected records: {:?}", names(&second));
}

#[test]
fn test_rescan_after_mtime_change() {
    let dir = fixture_a();
    let clock = Arc::new(LamportClock::default());
    let first = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock.clone()),
    );
    let old_a = first.iter().find(|r| r.name == "a.txt").unwrap().clone();

    // Index says T, disk now says T+1.
    let mut index = MemoryIndex::from_records(first);
    let mut stale = old_a.clone();
    stale.modified -= 1;
    stale.blocks.clear();
    index.insert(stale);

    let second = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock).with_previous(Arc::new(index)),
    );
    assert_eq!(names(&second), vec!["a.txt"]);
    assert!(second[0].version > old_a.version);
    assert_eq!(second[0].blocks, old_a.blocks);
}

#[test]
fn test_rescan_version_exceeds_previous_with_fresh_clock() {
    let dir = fixture_a();
    let prev = FileInfo {
        name: "a.txt".to_string(),
        kind: EntryKind::File,
        version: 1000,
        permissions: None,
        modified: -5,
        deleted: false,
        blocks: Vec::new(),
    };
    let index = MemoryIndex::from_records([prev]);

    let clock = Arc::new(LamportClock::default());
    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock).with_previous(Arc::new(index)),
    );
    let a = records.iter().find(|r| r.name == "a.txt").unwrap();
    assert!(a.version > 1000);
}

#[cfg(unix)]
#[test]
fn test_permission_change_detected_unless_ignored() {
    use std::os::unix::fs::PermissionsExt;

    let dir = fixture_a();
    let file = dir.path().join("a.txt");
    fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
    let clock = Arc::new(LamportClock::default());

    let tracked = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock.clone()),
    );
    assert_eq!(
        tracked.iter().find(|r| r.name == "a.txt").unwrap().permissions,
        Some(0o644)
    );
    let ignored_opts = ScanOpts {
        ignore_perms: true,
        ..ScanOpts::default()
    };
    let untracked = scan_all(dir.path(), &ignored_opts, Collaborators::new(clock.clone()));
    assert!(untracked.iter().all(|r| r.permissions.is_none()));

    fs::set_permissions(&file, fs::Permissions::from_mode(0o600)).unwrap();

    let again = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock.clone()).with_previous(Arc::new(MemoryIndex::from_records(tracked))),
    );
    assert_eq!(names(&again), vec!["a.txt"]);
    assert_eq!(again[0].permissions, Some(0o600));

    let again = scan_all(
        dir.path(),
        &ignored_opts,
        Collaborators::new(clock).with_previous(Arc::new(MemoryIndex::from_records(untracked))),
    );
    assert!(again.is_empty());
}

#[test]
fn test_empty_file_has_no_blocks() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty"), b"").unwrap();
    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert_eq!(names(&records), vec!["empty"]);
    assert!(records[0].blocks.is_empty());
}

#[test]
fn test_blocks_cover_content() {
    let dir = tempfile::tempdir().unwrap();
    let data: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 256) as u8).collect();
    fs::write(dir.path().join("big.bin"), &data).unwrap();
    let opts = ScanOpts {
        block_size: 1024,
        ..ScanOpts::default()
    };
    let records = scan_all(
        dir.path(),
        &opts,
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    let big = &records[0];
    assert_eq!(big.blocks.len(), 10);
    assert_eq!(big.size(), data.len() as u64);

    let mut offset = 0u64;
    for b in &big.blocks {
        assert_eq!(b.offset, offset);
        let chunk = &data[b.offset as usize..(b.offset + b.size as u64) as usize];
        assert_eq!(b.hash, *blake3::hash(chunk).as_bytes());
        offset += b.size as u64;
    }
    assert_eq!(offset, data.len() as u64);
}

#[test]
fn test_many_files_none_dropped() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..200 {
        let sub = dir.path().join(format!("d{}", i % 5));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("f{i:03}")), format!("content {i}")).unwrap();
    }
    let opts = ScanOpts {
        num_threads: Some(4),
        ..ScanOpts::default()
    };
    let records = scan_all(
        dir.path(),
        &opts,
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert_eq!(records.len(), 205);

    let versions: HashSet<u64> = records.iter().map(|r| r.version).collect();
    assert_eq!(versions.len(), records.len());
    assert!(
        records
            .iter()
            .filter(|r| r.is_file())
            .all(|r| r.blocks.len() == 1)
    );
}

#[test]
fn test_versions_follow_walk_order() {
    let dir = tempfile::tempdir().unwrap();
    for d in ["a", "b", "c"] {
        fs::create_dir(dir.path().join(d)).unwrap();
        fs::write(dir.path().join(d).join("f"), d).unwrap();
    }
    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    // sorted by name is also walk order here
    let order = names(&records);
    assert_eq!(order, vec!["a", "a/f", "b", "b/f", "c", "c/f"]);
    assert!(records.windows(2).all(|w| w[0].version < w[1].version));
}

#[test]
fn test_ignored_directory_not_descended() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("skip/inner")).unwrap();
    fs::write(dir.path().join("skip/inner/x.txt"), b"x").unwrap();
    fs::write(dir.path().join("keep.txt"), b"k").unwrap();
    fs::write(dir.path().join("debug.log"), b"l").unwrap();

    let matcher = IgnoreFile::from_patterns(&["skip", "*.log"]).unwrap();
    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())).with_matcher(Arc::new(matcher)),
    );
    assert_eq!(names(&records), vec!["keep.txt"]);
}

#[test]
fn test_stignore_file_loaded() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".stignore"), "secret*\n").unwrap();
    fs::write(dir.path().join("secret.key"), b"s").unwrap();
    fs::write(dir.path().join("public.txt"), b"p").unwrap();

    let matcher = IgnoreFile::load(dir.path(), &[]).unwrap();
    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())).with_matcher(Arc::new(matcher)),
    );
    assert_eq!(names(&records), vec!["public.txt"]);
}

#[test]
fn test_reserved_and_temp_names_never_emitted() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".stversions/old")).unwrap();
    fs::write(dir.path().join(".stversions/old/a.txt"), b"v").unwrap();
    fs::create_dir(dir.path().join(".stfolder")).unwrap();
    fs::write(dir.path().join(".stignore"), b"").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/.stignore"), b"").unwrap();
    fs::write(dir.path().join("sub/.syncscan.part.tmp"), b"t").unwrap();
    fs::write(dir.path().join("sub/real.txt"), b"r").unwrap();

    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default()))
            .with_temp_namer(Arc::new(PrefixTempNamer::default())),
    );
    assert_eq!(names(&records), vec!["sub", "sub/real.txt"]);
}

#[test]
fn test_sub_path_restricts_walk() {
    let dir = fixture_a();
    fs::write(dir.path().join("b/inner.txt"), b"i").unwrap();
    let opts = ScanOpts {
        sub: "b".into(),
        ..ScanOpts::default()
    };
    let records = scan_all(
        dir.path(),
        &opts,
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert_eq!(names(&records), vec!["b", "b/inner.txt"]);
}

#[test]
fn test_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let res = scan(
        &dir.path().join("nope"),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert!(res.is_err());
}

#[test]
fn test_root_not_a_directory_fails() {
    let dir = fixture_a();
    let res = scan(
        &dir.path().join("a.txt"),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert!(res.is_err());
}

#[test]
fn test_zero_block_size_fails() {
    let dir = fixture_a();
    let opts = ScanOpts {
        block_size: 0,
        ..ScanOpts::default()
    };
    let res = scan(
        dir.path(),
        &opts,
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert!(res.is_err());
}

#[test]
fn test_stream_iterates_and_finishes() {
    let dir = fixture_a();
    let mut stream = scan(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    )
    .unwrap();
    let first = stream.next();
    assert!(first.is_some());
    let stats = stream.finish().unwrap();
    assert_eq!(stats.emitted + stats.to_hash, 2);
}

#[cfg(unix)]
#[test]
fn test_symlink_content_is_target() {
    use syncscan::SymlinkType;

    let dir = tempfile::tempdir().unwrap();
    std::os::unix::fs::symlink("target", dir.path().join("link")).unwrap();
    let clock = Arc::new(LamportClock::default());
    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock.clone()),
    );

    assert_eq!(names(&records), vec!["link"]);
    let link = &records[0];
    assert_eq!(link.kind, EntryKind::Symlink(SymlinkType::Unknown));
    assert_eq!(link.modified, 0);
    assert_eq!(link.permissions, None);
    assert_eq!(
        link.blocks,
        blocks(&b"target"[..], ScanOpts::default().block_size).unwrap()
    );

    let again = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock).with_previous(Arc::new(MemoryIndex::from_records(records))),
    );
    assert!(again.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlink_rescan_ignores_recorded_mtime() {
    let dir = tempfile::tempdir().unwrap();
    std::os::unix::fs::symlink("target", dir.path().join("link")).unwrap();
    let clock = Arc::new(LamportClock::default());
    let mut first = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock.clone()),
    );
    first[0].modified = 12345;

    let again = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(clock).with_previous(Arc::new(MemoryIndex::from_records(first))),
    );
    assert!(again.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_not_traversed() {
    use syncscan::SymlinkType;

    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    fs::write(dir.path().join("real/f.txt"), b"f").unwrap();
    std::os::unix::fs::symlink("real", dir.path().join("alias")).unwrap();

    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert_eq!(names(&records), vec!["alias", "real", "real/f.txt"]);
    assert_eq!(
        records[0].kind,
        EntryKind::Symlink(SymlinkType::Directory)
    );
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_nfc_name_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cafe\u{301}.txt"), b"d").unwrap();
    fs::write(dir.path().join("ok.txt"), b"o").unwrap();

    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert_eq!(names(&records), vec!["ok.txt"]);
}

#[cfg(unix)]
#[test]
fn test_platform_read_link() {
    use syncscan::SymlinkType;
    use syncscan::platform::PlatformOps;

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("file"), b"f").unwrap();
    std::os::unix::fs::symlink("file", dir.path().join("link")).unwrap();

    let ops = PlatformOps::current();
    assert!(ops.symlinks_supported);
    assert_eq!(
        ops.read_link(&dir.path().join("link")).unwrap(),
        ("file".to_string(), SymlinkType::File)
    );
}

#[cfg(unix)]
#[test]
fn test_sub_path_symlinked_dir_recorded_as_link() {
    use syncscan::SymlinkType;

    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    fs::write(dir.path().join("real/f.txt"), b"f").unwrap();
    std::os::unix::fs::symlink("real", dir.path().join("alias")).unwrap();

    let opts = ScanOpts {
        sub: "alias".into(),
        ..ScanOpts::default()
    };
    let records = scan_all(
        dir.path(),
        &opts,
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    assert_eq!(names(&records), vec!["alias"]);
    assert_eq!(
        records[0].kind,
        EntryKind::Symlink(SymlinkType::Directory)
    );
}

#[test]
fn test_hash_workers_drop_vanished_file() {
    use crossbeam_channel::bounded;
    use syncscan::pipeline::spawn_hash_workers;

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("here.txt"), b"here").unwrap();
    let pending = |name: &str, version: u64| FileInfo {
        name: name.to_string(),
        kind: EntryKind::File,
        version,
        permissions: None,
        modified: 0,
        deleted: false,
        blocks: Vec::new(),
    };

    let (file_tx, file_rx) = bounded(0);
    let (record_tx, record_rx) = bounded(0);
    let handles = spawn_hash_workers(file_rx, &record_tx, dir.path(), 1024, 2);
    drop(record_tx);

    let feeder = std::thread::spawn(move || {
        file_tx.send(pending("gone.txt", 1)).unwrap();
        file_tx.send(pending("here.txt", 2)).unwrap();
    });

    let out: Vec<FileInfo> = record_rx.iter().collect();
    feeder.join().unwrap();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(names(&out), vec!["here.txt"]);
    assert_eq!(out[0].blocks, blocks(&b"here"[..], 1024).unwrap());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_dropped_scan_completes() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, b"secret").unwrap();
    fs::write(dir.path().join("open.txt"), b"open").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // Running as root: permission bits don't block reads.
        return;
    }

    let records = scan_all(
        dir.path(),
        &ScanOpts::default(),
        Collaborators::new(Arc::new(LamportClock::default())),
    );
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    assert_eq!(names(&records), vec!["open.txt"]);
}
