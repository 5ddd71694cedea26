//! Walk loop: single-threaded, lexically ordered, depth-first traversal that classifies
//! every entry and routes what changed.
//!
//! Directories and symlinks are finished here and go straight to the record channel.
//! Files go to the hashing workers with their version already stamped.

use crossbeam_channel::Sender;
use log::debug;
use std::path::Path;
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use crate::engine::classify::{EntryStat, StatKind, Verdict};
use crate::engine::hashing::blocks;
use crate::engine::tools::{path_relative_to, path_to_record_name};
use crate::version::VersionSource;
use crate::{EntryKind, FileInfo};

use super::context::{PipelineContext, WalkStats};

/// Receiver hung up; stop walking.
struct Disconnected;

pub fn spawn_walk_thread(
    file_tx: Sender<FileInfo>,
    record_tx: Sender<FileInfo>,
    ctx: PipelineContext,
) -> JoinHandle<WalkStats> {
    thread::spawn(move || run_walk_loop(file_tx, record_tx, ctx))
}

/// Walk `ctx.start`, sending files to `file_tx` and finished records to `record_tx`.
/// Drops both senders on return so workers and the caller see the channels close.
pub fn run_walk_loop(
    file_tx: Sender<FileInfo>,
    record_tx: Sender<FileInfo>,
    ctx: PipelineContext,
) -> WalkStats {
    let classifier = ctx.classifier();
    let mut stats = WalkStats::default();
    let mut iter = WalkDir::new(&ctx.start)
        .follow_links(false)
        .follow_root_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(res) = iter.next() {
        let entry = match res {
            Ok(entry) => entry,
            Err(err) => {
                debug!("error: {err}");
                stats.failed += 1;
                continue;
            }
        };

        let path = entry.path();
        let Some(name) = path_relative_to(path, &ctx.root)
            .as_deref()
            .and_then(path_to_record_name)
        else {
            debug!("rel error: {}", path.display());
            stats.failed += 1;
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(err) => {
                debug!("stat error: {}: {err}", path.display());
                stats.failed += 1;
                continue;
            }
        };
        let stat = EntryStat::from_metadata(&meta, ctx.platform);

        let hint = match classifier.classify(&name, &stat) {
            Verdict::Emit { hint } => hint,
            Verdict::SkipSubtree => {
                if entry.file_type().is_dir() {
                    iter.skip_current_dir();
                }
                stats.unchanged_or_skipped += 1;
                continue;
            }
            Verdict::SkipEntry => {
                stats.unchanged_or_skipped += 1;
                continue;
            }
        };

        let sent = match stat.kind {
            StatKind::Symlink => match symlink_record(&ctx, path, name, &mut stats) {
                Some(f) => {
                    stats.emitted += 1;
                    send(&record_tx, f)
                }
                None => Ok(()),
            },
            StatKind::Directory => {
                let f = FileInfo {
                    name,
                    kind: EntryKind::Directory,
                    version: ctx.collab.versions.tick(hint),
                    permissions: permissions(&ctx, stat.mode),
                    modified: stat.modified,
                    deleted: false,
                    blocks: Vec::new(),
                };
                debug!("dir: {} {:?}", path.display(), f);
                stats.emitted += 1;
                send(&record_tx, f)
            }
            StatKind::File => {
                let f = FileInfo {
                    name,
                    kind: EntryKind::File,
                    version: ctx.collab.versions.tick(hint),
                    permissions: permissions(&ctx, stat.mode),
                    modified: stat.modified,
                    deleted: false,
                    blocks: Vec::new(),
                };
                debug!("to hash: {} {:?}", path.display(), f);
                stats.to_hash += 1;
                send(&file_tx, f)
            }
            StatKind::Other => Ok(()),
        };
        if sent.is_err() {
            debug!("receiver gone, stopping walk at {}", path.display());
            break;
        }
    }

    debug!(
        "walk done: {} emitted, {} to hash, {} unchanged/skipped, {} failed",
        stats.emitted, stats.to_hash, stats.unchanged_or_skipped, stats.failed
    );
    drop(file_tx);
    drop(record_tx);
    stats
}

fn send(tx: &Sender<FileInfo>, f: FileInfo) -> Result<(), Disconnected> {
    tx.send(f).map_err(|_| Disconnected)
}

fn permissions(ctx: &PipelineContext, mode: u32) -> Option<u32> {
    if ctx.ignore_perms { None } else { Some(mode) }
}

/// Read and hash the link target, then compare against the previous record.
/// `None` if unreadable or unchanged.
fn symlink_record(
    ctx: &PipelineContext,
    path: &Path,
    name: String,
    stats: &mut WalkStats,
) -> Option<FileInfo> {
    let (target, target_type) = match ctx.platform.read_link(path) {
        Ok(t) => t,
        Err(err) => {
            debug!("readlink error: {}: {err}", path.display());
            stats.failed += 1;
            return None;
        }
    };
    let blocks = match blocks(target.as_bytes(), ctx.block_size) {
        Ok(b) => b,
        Err(err) => {
            debug!("hash link error: {}: {err}", path.display());
            stats.failed += 1;
            return None;
        }
    };
    let hint = match ctx.classifier().symlink_verdict(&name, target_type, &blocks) {
        Verdict::Emit { hint } => hint,
        _ => {
            stats.unchanged_or_skipped += 1;
            return None;
        }
    };
    let f = FileInfo {
        name,
        kind: EntryKind::Symlink(target_type),
        version: ctx.collab.versions.tick(hint),
        permissions: None,
        modified: 0,
        deleted: false,
        blocks,
    };
    debug!("symlink: {} -> {target} {:?}", path.display(), f);
    Some(f)
}
