use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::FileInfo;
use crate::engine::hashing::hash_file_blocks;

/// Single hashing worker: take a file record from file_rx, attach its blocks, send on record_tx.
/// Files that vanished or became unreadable since classification are dropped.
fn hash_worker_loop(
    file_rx: Receiver<FileInfo>,
    record_tx: Sender<FileInfo>,
    root: PathBuf,
    block_size: usize,
) {
    while let Ok(mut f) = file_rx.recv() {
        let abs_path = root.join(&f.name);
        match hash_file_blocks(&abs_path, block_size) {
            Ok(blocks) => f.blocks = blocks,
            Err(err) => {
                debug!("hash error: {}: {err:#}", abs_path.display());
                continue;
            }
        }
        debug!("hashed: {} ({} blocks)", f.name, f.blocks.len());
        if record_tx.send(f).is_err() {
            break;
        }
    }
    drop(record_tx);
}

/// Spawn hashing workers. Caller must drop its own `record_tx` after this so the
/// record channel closes once the walk and every worker are done.
pub fn spawn_hash_workers(
    file_rx: Receiver<FileInfo>,
    record_tx: &Sender<FileInfo>,
    root: &Path,
    block_size: usize,
    num_threads: usize,
) -> Vec<JoinHandle<()>> {
    let root = root.to_path_buf();
    (0..num_threads)
        .map(|_| {
            let file_rx = file_rx.clone();
            let record_tx = record_tx.clone();
            let root = root.clone();
            thread::spawn(move || hash_worker_loop(file_rx, record_tx, root, block_size))
        })
        .collect()
}
