//! Pipeline context: shared data passed into the walk thread, and the hand-off channels.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::thread::JoinHandle;

use crate::FileInfo;
use crate::collab::Collaborators;
use crate::engine::classify::Classifier;
use crate::platform::PlatformOps;
use crate::utils::config::HANDOFF_CHANNEL_CAP;

/// Shared context for the walk. Built in `run_pipeline` and moved into the walk thread.
pub struct PipelineContext {
    pub root: PathBuf,
    /// Where traversal starts: `root` joined with the sub-path restriction.
    pub start: PathBuf,
    pub block_size: usize,
    pub ignore_perms: bool,
    pub platform: &'static PlatformOps,
    pub collab: Collaborators,
}

impl PipelineContext {
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier {
            platform: self.platform,
            ignore_perms: self.ignore_perms,
            matcher: self.collab.matcher.as_deref(),
            temp_namer: self.collab.temp_namer.as_deref(),
            previous: self.collab.previous.as_deref(),
        }
    }
}

/// Per-walk counters, logged when traversal ends.
#[derive(Clone, Copy, Debug, Default)]
pub struct WalkStats {
    /// Directories and symlinks sent straight to the output.
    pub emitted: usize,
    /// Files handed to the hashing workers.
    pub to_hash: usize,
    pub unchanged_or_skipped: usize,
    pub failed: usize,
}

/// Handles returned by `run_pipeline`: receive records and join when done.
pub struct PipelineHandles {
    pub record_rx: Receiver<FileInfo>,
    pub walk_handle: JoinHandle<WalkStats>,
    pub worker_handles: Vec<JoinHandle<()>>,
}

/// Channels for the pipeline. Walk thread gets file_tx and a clone of record_tx; workers get file_rx and record_tx.
pub struct PipelineChannels {
    pub file_tx: Sender<FileInfo>,
    pub file_rx: Receiver<FileInfo>,
    pub record_tx: Sender<FileInfo>,
    pub record_rx: Receiver<FileInfo>,
}

pub fn create_pipeline_channels() -> PipelineChannels {
    let (file_tx, file_rx) = bounded::<FileInfo>(HANDOFF_CHANNEL_CAP);
    let (record_tx, record_rx) = bounded::<FileInfo>(HANDOFF_CHANNEL_CAP);
    PipelineChannels {
        file_tx,
        file_rx,
        record_tx,
        record_rx,
    }
}
