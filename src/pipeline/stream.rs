//! The caller-facing end of the pipeline.

use anyhow::Result;
use crossbeam_channel::Receiver;
use std::thread::JoinHandle;

use crate::FileInfo;

use super::context::{PipelineHandles, WalkStats};
use super::orchestrator::shutdown_pipeline_handles;

/// Records from one scan, in completion order. Drain it (iterate to the end or call
/// [`finish`](Self::finish)); dropping it early stops the walk at the next hand-off.
pub struct ScanStream {
    record_rx: Receiver<FileInfo>,
    walk_handle: JoinHandle<WalkStats>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl ScanStream {
    pub(crate) fn new(handles: PipelineHandles) -> Self {
        Self {
            record_rx: handles.record_rx,
            walk_handle: handles.walk_handle,
            worker_handles: handles.worker_handles,
        }
    }

    /// Drain whatever is left and join the walk and worker threads.
    pub fn finish(self) -> Result<WalkStats> {
        for _ in self.record_rx.iter() {}
        shutdown_pipeline_handles(self.walk_handle, self.worker_handles)
    }

    /// Drain into a `Vec` and join.
    pub fn collect_records(self) -> Result<Vec<FileInfo>> {
        let records: Vec<FileInfo> = self.record_rx.iter().collect();
        log::debug!("scan stream closed, {} records", records.len());
        shutdown_pipeline_handles(self.walk_handle, self.worker_handles)?;
        Ok(records)
    }
}

impl Iterator for ScanStream {
    type Item = FileInfo;

    fn next(&mut self) -> Option<FileInfo> {
        self.record_rx.recv().ok()
    }
}
