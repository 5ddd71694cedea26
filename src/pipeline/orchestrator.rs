use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::ScanOpts;
use crate::collab::Collaborators;
use crate::engine::tools::check_dir;
use crate::platform::PlatformOps;
use crate::pipeline;
use crate::utils::config::WorkerThreadLimits;

/// Start the walk + hashing pipeline. Fails only if `root` is missing or not a directory.
/// Caller receives from `record_rx` until it closes and then joins the handles.
pub fn run_pipeline(
    root: &Path,
    opts: &ScanOpts,
    collab: Collaborators,
) -> Result<pipeline::PipelineHandles> {
    check_dir(root)?;
    if opts.block_size == 0 || opts.block_size > u32::MAX as usize {
        anyhow::bail!("invalid block size {}", opts.block_size);
    }

    let num_threads = WorkerThreadLimits::current().pool_size(opts.num_threads);
    debug!(
        "scan {} sub={:?} block_size={} ignore_perms={} workers={}",
        root.display(),
        opts.sub,
        opts.block_size,
        opts.ignore_perms,
        num_threads
    );

    let channels = pipeline::create_pipeline_channels();
    let ctx = pipeline::PipelineContext {
        root: root.to_path_buf(),
        start: root.join(&opts.sub),
        block_size: opts.block_size,
        ignore_perms: opts.ignore_perms,
        platform: PlatformOps::current(),
        collab,
    };

    let worker_handles = pipeline::spawn_hash_workers(
        channels.file_rx,
        &channels.record_tx,
        root,
        opts.block_size,
        num_threads,
    );

    // The walk thread owns the last sender clone; the channel closes when it and all workers exit.
    let walk_handle = pipeline::spawn_walk_thread(channels.file_tx, channels.record_tx, ctx);

    Ok(pipeline::PipelineHandles {
        record_rx: channels.record_rx,
        walk_handle,
        worker_handles,
    })
}

/// Shut down the pipeline by joining walk and worker threads (after stream is drained).
pub fn shutdown_pipeline_handles(
    walk_handle: std::thread::JoinHandle<pipeline::WalkStats>,
    worker_handles: Vec<std::thread::JoinHandle<()>>,
) -> Result<pipeline::WalkStats> {
    let stats = walk_handle
        .join()
        .map_err(|_| anyhow::anyhow!("walk thread panicked"))?;
    for h in worker_handles {
        h.join()
            .map_err(|_| anyhow::anyhow!("hash worker panicked"))?;
    }
    Ok(stats)
}
