//! Pipeline components: context and channels, walk loop, hashing workers, output stream.

pub mod context;
pub mod hasher;
pub mod orchestrator;
pub mod stream;
pub mod walk;

pub use context::{
    PipelineChannels, PipelineContext, PipelineHandles, WalkStats, create_pipeline_channels,
};
pub use hasher::spawn_hash_workers;
pub use orchestrator::{run_pipeline, shutdown_pipeline_handles};
pub use stream::ScanStream;
pub use walk::{run_walk_loop, spawn_walk_thread};
