//! Engine module for classification, hashing, and the CLI front end

pub mod arg_parser;
pub mod classify;
pub mod cli;
pub mod hashing;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use classify::{Classifier, EntryStat, StatKind, Verdict, is_nfc, symlink_type_equal};
pub use cli::handle_run;
pub use hashing::{blocks, blocks_equal, blocks_from_slice, hash_file_blocks};
pub use tools::{check_dir, mtime_secs, path_relative_to, path_to_record_name};
