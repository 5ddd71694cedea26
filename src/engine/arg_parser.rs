use clap::Parser;
use std::path::PathBuf;

use crate::utils::CliOpts;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Scan a folder and print every new or changed entry as one JSON line.
#[derive(Clone, Parser)]
#[command(name = "syncscan")]
#[command(about = "Scan a folder for changes against a previous index; print changed records as JSON lines.")]
pub struct Cli {
    /// Folder to scan. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Only scan this path inside DIR.
    #[arg(long, short = 's')]
    pub sub: Option<PathBuf>,

    /// Block size in bytes used for hashing.
    #[arg(long, short = 'b')]
    pub block_size: Option<usize>,

    /// Do not track permission bits.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub ignore_perms: Option<bool>,

    /// Previous index as JSON lines (e.g. the output of an earlier run). Later lines win.
    #[arg(long, short = 'p')]
    pub previous: Option<PathBuf>,

    /// Extra ignore patterns (gitignore syntax), on top of DIR/.stignore. Can specify multiple.
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Hashing worker count. Default: available parallelism.
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// Apply flags that were given on top of `opts`.
    pub fn apply_to(&self, opts: &mut CliOpts) {
        if let Some(ref s) = self.sub {
            opts.sub = s.clone();
        }
        if let Some(b) = self.block_size {
            opts.block_size = b;
        }
        if let Some(v) = self.ignore_perms {
            opts.ignore_perms = v;
        }
        if let Some(ref p) = self.previous {
            opts.previous = Some(p.clone());
        }
        if !self.exclude.is_empty() {
            opts.exclude.extend(self.exclude.iter().cloned());
        }
        if self.threads.is_some() {
            opts.threads = self.threads;
        }
        if let Some(v) = self.verbose {
            opts.verbose = v;
        }
    }
}
