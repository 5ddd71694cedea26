//! CLI command handler: one scan, records to stdout as JSON lines.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::sync::Arc;

use crate::engine::arg_parser::Cli;
use crate::utils::{CliOpts, load_scan_toml, setup_logging};
use crate::{
    Collaborators, IgnoreFile, LamportClock, MemoryIndex, PrefixTempNamer, ScanOpts, scan,
};

fn setup_opts(cli: &Cli) -> CliOpts {
    let mut opts = CliOpts::default();
    if let Some(file) = load_scan_toml(&cli.dir) {
        file.apply_to(&cli.dir, &mut opts);
    }
    cli.apply_to(&mut opts);
    setup_logging(opts.verbose);
    opts
}

/// Run one scan of `cli.dir` and write each emitted record to stdout.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let previous = match opts.previous {
        Some(ref p) => Some(MemoryIndex::load_jsonl(p)?),
        None => None,
    };
    // Seed past everything already issued so new stamps order after the previous run's.
    let clock = Arc::new(LamportClock::new(
        previous.as_ref().map_or(0, MemoryIndex::max_version),
    ));

    let matcher = IgnoreFile::load(&cli.dir, &opts.exclude)?;
    let mut collab =
        Collaborators::new(clock.clone()).with_temp_namer(Arc::new(PrefixTempNamer::default()));
    if !matcher.is_empty() {
        collab = collab.with_matcher(Arc::new(matcher));
    }
    if let Some(index) = previous {
        collab = collab.with_previous(Arc::new(index));
    }

    let scan_opts = ScanOpts {
        sub: opts.sub.clone(),
        block_size: opts.block_size,
        ignore_perms: opts.ignore_perms,
        num_threads: opts.threads,
    };
    let mut stream = scan(&cli.dir, &scan_opts, collab)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0_usize;
    for record in stream.by_ref() {
        serde_json::to_writer(&mut out, &record).context("serialize record")?;
        out.write_all(b"\n").context("write record")?;
        count += 1;
    }
    out.flush().context("flush stdout")?;

    let stats = stream.finish()?;
    info!(
        "{} changed, {} unchanged or skipped, {} unreadable, version now {}",
        count,
        stats.unchanged_or_skipped,
        stats.failed,
        clock.current()
    );
    Ok(())
}
