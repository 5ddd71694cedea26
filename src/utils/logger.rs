use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Log to stderr (stdout carries records). Dependencies at Warn, this crate at Info or Debug.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let line = match record.level() {
                Level::Error => format!("[{} {}] {}", name, "ERROR".red(), record.args()),
                Level::Warn => format!("[{} {}] {}", name, "WARN".yellow(), record.args()),
                Level::Debug | Level::Trace => {
                    let target = record.target().trim_start_matches(env!("CARGO_PKG_NAME"));
                    let target = target.trim_start_matches("::").dimmed();
                    format!("[{} {}] {}", name, target, record.args())
                }
                Level::Info => format!("[{}] {}", name, record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
