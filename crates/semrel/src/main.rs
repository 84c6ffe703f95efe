//! semrel - Semantic release CLI

mod cli;

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose);

    cli.execute()
}

/// Console logs go to stderr, filtered by `RUST_LOG` (warn unless
/// `--verbose`). Debug-level JSON also goes to a daily file under
/// `~/.semrel/logs` when that directory can be created.
fn init_tracing(verbose: bool) -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter(verbose));

    let (file, guard) = match log_directory() {
        Some(dir) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "semrel.log"));
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}

fn console_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn log_directory() -> Option<PathBuf> {
    let dir = dirs::home_dir()?.join(".semrel").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
