// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod probe;
pub mod types;
pub mod watch;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{resolve_watch_spec, WatchSpec};
use crate::engine::WatchSession;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - the watch session (directory bootstrap, notify, debounce, dispatch)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let spec = resolve_watch_spec(&args)?;

    if args.dry_run {
        print_dry_run(&spec);
        return Ok(());
    }

    let session = WatchSession::new(spec, None);

    // Ctrl-C → graceful shutdown.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    session.run(shutdown).await?;
    Ok(())
}

/// Simple dry-run output: print the effective watch spec.
fn print_dry_run(spec: &WatchSpec) {
    println!("filetrigger dry-run");
    println!("  directory = {}", spec.directory().display());
    if spec.patterns().is_empty() {
        println!("  patterns = (none; empty_patterns = {:?})", spec.empty_patterns());
    } else {
        println!("  patterns = {:?}", spec.patterns());
    }
    if !spec.exclude().is_empty() {
        println!("  exclude = {:?}", spec.exclude());
    }
    println!("  poll_interval = {:?}", spec.poll_interval());
    match spec.max_wait() {
        Some(max) => println!("  max_wait = {max:?}"),
        None => println!("  max_wait = (unbounded)"),
    }
    println!("  probe = {:?}", spec.probe_mode());
    match spec.command() {
        Some(cmd) => println!("  action = {cmd}"),
        None => println!("  action = (log only)"),
    }
    println!("  path_style = {:?}", spec.path_style());

    debug!("dry-run complete (not watching)");
}
