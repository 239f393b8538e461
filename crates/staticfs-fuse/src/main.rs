//! `staticfs` - mount a read-only in-memory filesystem.
//!
//! # Examples
//!
//! ```bash
//! # Classic layout: a single /file
//! staticfs /mnt/static
//!
//! # Files from the command line; any -f replaces the built-in /file
//! staticfs /mnt/static -f /hello.txt='hello world' --file-mode 444
//!
//! # Layout from a configuration file, printed instead of mounted
//! staticfs --config layout.toml --check
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use staticfs_fuse::{Cli, StaticFs, mount, render_tree};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli
        .resolve_config()
        .context("failed to load configuration")?;
    let table = config
        .to_table()
        .context("failed to build filesystem layout")?;

    if cli.check {
        print!("{}", render_tree(&table));
        return Ok(());
    }

    let Some(mountpoint) = cli.mountpoint.as_deref() else {
        anyhow::bail!("a mount point is required unless --check is given");
    };

    tracing::info!(
        nodes = table.node_count(),
        files = table.file_count(),
        "starting staticfs"
    );

    let fs = StaticFs::new(Arc::new(table), &config.mount);
    mount(fs, mountpoint, &config.mount)
        .with_context(|| format!("failed to serve {}", mountpoint.display()))?;

    tracing::info!("staticfs stopped");
    Ok(())
}

/// Initializes the tracing subscriber, logging to stderr.
///
/// `RUST_LOG` is honoured unless `--verbose` forces debug level.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
