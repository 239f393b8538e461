//! Command-line interface of the `staticfs` binary.

use crate::config::FsConfig;
use crate::error::Result;
use clap::Parser;
use staticfs_core::{Node, NodeTable};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Mount a read-only in-memory filesystem.
///
/// Without any configured or `--file` entries the mount holds a single `/file`.
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "staticfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory to mount on
    #[arg(required_unless_present = "check")]
    pub mountpoint: Option<PathBuf>,

    /// Configuration file (defaults to `<config dir>/staticfs/config.toml` if present)
    #[arg(short, long, env = "STATICFS_CONFIG")]
    pub config: Option<PathBuf>,

    /// File in PATH=CONTENT format, may be repeated.
    ///
    /// Added to the configured files. Any `--file` turns off the built-in
    /// `/file`, which is only used when no file is configured at all.
    #[arg(short, long = "file", value_parser = parse_file_arg, num_args = 1)]
    pub files: Vec<(String, String)>,

    /// Permission bits for files without an explicit mode, in octal
    #[arg(long, value_parser = parse_mode)]
    pub file_mode: Option<u32>,

    /// Let other users access the mount
    #[arg(long)]
    pub allow_other: bool,

    /// Unmount when the process exits
    #[arg(long)]
    pub auto_unmount: bool,

    /// Filesystem name shown by `mount`
    #[arg(long)]
    pub fsname: Option<String>,

    /// Print the layout and exit without mounting
    #[arg(long)]
    pub check: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Loads the configuration and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn resolve_config(&self) -> Result<FsConfig> {
        let mut config = match &self.config {
            Some(path) => FsConfig::load(path)?,
            None => match FsConfig::default_path().filter(|p| p.is_file()) {
                Some(path) => FsConfig::load(path)?,
                None => FsConfig::default(),
            },
        };

        for (path, content) in &self.files {
            config.push_file(path.as_str(), content.as_str());
        }
        if let Some(mode) = self.file_mode {
            config.file_mode = mode;
        }
        if let Some(fsname) = &self.fsname {
            config.mount.fsname.clone_from(fsname);
        }
        config.mount.allow_other |= self.allow_other;
        config.mount.auto_unmount |= self.auto_unmount;

        Ok(config)
    }
}

fn parse_file_arg(s: &str) -> std::result::Result<(String, String), String> {
    let (path, content) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=CONTENT, got '{s}'"))?;
    if path.is_empty() {
        return Err("file path cannot be empty".to_string());
    }
    Ok((path.to_string(), content.to_string()))
}

fn parse_mode(s: &str) -> std::result::Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode '{s}': {e}"))
}

/// Renders the layout of `table` as an indented tree, one node per line.
#[must_use]
pub fn render_tree(table: &NodeTable) -> String {
    let mut out = String::new();
    render_node(table, table.root(), 0, &mut out);
    out
}

fn render_node(table: &NodeTable, node: &Node, depth: usize, out: &mut String) {
    let name = if node.path().is_root() {
        "/"
    } else {
        node.path().name()
    };
    let indent = "  ".repeat(depth);

    if node.is_dir() {
        let _ = writeln!(out, "{indent}{name}  [{:04o}]", node.mode_bits());
        if let Some(children) = table.children(node.path().as_str()) {
            for child in children {
                render_node(table, child, depth + 1, out);
            }
        }
    } else {
        let _ = writeln!(
            out,
            "{indent}{name}  [{:04o}, {} bytes]",
            node.mode_bits(),
            node.size()
        );
    }
}
