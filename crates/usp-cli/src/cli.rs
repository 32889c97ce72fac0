//! Command-line argument surface.
//!
//! One root `Cli` struct over a `Commands` subcommand enum, leaving room to grow past the
//! single `ls` subcommand without reshaping the top-level parser.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Sitemap discovery from the command line.
#[derive(Debug, Parser)]
#[command(name = "usp", version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover a site's sitemap tree and list it.
    Ls(LsArgs),
}

/// Arguments for `usp ls`.
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Homepage URL to discover sitemaps from.
    pub url: String,

    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Tabtree)]
    pub format: OutputFormat,

    /// Disable robots.txt discovery.
    #[arg(short = 'r', long = "no-robots")]
    pub no_robots: bool,

    /// Disable well-known-path probing.
    #[arg(short = 'k', long = "no-known-paths")]
    pub no_known_paths: bool,

    /// Strip the homepage URL prefix from printed page URLs.
    #[arg(short = 'u', long = "strip-prefix")]
    pub strip_prefix: bool,

    /// Increase log verbosity (`-v` for info, `-vv` for debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Additionally mirror log events to this file.
    #[arg(short = 'l', long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Rendering format for `usp ls`'s output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree of index and page sitemap nodes.
    Tabtree,
    /// Flat, newline-separated list of page URLs.
    Pages,
}
