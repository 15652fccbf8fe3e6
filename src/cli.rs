//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Harvest PDF data sheets linked from a fixed list of product pages.
///
/// Fetches every seed page, collects the pages into one aggregate file,
/// extracts the PDF links found there and downloads each document once,
/// skipping files already on disk.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/harvester/config.toml)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory documents are saved into [default: PDFs/]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Scheme and host prefixed to relative links [default: https://cam2.com]
    #[arg(short = 'b', long, value_name = "URL")]
    pub base_domain: Option<String>,

    /// File listing seed pages, one URL per line (# starts a comment)
    #[arg(short = 's', long, value_name = "PATH")]
    pub seeds_file: Option<PathBuf>,

    /// Maximum concurrent downloads (1-32) [default: 1]
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub concurrency: Option<u8>,

    /// Per-download timeout in seconds [default: 900]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub download_timeout: Option<u64>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
