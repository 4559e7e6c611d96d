use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use clap::{Parser, Subcommand};
use url::Url;

use crate::source::scholar::{MAX_PAGE_SIZE, ScholarConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print debug traces on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress progress and summary lines on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a Google Scholar profile and print its publications as JSON
    Fetch {
        /// Google Scholar user id, e.g. `hTwbmPUAAAAJ`
        #[arg(value_name = "SCHOLAR_ID")]
        scholar_id: String,

        /// Read the profile from a dump written by `--save-raw` instead of the network
        #[arg(long, value_name = "FILE")]
        replay: Option<PathBuf>,

        /// Also write the profile and filled raw records to FILE, for later `--replay`
        #[arg(long, value_name = "FILE")]
        save_raw: Option<PathBuf>,

        /// Write the JSON document to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        scholar: ScholarArgs,
    },
    /// Summarise a publications document written by `fetch`
    Stats {
        /// Document to read; stdin when absent or `-`
        #[arg(value_name = "SRC", default_value = "-")]
        from: Input,
    },
    /// Convert a publications document written by `fetch` to YAML
    ToYaml {
        /// Document to read; stdin when absent or `-`
        #[arg(value_name = "SRC", default_value = "-")]
        from: Input,

        /// Write the YAML to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct ScholarArgs {
    /// Scholar host to fetch from
    #[arg(long, env = "SCHOLAR_HOST", default_value = "https://scholar.google.com")]
    pub host: Url,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCHOLAR_TIMEOUT", default_value_t = 20)]
    pub timeout: u64,

    /// Profile rows to request (at most 100)
    #[arg(
        long,
        env = "SCHOLAR_PAGE_SIZE",
        default_value_t = MAX_PAGE_SIZE,
        value_parser = clap::value_parser!(u16).range(1..=MAX_PAGE_SIZE as i64)
    )]
    pub page_size: u16,
}

impl From<ScholarArgs> for ScholarConfig {
    fn from(args: ScholarArgs) -> Self {
        ScholarConfig {
            host: args.host,
            timeout: Duration::from_secs(args.timeout),
            page_size: args.page_size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a document is read from: standard input, or a file on disk.
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl FromStr for Input {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Input::Stdin);
        }
        fs::canonicalize(s)
            .map(Input::File)
            .map_err(|e| format!("cannot read {s}: {e}"))
    }
}
