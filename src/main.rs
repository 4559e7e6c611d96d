use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read},
    path::Path,
};

use anyhow::Context;
use clap::Parser;

use crate::{
    cli::{Cli, Command, Input},
    document::Document,
    harvest::harvest,
    report::Reporter,
    source::{
        replay::{self, ReplaySource},
        scholar::ScholarSource,
    },
    stats::Stats,
};

mod cli;
mod document;
mod error;
mod harvest;
mod logging;
mod publication;
mod raw;
mod report;
mod source;
mod stats;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init(args.debug);
    let reporter = Reporter::new(args.quiet);

    match args.command {
        Command::Fetch {
            scholar_id,
            replay,
            save_raw,
            output,
            scholar,
        } => {
            let result = match replay {
                Some(path) => {
                    let source = ReplaySource::open(&path)
                        .with_context(|| format!("cannot load replay dump {}", path.display()))?;
                    harvest(&source, &scholar_id, &reporter)?
                }
                None => harvest(&ScholarSource::new(scholar.into()), &scholar_id, &reporter)?,
            };

            if let Some(path) = save_raw {
                replay::save(&path, &result.raw)
                    .with_context(|| format!("cannot write replay dump {}", path.display()))?;
            }
            write_document(&result.document, output.as_deref())?;
            reporter.finish(result.parsed, result.skipped);
        }
        Command::Stats { from } => {
            let document = read_document(&from)?;
            let stats = Stats::of(&document.publications);
            serde_json::to_writer_pretty(io::stdout().lock(), &stats)?;
            println!();
        }
        Command::ToYaml { from, output } => {
            let document = read_document(&from)?;
            match output.as_deref() {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    document.write_yaml(BufWriter::new(file))?;
                }
                None => document.write_yaml(io::stdout().lock())?,
            }
            reporter.converted(&document);
        }
    }
    Ok(())
}

fn write_document(document: &Document, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            document.write_pretty(BufWriter::new(file))
        }
        None => document.write_pretty(io::stdout().lock()),
    }
}

fn read_document(from: &Input) -> anyhow::Result<Document> {
    let reader: Box<dyn Read> = match from {
        Input::Stdin => Box::new(io::stdin().lock()),
        Input::File(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
    };
    serde_json::from_reader(reader).context("not a publications document")
}
