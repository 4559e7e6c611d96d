use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::ProfileSource;
use crate::{
    error::FetchError,
    raw::{Author, RawPublication},
};

/// One recorded publication. `fill_error` replays a detail fetch that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    #[serde(flatten)]
    pub publication: RawPublication,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_error: Option<String>,
}

pub type ReplayDump = Author<ReplayEntry>;

/// Serves a single profile from a JSON dump instead of the network.
pub struct ReplaySource {
    dump: ReplayDump,
}

impl ReplaySource {
    pub fn open(path: &Path) -> Result<Self, FetchError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, FetchError> {
        Ok(ReplaySource {
            dump: serde_json::from_reader(reader)?,
        })
    }
}

impl ProfileSource for ReplaySource {
    type Stub = ReplayEntry;

    fn resolve(&self, scholar_id: &str) -> Result<ReplayDump, FetchError> {
        if self.dump.scholar_id != scholar_id {
            return Err(FetchError::ProfileNotFound(scholar_id.to_string()));
        }
        Ok(self.dump.clone())
    }

    fn fill(&self, stub: &ReplayEntry) -> Result<RawPublication, FetchError> {
        match &stub.fill_error {
            Some(message) => Err(FetchError::Replay(message.clone())),
            None => Ok(stub.publication.clone()),
        }
    }
}

/// Write filled records as a dump that [`ReplaySource`] can serve later.
pub fn save(path: &Path, author: &Author<RawPublication>) -> Result<(), FetchError> {
    let entries = author
        .publications
        .iter()
        .map(|publication| ReplayEntry {
            publication: publication.clone(),
            fill_error: None,
        })
        .collect();
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &author.with_publications(entries))?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
