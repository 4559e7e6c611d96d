use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{publication::Publication, raw::Author};

/// The JSON document printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub profile: Profile,
    pub publications: Vec<Publication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub affiliation: String,
    pub scholar_id: String,
    pub citations: u64,
    pub h_index: u64,
    pub i10_index: u64,
}

impl<S> From<&Author<S>> for Profile {
    fn from(author: &Author<S>) -> Self {
        Profile {
            name: author.name.clone(),
            affiliation: author.affiliation.clone(),
            scholar_id: author.scholar_id.clone(),
            citations: author.citedby,
            h_index: author.hindex,
            i10_index: author.i10index,
        }
    }
}

impl Document {
    /// Publications are sorted newest first, then most cited first.
    pub fn new(profile: Profile, mut publications: Vec<Publication>) -> Self {
        sort_publications(&mut publications);
        Document {
            profile,
            publications,
        }
    }

    pub fn write_pretty(&self, mut out: impl Write) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    /// Same document as YAML, keys in schema order.
    pub fn write_yaml(&self, mut out: impl Write) -> anyhow::Result<()> {
        serde_yaml::to_writer(&mut out, self)?;
        out.flush()?;
        Ok(())
    }
}

/// Year descending, then citations descending. The sort is stable, so full ties keep the order in
/// which they were collected.
pub fn sort_publications(publications: &mut [Publication]) {
    publications.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.citations.cmp(&a.citations))
    });
}
