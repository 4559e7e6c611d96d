use serde::{Deserialize, Serialize};

/// A publication as the Scholar source hands it over, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPublication {
    #[serde(default)]
    pub bib: Bib,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_citations: Option<u64>,
    /// `"<scholar id>:<publication id>"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_pub_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eprint_url: Option<String>,
    /// Relative to the Scholar host, e.g. `/scholar?hl=en&cites=...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citedby_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bib {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// Names joined with `" and "`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

/// Profile-level data returned when a researcher id resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author<S> {
    pub scholar_id: String,
    pub name: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub citedby: u64,
    #[serde(default)]
    pub hindex: u64,
    #[serde(default)]
    pub i10index: u64,
    /// Publication stubs in profile order; each still needs a `fill`.
    #[serde(default = "Vec::new")]
    pub publications: Vec<S>,
}

impl<S> Author<S> {
    /// Same profile with different publication entries.
    pub fn with_publications<T>(&self, publications: Vec<T>) -> Author<T> {
        Author {
            scholar_id: self.scholar_id.clone(),
            name: self.name.clone(),
            affiliation: self.affiliation.clone(),
            citedby: self.citedby,
            hindex: self.hindex,
            i10index: self.i10index,
            publications,
        }
    }
}
