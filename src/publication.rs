use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::raw::RawPublication;

/// Host that relative "cited by" paths are resolved against, regardless of which mirror the
/// records were fetched from.
pub const SCHOLAR_HOST: &str = "https://scholar.google.com";

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub(crate) static SCHOLAR_BASE: Lazy<Url> = Lazy::new(|| Url::parse(SCHOLAR_HOST).unwrap());

/// A publication in the normalized output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub venue: String,
    pub year: i32,
    pub citations: u64,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    #[serde(rename = "type")]
    pub kind: PublicationType,
    pub status: PublicationStatus,
    pub links: Vec<Link>,
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Journal,
    Conference,
    Preprint,
    Dataset,
}

/// Scholar only lists what is out, so every record is `published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "type")]
    pub kind: LinkType,
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Other,
    Pdf,
    Doi,
    Scholar,
}

impl Link {
    fn new(kind: LinkType, url: impl Into<String>, label: &str) -> Self {
        Link {
            kind,
            url: url.into(),
            label: label.to_string(),
        }
    }
}

/// Map one raw Scholar record onto the output schema.
///
/// Never fails: every missing field has a default, and a year that does not parse becomes `0`.
pub fn normalize(raw: &RawPublication) -> Publication {
    let bib = &raw.bib;
    let title = bib.title.clone().unwrap_or_default();

    let mut volume_parts = Vec::with_capacity(2);
    if let Some(volume) = present(&bib.volume) {
        volume_parts.push(format!("Vol. {volume}"));
    }
    if let Some(number) = present(&bib.number) {
        volume_parts.push(format!("No. {number}"));
    }
    let volume_info = (!volume_parts.is_empty()).then(|| volume_parts.join(", "));
    let doi = bib.doi.as_deref().map(str::trim).filter(|d| !d.is_empty());

    Publication {
        id: publication_id(raw.author_pub_id.as_deref()),
        kind: infer_type(bib.venue.as_deref(), &title),
        title,
        authors: split_authors(bib.author.as_deref()),
        venue: bib
            .venue
            .clone()
            .or_else(|| bib.journal.clone())
            .unwrap_or_default(),
        year: parse_year(bib.pub_year.as_deref()),
        citations: raw.num_citations.unwrap_or(0),
        abstract_: bib.abstract_.clone().unwrap_or_default(),
        status: PublicationStatus::Published,
        links: build_links(raw, doi),
        featured: false,
        doi: doi.map(str::to_string),
        volume_info,
        page_info: present(&bib.pages).map(|pages| format!("pp. {pages}")),
    }
}

/// `pub-` followed by whatever comes after the last `:` of the source id.
pub fn publication_id(author_pub_id: Option<&str>) -> String {
    let suffix = author_pub_id
        .and_then(|id| id.rsplit(':').next())
        .unwrap_or_default();
    format!("pub-{suffix}")
}

/// Venue rules take precedence over the title rule, so a journal paper about a dataset stays a
/// journal paper.
pub fn infer_type(venue: Option<&str>, title: &str) -> PublicationType {
    let venue = venue.unwrap_or_default().to_lowercase();
    if ["journal", "ieee", "acm"].iter().any(|k| venue.contains(k)) {
        PublicationType::Journal
    } else if venue.contains("arxiv") {
        PublicationType::Preprint
    } else if title.to_lowercase().contains("dataset") {
        PublicationType::Dataset
    } else {
        PublicationType::Conference
    }
}

pub fn split_authors(author: Option<&str>) -> Vec<String> {
    match author {
        Some(s) if !s.is_empty() => s.split(" and ").map(|a| a.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

pub fn parse_year(pub_year: Option<&str>) -> i32 {
    pub_year
        .and_then(|y| y.trim().parse::<i32>().ok())
        .unwrap_or(0)
}

fn build_links(raw: &RawPublication, doi: Option<&str>) -> Vec<Link> {
    let mut links = Vec::new();

    if let Some(url) = present(&raw.pub_url) {
        links.push(Link::new(LinkType::Other, url, "View Paper"));
    }

    if let Some(url) = present(&raw.eprint_url) {
        let kind = if url.ends_with(".pdf") {
            LinkType::Pdf
        } else {
            LinkType::Other
        };
        links.push(Link::new(kind, url, "PDF"));
    }

    if let Some(path) = present(&raw.citedby_url) {
        links.push(Link::new(LinkType::Scholar, scholar_url(path), "Google Scholar"));
    }

    if let Some(doi) = doi {
        links.push(Link::new(LinkType::Doi, doi_url(doi), "DOI"));
    }

    links
}

fn scholar_url(path: &str) -> String {
    SCHOLAR_BASE
        .join(path)
        .map(String::from)
        .unwrap_or_else(|_| format!("{SCHOLAR_HOST}{path}"))
}

/// Only characters that cannot stand in a URL path are escaped; `/`, `(` and `:` pass through.
fn doi_url(doi: &str) -> String {
    format!(
        "https://doi.org/{}",
        utf8_percent_encode(doi, PATH_SEGMENT_ENCODE_SET)
    )
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::Bib;

    fn record(bib: Bib) -> RawPublication {
        RawPublication {
            bib,
            ..Default::default()
        }
    }

    #[test]
    fn missing_year_is_zero() {
        let p = normalize(&record(Bib {
            title: Some("Untimed".into()),
            ..Default::default()
        }));
        assert_eq!(p.year, 0);
    }

    #[test]
    fn unparsable_year_is_zero() {
        assert_eq!(parse_year(Some("forthcoming")), 0);
        assert_eq!(parse_year(Some("")), 0);
        assert_eq!(parse_year(Some(" 2019 ")), 2019);
    }

    #[test]
    fn ieee_venue_beats_dataset_title() {
        for venue in ["IEEE Access", "Proc. ieee", "The IeEe Transactions"] {
            let p = normalize(&record(Bib {
                title: Some("A Dataset of Things".into()),
                venue: Some(venue.into()),
                ..Default::default()
            }));
            assert_eq!(p.kind, PublicationType::Journal, "venue {venue}");
        }
    }

    #[test]
    fn type_inference_order() {
        assert_eq!(infer_type(None, "Foo Dataset"), PublicationType::Dataset);
        assert_eq!(infer_type(None, "Foo"), PublicationType::Conference);
        assert_eq!(infer_type(Some("arXiv preprint"), "Foo"), PublicationType::Preprint);
        assert_eq!(
            infer_type(Some("arXiv preprint"), "Foo dataset"),
            PublicationType::Preprint
        );
        assert_eq!(infer_type(Some("Comm. of the ACM"), "x"), PublicationType::Journal);
        assert_eq!(
            infer_type(Some("Journal of arXiv Studies"), "x"),
            PublicationType::Journal
        );
    }

    #[test]
    fn type_inference_ignores_journal_fallback() {
        let p = normalize(&record(Bib {
            title: Some("Plain title".into()),
            journal: Some("Journal of Things".into()),
            ..Default::default()
        }));
        assert_eq!(p.venue, "Journal of Things");
        assert_eq!(p.kind, PublicationType::Conference);
    }

    #[test]
    fn authors_split_on_and() {
        assert_eq!(
            split_authors(Some("A. Smith and B. Jones")),
            vec!["A. Smith", "B. Jones"]
        );
        assert!(split_authors(Some("")).is_empty());
        assert!(split_authors(None).is_empty());
        assert_eq!(split_authors(Some("Solo")), vec!["Solo"]);
    }

    #[test]
    fn split_authors_keeps_every_token() {
        proptest::proptest!(|(names in proptest::collection::vec("[A-Z][a-z]{1,8}", 1..6))| {
            let joined = names.join(" and ");
            proptest::prop_assert_eq!(split_authors(Some(&joined)), names);
        })
    }

    #[test]
    fn eprint_link_type_follows_extension() {
        let mut raw = RawPublication {
            eprint_url: Some("https://example.org/paper.pdf".into()),
            ..Default::default()
        };
        let links = normalize(&raw).links;
        assert_eq!(
            links,
            vec![Link::new(LinkType::Pdf, "https://example.org/paper.pdf", "PDF")]
        );

        raw.eprint_url = Some("https://example.org/paper.html".into());
        let links = normalize(&raw).links;
        assert_eq!(links[0].kind, LinkType::Other);
        assert_eq!(links[0].label, "PDF");
    }

    #[test]
    fn doi_sets_field_and_link() {
        let p = normalize(&record(Bib {
            doi: Some("10.1/x".into()),
            ..Default::default()
        }));
        assert_eq!(p.doi.as_deref(), Some("10.1/x"));
        assert_eq!(
            p.links,
            vec![Link::new(LinkType::Doi, "https://doi.org/10.1/x", "DOI")]
        );
    }

    #[test]
    fn doi_is_trimmed_once_for_field_and_link() {
        let p = normalize(&record(Bib {
            doi: Some(" 10.1002/(SICI)1097<1661::AID> ".into()),
            ..Default::default()
        }));
        assert_eq!(p.doi.as_deref(), Some("10.1002/(SICI)1097<1661::AID>"));
        assert_eq!(
            p.links[0].url,
            "https://doi.org/10.1002/(SICI)1097%3C1661::AID%3E"
        );

        let blank = normalize(&record(Bib {
            doi: Some("   ".into()),
            ..Default::default()
        }));
        assert_eq!(blank.doi, None);
        assert!(blank.links.is_empty());
    }

    #[test]
    fn links_keep_fixed_order() {
        let raw = RawPublication {
            bib: Bib {
                doi: Some("10.1000/182".into()),
                ..Default::default()
            },
            pub_url: Some("https://example.org/view".into()),
            eprint_url: Some("https://example.org/e.pdf".into()),
            citedby_url: Some("/scholar?hl=en&cites=123".into()),
            ..Default::default()
        };
        let links = normalize(&raw).links;
        let kinds: Vec<_> = links.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![LinkType::Other, LinkType::Pdf, LinkType::Scholar, LinkType::Doi]
        );
        assert_eq!(links[0].label, "View Paper");
        assert_eq!(links[2].url, "https://scholar.google.com/scholar?hl=en&cites=123");
        assert_eq!(links[2].label, "Google Scholar");
    }

    #[test]
    fn id_uses_suffix_after_colon() {
        assert_eq!(publication_id(Some("hTwbmPUAAAAJ:u5HHmVD_uO8C")), "pub-u5HHmVD_uO8C");
        assert_eq!(publication_id(Some("nocolon")), "pub-nocolon");
        assert_eq!(publication_id(Some("")), "pub-");
        assert_eq!(publication_id(None), "pub-");
    }

    #[test]
    fn volume_and_page_info() {
        let p = normalize(&record(Bib {
            volume: Some("12".into()),
            number: Some("3".into()),
            pages: Some("1-10".into()),
            ..Default::default()
        }));
        assert_eq!(p.volume_info.as_deref(), Some("Vol. 12, No. 3"));
        assert_eq!(p.page_info.as_deref(), Some("pp. 1-10"));

        let p = normalize(&record(Bib {
            number: Some("7".into()),
            ..Default::default()
        }));
        assert_eq!(p.volume_info.as_deref(), Some("No. 7"));
        assert_eq!(p.page_info, None);

        let p = normalize(&record(Bib::default()));
        assert_eq!(p.volume_info, None);
    }

    #[test]
    fn defaults_and_constants() {
        let p = normalize(&RawPublication::default());
        assert_eq!(p.id, "pub-");
        assert_eq!(p.title, "");
        assert_eq!(p.venue, "");
        assert_eq!(p.abstract_, "");
        assert_eq!(p.citations, 0);
        assert_eq!(p.status, PublicationStatus::Published);
        assert!(!p.featured);
        assert!(p.links.is_empty());
    }

    #[test]
    fn serializes_with_output_key_names() {
        let raw = RawPublication {
            bib: Bib {
                title: Some("T".into()),
                volume: Some("1".into()),
                pages: Some("2".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let v = serde_json::to_value(normalize(&raw)).unwrap();
        assert_eq!(v["type"], "conference");
        assert_eq!(v["status"], "published");
        assert_eq!(v["volumeInfo"], "Vol. 1");
        assert_eq!(v["pageInfo"], "pp. 2");
        assert_eq!(v["abstract"], "");
        assert!(v.get("doi").is_none());
    }
}
