use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::{ProfileSource, html};
use crate::{
    error::FetchError,
    publication::SCHOLAR_BASE,
    raw::{Author, RawPublication},
};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.10 Safari/605.1.1";

/// Scholar never returns more than this many rows per profile request.
pub const MAX_PAGE_SIZE: u16 = 100;

#[derive(Debug, Clone)]
pub struct ScholarConfig {
    pub host: Url,
    pub timeout: Duration,
    pub page_size: u16,
}

impl Default for ScholarConfig {
    fn default() -> Self {
        ScholarConfig {
            host: SCHOLAR_BASE.clone(),
            timeout: Duration::from_secs(20),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Scrapes profile and citation pages straight from Google Scholar.
///
/// One request for the profile listing, then one per publication on `fill`. Requests are made
/// sequentially; there is no retry, and a bot-check page is reported as a missing profile.
pub struct ScholarSource {
    agent: ureq::Agent,
    config: ScholarConfig,
}

impl ScholarSource {
    pub fn new(config: ScholarConfig) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(5)))
            .timeout_global(Some(config.timeout))
            .build();
        ScholarSource {
            agent: ureq::Agent::new_with_config(cfg),
            config,
        }
    }

    fn get(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!(%url, "GET");
        let http = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        self.agent
            .get(url.as_str())
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.8")
            .call()
            .map_err(http)?
            .into_body()
            .read_to_string()
            .map_err(http)
    }

    fn profile_url(&self, scholar_id: &str) -> Result<Url, FetchError> {
        let mut url = self.config.host.join("/citations")?;
        url.query_pairs_mut()
            .append_pair("user", scholar_id)
            .append_pair("hl", "en")
            .append_pair("cstart", "0")
            .append_pair("pagesize", &self.config.page_size.min(MAX_PAGE_SIZE).to_string());
        Ok(url)
    }

    fn citation_url(&self, author_pub_id: &str) -> Result<Url, FetchError> {
        let mut url = self.config.host.join("/citations")?;
        url.query_pairs_mut()
            .append_pair("view_op", "view_citation")
            .append_pair("hl", "en")
            .append_pair("citation_for_view", author_pub_id);
        Ok(url)
    }
}

impl ProfileSource for ScholarSource {
    type Stub = RawPublication;

    fn resolve(&self, scholar_id: &str) -> Result<Author<RawPublication>, FetchError> {
        let url = self.profile_url(scholar_id)?;
        let page = match self.get(&url) {
            Err(FetchError::Http {
                source: ureq::Error::StatusCode(404),
                ..
            }) => return Err(FetchError::ProfileNotFound(scholar_id.to_string())),
            other => other?,
        };
        parse_profile_page(&page, scholar_id, &self.config.host)
    }

    fn fill(&self, stub: &RawPublication) -> Result<RawPublication, FetchError> {
        let id = stub
            .author_pub_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| FetchError::Layout("publication row without a citation id".into()))?;
        let page = self.get(&self.citation_url(id)?)?;
        parse_citation_page(&page, stub)
    }
}

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div\b[^>]*\bid="gsc_prf_in"[^>]*>(.*?)</div>"#).unwrap());
static AFFILIATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div\b[^>]*\bclass="gsc_prf_il"[^>]*>(.*?)</div>"#).unwrap());
static METRIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<td\b[^>]*\bclass="gsc_rsb_std"[^>]*>(.*?)</td>"#).unwrap());
static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<tr\b[^>]*\bclass="gsc_a_tr"[^>]*>(.*?)</tr>"#).unwrap());
static ROW_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(<a\b[^>]*\bclass="gsc_a_at"[^>]*>)(.*?)</a>"#).unwrap()
});
static ROW_CITED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bclass="gsc_a_ac\b[^"]*"[^>]*>(.*?)</a>"#).unwrap()
});
static ROW_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*\bclass="gsc_a_h\b[^"]*"[^>]*>(.*?)</span>"#).unwrap()
});
static GRAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div\b[^>]*\bclass="gs_gray"[^>]*>(.*?)</div>"#).unwrap());
static TRAILING_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\d{4}\s*$").unwrap());

/// Profile header, metrics and the publication table of a `citations?user=` page.
pub fn parse_profile_page(
    page: &str,
    scholar_id: &str,
    host: &Url,
) -> Result<Author<RawPublication>, FetchError> {
    let name = NAME_RE
        .captures(page)
        .map(|c| html::text(&c[1]))
        .filter(|n| !n.is_empty())
        .ok_or_else(|| FetchError::ProfileNotFound(scholar_id.to_string()))?;

    let affiliation = AFFILIATION_RE
        .captures(page)
        .map(|c| html::text(&c[1]))
        .unwrap_or_default();

    // Cells come in (all, since) pairs: citations, h-index, i10-index.
    let metrics: Vec<u64> = METRIC_RE
        .captures_iter(page)
        .map(|c| html::text(&c[1]).parse().unwrap_or(0))
        .collect();
    let metric = |i: usize| metrics.get(i).copied().unwrap_or(0);

    let publications = ROW_RE
        .captures_iter(page)
        .filter_map(|c| parse_row(&c[1], host))
        .collect();

    Ok(Author {
        scholar_id: scholar_id.to_string(),
        name,
        affiliation,
        citedby: metric(0),
        hindex: metric(2),
        i10index: metric(4),
        publications,
    })
}

fn parse_row(row: &str, host: &Url) -> Option<RawPublication> {
    let title = ROW_TITLE_RE.captures(row)?;
    let tag = title.get(1)?.as_str();
    let href = html::attr(tag, "href").or_else(|| html::attr(tag, "data-href"))?;
    let author_pub_id = query_param(host, &href, "citation_for_view");
    if author_pub_id.is_none() {
        tracing::warn!(%href, "publication row without citation_for_view");
    }

    let mut raw = RawPublication {
        author_pub_id,
        num_citations: ROW_CITED_RE
            .captures(row)
            .and_then(|c| html::text(&c[1]).parse().ok()),
        ..Default::default()
    };
    raw.bib.title = Some(html::text(&title[2]));
    raw.bib.pub_year = ROW_YEAR_RE
        .captures(row)
        .map(|c| html::text(&c[1]))
        .filter(|y| !y.is_empty());
    // First gray line is a truncated author list, second the venue with its year appended.
    raw.bib.venue = GRAY_RE
        .captures_iter(row)
        .nth(1)
        .map(|c| TRAILING_YEAR_RE.replace(&html::text(&c[1]), "").trim().to_string())
        .filter(|v| !v.is_empty());
    Some(raw)
}

static DETAIL_TITLE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(<a\b[^>]*\bclass="gsc_oci_title_link"[^>]*>)(.*?)</a>"#).unwrap()
});
static DETAIL_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div\b[^>]*\bid="gsc_oci_title"[^>]*>(.*?)</div>"#).unwrap());
static EPRINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*\bclass="gsc_oci_title_ggi"[^>]*>.*?(<a\b[^>]*>)"#).unwrap()
});
static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<div\b[^>]*\bclass="gsc_oci_field"[^>]*>(.*?)</div>\s*<div\b[^>]*\bclass="gsc_oci_value"[^>]*>"#,
    )
    .unwrap()
});
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)(<a\b[^>]*>)(.*?)</a>"#).unwrap());
static CITED_BY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cited by\s+(\d+)").unwrap());

/// Merge a `view_citation` page over the stub taken from the profile table.
pub fn parse_citation_page(page: &str, stub: &RawPublication) -> Result<RawPublication, FetchError> {
    let mut raw = stub.clone();

    if let Some(c) = DETAIL_TITLE_LINK_RE.captures(page) {
        raw.pub_url = html::attr(&c[1], "href").filter(|u| !u.is_empty());
        raw.bib.title = Some(html::text(&c[2]));
    } else if let Some(c) = DETAIL_TITLE_RE.captures(page) {
        raw.bib.title = Some(html::text(&c[1]));
    } else {
        return Err(FetchError::Layout("citation page has no title".into()));
    }

    raw.eprint_url = EPRINT_RE
        .captures(page)
        .and_then(|c| html::attr(&c[1], "href"))
        .filter(|u| !u.is_empty());

    for c in FIELD_RE.captures_iter(page) {
        let field = html::text(&c[1]).to_ascii_lowercase();
        // Values nest their own blocks (one per abstract paragraph), so take the whole block.
        let value_html = html::div_inner(page, c.get(0).map_or(0, |m| m.end()));
        let value = html::text(value_html);
        let bib = &mut raw.bib;
        match field.as_str() {
            "authors" | "inventors" => {
                let names: Vec<&str> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .collect();
                bib.author = Some(names.join(" and "));
            }
            "publication date" => {
                let year: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
                if !year.is_empty() {
                    bib.pub_year = Some(year);
                }
            }
            "journal" | "conference" | "book" | "source" => {
                if bib.journal.is_none() {
                    bib.journal = Some(value);
                }
            }
            "volume" => bib.volume = Some(value),
            "issue" => bib.number = Some(value),
            "pages" => bib.pages = Some(value),
            "description" => bib.abstract_ = Some(value),
            "doi" => bib.doi = Some(value),
            "total citations" => {
                if let Some(count) = CITED_BY_RE.captures(&value).and_then(|c| c[1].parse().ok()) {
                    raw.num_citations = Some(count);
                }
                raw.citedby_url = ANCHOR_RE
                    .captures(value_html)
                    .and_then(|a| html::attr(&a[1], "href"))
                    .and_then(|href| query_param(&SCHOLAR_BASE, &href, "cites"))
                    .map(|cites| format!("/scholar?hl=en&cites={cites}"));
            }
            _ => {}
        }
    }

    Ok(raw)
}

fn query_param(base: &Url, href: &str, key: &str) -> Option<String> {
    let url = base.join(href).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
