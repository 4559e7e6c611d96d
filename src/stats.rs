use std::collections::BTreeSet;

use serde::Serialize;

use crate::publication::{Publication, PublicationType};

/// Aggregate numbers over a publication list, as shown on a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_publications: usize,
    pub total_citations: u64,
    pub journal_count: usize,
    pub conference_count: usize,
    pub preprint_count: usize,
    pub dataset_count: usize,
    /// Rounded to the nearest integer; 0 for an empty list.
    pub average_citations: u64,
    /// Distinct years, newest first.
    pub years: Vec<i32>,
}

impl Stats {
    pub fn of(publications: &[Publication]) -> Self {
        let count = |kind| publications.iter().filter(|p| p.kind == kind).count();
        let total_publications = publications.len();
        let total_citations: u64 = publications.iter().map(|p| p.citations).sum();
        let average_citations = if total_publications > 0 {
            (total_citations as f64 / total_publications as f64).round() as u64
        } else {
            0
        };
        let years: BTreeSet<i32> = publications.iter().map(|p| p.year).collect();

        Stats {
            total_publications,
            total_citations,
            journal_count: count(PublicationType::Journal),
            conference_count: count(PublicationType::Conference),
            preprint_count: count(PublicationType::Preprint),
            dataset_count: count(PublicationType::Dataset),
            average_citations,
            years: years.into_iter().rev().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        publication::normalize,
        raw::{Bib, RawPublication},
    };

    fn publication(venue: &str, title: &str, year: &str, citations: u64) -> Publication {
        normalize(&RawPublication {
            bib: Bib {
                venue: Some(venue.into()),
                title: Some(title.into()),
                pub_year: Some(year.into()),
                ..Default::default()
            },
            num_citations: Some(citations),
            ..Default::default()
        })
    }

    #[test]
    fn empty_list() {
        let stats = Stats::of(&[]);
        assert_eq!(stats.total_publications, 0);
        assert_eq!(stats.average_citations, 0);
        assert!(stats.years.is_empty());
    }

    #[test]
    fn counts_types_and_rounds_average() {
        let pubs = vec![
            publication("IEEE Access", "A", "2021", 10),
            publication("arXiv preprint", "B", "2022", 3),
            publication("", "C dataset", "2021", 0),
            publication("NeurIPS", "D", "2019", 2),
        ];
        let stats = Stats::of(&pubs);
        assert_eq!(stats.total_publications, 4);
        assert_eq!(stats.total_citations, 15);
        assert_eq!(
            (
                stats.journal_count,
                stats.preprint_count,
                stats.dataset_count,
                stats.conference_count
            ),
            (1, 1, 1, 1)
        );
        // 15 / 4 = 3.75
        assert_eq!(stats.average_citations, 4);
        assert_eq!(stats.years, vec![2022, 2021, 2019]);
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(Stats::of(&[])).unwrap();
        assert!(v.get("totalPublications").is_some());
        assert!(v.get("averageCitations").is_some());
    }
}
