use anyhow::Context;

use crate::{
    document::{Document, Profile},
    publication::normalize,
    raw::{Author, RawPublication},
    report::Reporter,
    source::ProfileSource,
};

/// Everything one run produced.
pub struct Harvest {
    pub document: Document,
    /// Profile and the records that filled successfully, in profile order.
    pub raw: Author<RawPublication>,
    pub parsed: usize,
    pub skipped: usize,
}

/// Resolve `scholar_id`, then fill and normalize each of its publications in turn.
///
/// Failing to resolve the profile aborts the run. A publication whose details cannot be fetched is
/// reported and left out; the rest carry on.
pub fn harvest<S: ProfileSource>(
    source: &S,
    scholar_id: &str,
    reporter: &Reporter,
) -> anyhow::Result<Harvest> {
    let author = source
        .resolve(scholar_id)
        .with_context(|| format!("failed to resolve profile {scholar_id}"))?;
    reporter.profile(&author);
    tracing::info!(
        scholar_id,
        publications = author.publications.len(),
        "profile resolved"
    );

    reporter.start(author.publications.len());
    let mut filled = Vec::with_capacity(author.publications.len());
    let mut publications = Vec::with_capacity(author.publications.len());
    let mut skipped = 0;

    for (index, stub) in (1..).zip(&author.publications) {
        reporter.fetching(index);
        match source.fill(stub) {
            Ok(raw) => {
                let publication = normalize(&raw);
                reporter.parsed(index, &publication.title);
                publications.push(publication);
                filled.push(raw);
            }
            Err(err) => {
                tracing::debug!(index, error = ?err, "skipping publication");
                reporter.skipped(index, &err);
                skipped += 1;
            }
        }
    }

    let parsed = publications.len();
    Ok(Harvest {
        document: Document::new(Profile::from(&author), publications),
        raw: author.with_publications(filled),
        parsed,
        skipped,
    })
}
