use tracing::info;

use crate::fetcher;
use crate::leaders::{Biography, LeadersIndex};
use crate::parser::Extractor;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("expected {expected} biographies, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Counts reported after an enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichStats {
    pub total: usize,
    pub found: usize,
    pub unavailable: usize,
}

/// Write `biographies` into the index, position by position, in the same
/// order `LeadersIndex::wikipedia_urls` produced the requests.
///
/// The length is checked before anything is written.
pub fn merge(index: &mut LeadersIndex, biographies: Vec<Biography>) -> Result<(), MergeError> {
    let expected = index.leader_count();
    if biographies.len() != expected {
        return Err(MergeError::LengthMismatch {
            expected,
            actual: biographies.len(),
        });
    }
    for (leader, biography) in index.leaders_mut().zip(biographies) {
        leader.first_wiki_par = Some(biography);
    }
    Ok(())
}

/// Fetch every leader's page concurrently and store the result on the leader.
pub async fn enrich_all(
    index: &mut LeadersIndex,
    extractor: &Extractor,
    concurrency: usize,
) -> Result<EnrichStats, MergeError> {
    let urls = index.wikipedia_urls();
    let total = urls.len();
    info!("Fetching {} pages ({} at a time)", total, concurrency);

    let extractor = extractor.clone();
    let biographies = fetcher::fetch_all(urls, concurrency, move |url| {
        let extractor = extractor.clone();
        async move { extractor.first_paragraph(&url).await }
    })
    .await;

    let found = biographies.iter().filter(|b| b.is_available()).count();
    merge(index, biographies)?;

    let stats = EnrichStats {
        total,
        found,
        unavailable: total - found,
    };
    info!(
        "Enriched {} leaders ({} paragraphs, {} unavailable)",
        stats.total, stats.found, stats.unavailable
    );
    Ok(stats)
}
