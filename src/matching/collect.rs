use indicatif::ProgressBar;

use crate::{spotify::Catalog, types::Track, utils, warning};

/// Number of tracks requested per search page.
pub const PAGE_SIZE: u32 = 50;

/// Upper bound on search results collected per keyword.
pub const MAX_RESULTS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub offset: u32,
    pub reason: String,
}

/// Tracks gathered by [`collect_tracks`] together with the pages that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub tracks: Vec<Track>,
    pub failed_pages: Vec<PageFailure>,
}

impl SearchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }
}

/// Offsets requested for one keyword: 0, 50, ..., 950.
pub fn page_offsets() -> impl Iterator<Item = u32> {
    (0..MAX_RESULTS).step_by(PAGE_SIZE as usize)
}

/// Searches the catalog for tracks titled `keyword`.
///
/// Always requests all twenty pages, even after a short or empty page. A page
/// that fails is logged, recorded in the outcome and treated as empty; it is
/// not retried.
pub async fn collect_tracks<C>(
    catalog: &C,
    keyword: &str,
    market: &str,
    progress: &ProgressBar,
) -> SearchOutcome
where
    C: Catalog + ?Sized,
{
    let query = utils::build_search_query(keyword);
    let mut outcome = SearchOutcome::default();

    for offset in page_offsets() {
        progress.set_message(format!("Searching \"{}\" (offset {})", keyword, offset));

        match catalog
            .search_tracks(&query, market, PAGE_SIZE, offset)
            .await
        {
            Ok(tracks) => outcome.tracks.extend(tracks),
            Err(e) => {
                progress.suspend(|| warning!("offset:{} {}", offset, e));
                outcome.failed_pages.push(PageFailure {
                    offset,
                    reason: e.to_string(),
                });
            }
        }

        progress.inc(1);
    }

    outcome
}
