//! # Matching Workflow
//!
//! The search, filter and build stages that turn a keyword into a playlist,
//! and the orchestrator that runs them in sequence.
//!
//! ```text
//! keyword ──> collect_tracks ──> filter_exact ──> build_playlist
//!             (20 pages × 50)    (exact title)    (create + 100-id batches)
//! ```
//!
//! Each stage reports what happened through its return value
//! ([`SearchOutcome`], [`BuildOutcome`]) in addition to the console output,
//! so callers can tell a search that failed from one that found nothing.

mod collect;
mod filter;
mod playlist;

pub use collect::{
    MAX_RESULTS, PAGE_SIZE, PageFailure, SearchOutcome, collect_tracks, page_offsets,
};
pub use filter::{filter_exact, matching_tracks};
pub use playlist::{BuildOutcome, build_playlist};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Config,
    info,
    spotify::{self, Catalog, SpotifyClient, SpotifyError},
};

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub search: SearchOutcome,
    pub matched_ids: Vec<String>,
    pub build: BuildOutcome,
}

/// Builds a playlist named `keyword` from the tracks titled exactly `keyword`.
///
/// Authorizes with the credentials in `config`, then searches the first
/// 1000 results in `config.market`, keeps the exact title matches and adds
/// them to a new playlist owned by `config.username`.
///
/// # Errors
///
/// Only authorization failures are returned. Failed search pages and failed
/// playlist requests are logged and reported in the [`RunReport`].
pub async fn make_playlist_by_perfect_matching(
    keyword: &str,
    config: &Config,
) -> Result<RunReport, SpotifyError> {
    let token = spotify::auth::authorize(config).await?;
    let client = SpotifyClient::from_config(config, &token);
    Ok(run_with_catalog(&client, keyword, config).await)
}

/// Runs search, filter and build against an already authorized catalog.
pub async fn run_with_catalog<C>(catalog: &C, keyword: &str, config: &Config) -> RunReport
where
    C: Catalog + ?Sized,
{
    let search = search_with_progress(catalog, keyword, &config.market).await;
    let matched_ids = filter_exact(keyword, &search.tracks);

    info!(
        "{} of {} tracks are titled exactly \"{}\"",
        matched_ids.len(),
        search.tracks.len(),
        keyword
    );

    let build = build_playlist(catalog, &config.username, keyword, &matched_ids).await;

    RunReport {
        search,
        matched_ids,
        build,
    }
}

/// Runs the search stage behind a console progress bar.
pub async fn search_with_progress<C>(catalog: &C, keyword: &str, market: &str) -> SearchOutcome
where
    C: Catalog + ?Sized,
{
    let pb = search_progress();
    let search = collect_tracks(catalog, keyword, market, &pb).await;
    pb.finish_and_clear();
    search
}

fn search_progress() -> ProgressBar {
    let pages = (MAX_RESULTS / PAGE_SIZE) as u64;
    let pb = ProgressBar::new(pages);
    let template = "{spinner:.blue} [{bar:20.blue}] {pos}/{len} {msg}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏").progress_chars("=> "));
    }
    pb
}
