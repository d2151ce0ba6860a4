use tabled::Table;

use crate::{
    config::Config,
    error, info,
    matching::{self, SearchOutcome},
    spotify::{self, SpotifyClient},
    utils, warning,
};

/// Lists the exact matches for `keyword` without creating a playlist.
pub async fn search(keyword: String, config: &Config) {
    let token = match spotify::auth::authorize(config).await {
        Ok(token) => token,
        Err(e) => error!("Authorization failed. Err: {}", e),
    };
    let client = SpotifyClient::from_config(config, &token);

    let outcome = matching::search_with_progress(&client, &keyword, &config.market).await;
    report_failed_pages(&outcome);

    let matches = matching::matching_tracks(&keyword, &outcome.tracks);
    if matches.is_empty() {
        info!(
            "None of {} tracks is titled exactly \"{}\"",
            outcome.tracks.len(),
            keyword
        );
        return;
    }

    let rows = utils::track_table_rows(&matches);
    println!("{}", Table::new(rows));
}

pub(crate) fn report_failed_pages(outcome: &SearchOutcome) {
    if !outcome.is_complete() {
        let offsets: Vec<String> = outcome
            .failed_pages
            .iter()
            .map(|p| p.offset.to_string())
            .collect();
        warning!(
            "{} search page(s) failed (offsets {}); results may be incomplete",
            outcome.failed_pages.len(),
            offsets.join(", ")
        );
    }
}
