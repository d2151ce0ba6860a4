use crate::{
    cli::search::report_failed_pages,
    config::Config,
    error,
    matching::{self, BuildOutcome},
    success, warning,
};

pub async fn playlist(keyword: String, config: &Config) {
    let report = match matching::make_playlist_by_perfect_matching(&keyword, config).await {
        Ok(report) => report,
        Err(e) => error!("Authorization failed. Err: {}", e),
    };

    report_failed_pages(&report.search);

    match report.build {
        BuildOutcome::Completed { added, batches, .. } => success!(
            "Playlist \"{}\" holds {} tracks ({} request(s))",
            keyword,
            added,
            batches
        ),
        BuildOutcome::Partial {
            added,
            failed_batch,
            reason,
            ..
        } => warning!(
            "Playlist \"{}\" is incomplete: {} of {} tracks added, batch {} failed: {}",
            keyword,
            added,
            report.matched_ids.len(),
            failed_batch + 1,
            reason
        ),
        BuildOutcome::CreateFailed { reason } => {
            warning!("Playlist \"{}\" was not created: {}", keyword, reason)
        }
    }
}
