use crate::types::Track;

/// Tracks whose title equals `keyword` exactly, in input order.
///
/// Comparison is case-sensitive and untrimmed; tracks without a title never
/// match.
pub fn matching_tracks<'a>(keyword: &str, tracks: &'a [Track]) -> Vec<&'a Track> {
    tracks
        .iter()
        .filter(|t| t.name.as_deref() == Some(keyword))
        .collect()
}

/// Ids of the tracks selected by [`matching_tracks`]. Duplicates are kept.
pub fn filter_exact(keyword: &str, tracks: &[Track]) -> Vec<String> {
    matching_tracks(keyword, tracks)
        .into_iter()
        .map(|t| t.id.clone())
        .collect()
}
