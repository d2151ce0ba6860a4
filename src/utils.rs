use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};

use crate::types::{Track, TrackTableRow};

const TRACK_URI_PREFIX: &str = "spotify:track:";

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Field-scoped search query for track titles.
pub fn build_search_query(keyword: &str) -> String {
    format!("track:{}", keyword)
}

pub fn track_uri(id: &str) -> String {
    if id.starts_with(TRACK_URI_PREFIX) {
        return id.to_string();
    }
    format!("{}{}", TRACK_URI_PREFIX, id)
}

pub fn now_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

pub fn track_table_rows(tracks: &[&Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            id: t.id.clone(),
            name: t.name.clone().unwrap_or_default(),
        })
        .collect()
}
