use crate::{
    spotify::{Catalog, MAX_TRACKS_PER_REQUEST},
    success, warning,
};

/// Result of [`build_playlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Playlist created and every batch added.
    Completed {
        playlist_id: String,
        added: usize,
        batches: usize,
    },
    /// Playlist creation failed; nothing was added.
    CreateFailed { reason: String },
    /// Playlist created but a batch failed; later batches were not sent.
    Partial {
        playlist_id: String,
        added: usize,
        failed_batch: usize,
        reason: String,
    },
}

impl BuildOutcome {
    pub fn playlist_id(&self) -> Option<&str> {
        match self {
            BuildOutcome::Completed { playlist_id, .. }
            | BuildOutcome::Partial { playlist_id, .. } => Some(playlist_id),
            BuildOutcome::CreateFailed { .. } => None,
        }
    }

    pub fn added(&self) -> usize {
        match self {
            BuildOutcome::Completed { added, .. } | BuildOutcome::Partial { added, .. } => *added,
            BuildOutcome::CreateFailed { .. } => 0,
        }
    }
}

/// Creates a playlist for `username` and fills it with `ids` in batches of
/// at most 100, preserving order.
///
/// An empty id list yields an empty playlist and no add-tracks requests.
/// Errors are logged and end the build early; a playlist that was already
/// created is left in place.
pub async fn build_playlist<C>(
    catalog: &C,
    username: &str,
    playlist_name: &str,
    ids: &[String],
) -> BuildOutcome
where
    C: Catalog + ?Sized,
{
    let playlist_id = match catalog.create_playlist(username, playlist_name).await {
        Ok(resp) => {
            success!("Playlist \"{}\" created.", playlist_name);
            resp.id
        }
        Err(e) => {
            warning!("Failed to create playlist: {}", e);
            return BuildOutcome::CreateFailed {
                reason: e.to_string(),
            };
        }
    };

    let mut added = 0;
    let mut batches = 0;
    for (index, chunk) in ids.chunks(MAX_TRACKS_PER_REQUEST).enumerate() {
        match catalog.add_tracks(username, &playlist_id, chunk).await {
            Ok(_) => {
                added += chunk.len();
                batches += 1;
            }
            Err(e) => {
                warning!("Failed to add tracks to playlist: {}", e);
                return BuildOutcome::Partial {
                    playlist_id,
                    added,
                    failed_batch: index,
                    reason: e.to_string(),
                };
            }
        }
    }

    BuildOutcome::Completed {
        playlist_id,
        added,
        batches,
    }
}
