use crate::{
    spotify::{MAX_TRACKS_PER_REQUEST, SpotifyClient, SpotifyError},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
    utils,
};

/// Creates a new, empty playlist for a user.
///
/// The playlist is public, not collaborative, and carries a short description
/// naming the keyword it was built from.
///
/// # Arguments
///
/// * `client` - Authenticated client
/// * `username` - Spotify user id that will own the playlist
/// * `name` - Playlist name
///
/// # Returns
///
/// Returns the created playlist's id and name, or a [`SpotifyError`] when the
/// request fails or the service rejects it.
///
/// # Example
///
/// ```
/// let playlist = create(&client, "alice", "Fall").await?;
/// println!("Created playlist {}", playlist.id);
/// ```
pub async fn create(
    client: &SpotifyClient,
    username: &str,
    name: &str,
) -> Result<CreatePlaylistResponse, SpotifyError> {
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: format!("Tracks titled exactly \"{}\"", name),
        public: true,
        collaborative: false,
    };

    let response = client
        .http()
        .post(client.endpoint(&["users", username, "playlists"])?)
        .bearer_auth(client.access_token())
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json::<CreatePlaylistResponse>().await?)
}

/// Appends tracks to the end of a playlist.
///
/// Track ids are converted to `spotify:track:` URIs. The service accepts at
/// most 100 items per request; larger slices are rejected before any request
/// is sent.
///
/// # Arguments
///
/// * `client` - Authenticated client
/// * `_username` - Owner of the playlist; the endpoint addresses the playlist
///   directly so the owner is not part of the request
/// * `playlist_id` - Target playlist
/// * `ids` - Track ids, in the order they should appear
///
/// # Errors
///
/// - [`SpotifyError::BatchTooLarge`] when `ids` holds more than 100 entries
/// - [`SpotifyError::Http`] for network errors and non-success statuses
pub async fn add_tracks(
    client: &SpotifyClient,
    _username: &str,
    playlist_id: &str,
    ids: &[String],
) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
    let body = add_tracks_request(ids)?;

    let response = client
        .http()
        .post(client.endpoint(&["playlists", playlist_id, "tracks"])?)
        .bearer_auth(client.access_token())
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json::<AddTrackToPlaylistResponse>().await?)
}

pub(crate) fn add_tracks_request(
    ids: &[String],
) -> Result<AddTrackToPlaylistRequest, SpotifyError> {
    if ids.len() > MAX_TRACKS_PER_REQUEST {
        return Err(SpotifyError::BatchTooLarge(ids.len()));
    }

    Ok(AddTrackToPlaylistRequest {
        uris: ids.iter().map(|id| utils::track_uri(id)).collect(),
    })
}
