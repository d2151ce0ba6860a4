use crate::{
    spotify::{MAX_SEARCH_LIMIT, SpotifyClient, SpotifyError},
    types::{SearchItem, SearchResponse, Track},
};

/// Retrieves one page of track search results from the Spotify Web API.
///
/// Issues a single `GET /search` request with `type=track`. The query is sent
/// as given, so field filters such as `track:<title>` are honoured by the
/// service. Results are restricted to tracks playable in `market`.
///
/// # Arguments
///
/// * `client` - Authenticated client
/// * `query` - Search query, e.g. `track:Fall`
/// * `market` - ISO 3166-1 alpha-2 country code, e.g. `JP`
/// * `limit` - Page size, clamped to 1-50
/// * `offset` - Index of the first result to return
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Vec<Track>)` - Tracks on this page (possibly fewer than `limit`)
/// - `Err(SpotifyError)` - Network error, non-success status, or malformed body
///
/// # Null Items
///
/// The service occasionally returns `null` entries in `tracks.items`, or
/// entries whose `id` is `null` (local files). Both are dropped rather than
/// failing the whole page.
///
/// # Example
///
/// ```
/// let tracks = search_tracks(&client, "track:Fall", "JP", 50, 0).await?;
/// println!("Page holds {} tracks", tracks.len());
/// ```
pub async fn search_tracks(
    client: &SpotifyClient,
    query: &str,
    market: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<Track>, SpotifyError> {
    let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();
    let offset = offset.to_string();

    let response = client
        .http()
        .get(client.endpoint(&["search"])?)
        .bearer_auth(client.access_token())
        .query(&[
            ("q", query),
            ("type", "track"),
            ("limit", limit.as_str()),
            ("market", market),
            ("offset", offset.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body = response.text().await?;
    parse_search_response(&body)
}

pub(crate) fn parse_search_response(body: &str) -> Result<Vec<Track>, SpotifyError> {
    let json: SearchResponse = serde_json::from_str(body)?;
    Ok(json
        .tracks
        .items
        .into_iter()
        .flatten()
        .filter_map(SearchItem::into_track)
        .collect())
}
