use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use matchlist::{
    config::Config,
    matching::{self, BuildOutcome, filter_exact},
    spotify::{Catalog, SpotifyError},
    types::{AddTrackToPlaylistResponse, CreatePlaylistResponse, Track},
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Search {
        query: String,
        market: String,
        limit: u32,
        offset: u32,
    },
    Create {
        username: String,
        name: String,
    },
    Add {
        playlist_id: String,
        ids: Vec<String>,
    },
}

// Catalog fake that serves canned pages by offset and records every call.
#[derive(Default)]
struct RecordingCatalog {
    pages: HashMap<u32, Vec<Track>>,
    failing_offsets: Vec<u32>,
    fail_create: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingCatalog {
    fn with_page(mut self, offset: u32, tracks: Vec<Track>) -> Self {
        self.pages.insert(offset, tracks);
        self
    }

    fn failing_at(mut self, offset: u32) -> Self {
        self.failing_offsets.push(offset);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn search_offsets(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Search { offset, .. } => Some(offset),
                _ => None,
            })
            .collect()
    }

    fn added_batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Add { ids, .. } => Some(ids),
                _ => None,
            })
            .collect()
    }
}

fn failure() -> SpotifyError {
    SpotifyError::Json(serde_json::from_str::<serde_json::Value>("not json").unwrap_err())
}

#[async_trait]
impl Catalog for RecordingCatalog {
    async fn search_tracks(
        &self,
        query: &str,
        market: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        self.calls.lock().unwrap().push(Call::Search {
            query: query.to_string(),
            market: market.to_string(),
            limit,
            offset,
        });

        if self.failing_offsets.contains(&offset) {
            return Err(failure());
        }
        Ok(self.pages.get(&offset).cloned().unwrap_or_default())
    }

    async fn create_playlist(
        &self,
        username: &str,
        name: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        self.calls.lock().unwrap().push(Call::Create {
            username: username.to_string(),
            name: name.to_string(),
        });

        if self.fail_create {
            return Err(failure());
        }
        Ok(CreatePlaylistResponse {
            id: "playlist-1".to_string(),
            name: name.to_string(),
        })
    }

    async fn add_tracks(
        &self,
        _username: &str,
        playlist_id: &str,
        ids: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        self.calls.lock().unwrap().push(Call::Add {
            playlist_id: playlist_id.to_string(),
            ids: ids.to_vec(),
        });

        if ids.len() > 100 {
            return Err(SpotifyError::BatchTooLarge(ids.len()));
        }
        Ok(AddTrackToPlaylistResponse {
            snapshot_id: "snapshot".to_string(),
        })
    }
}

fn config() -> Config {
    Config::from_lookup(|key| match key {
        "SPOTIFY_USERNAME" => Some("alice".to_string()),
        _ => None,
    })
}

fn titled(prefix: &str, n: usize, name: &str) -> Vec<Track> {
    (0..n)
        .map(|i| Track::new(&format!("{}{}", prefix, i), name))
        .collect()
}

#[tokio::test]
async fn test_exact_match_scenario() {
    let catalog = RecordingCatalog::default().with_page(
        0,
        vec![
            Track::new("a", "Fall"),
            Track::new("b", "Falling"),
            Track::new("c", "fall"),
        ],
    );

    let report = matching::run_with_catalog(&catalog, "Fall", &config()).await;

    assert_eq!(report.search.tracks.len(), 3);
    assert_eq!(report.matched_ids, vec!["a"]);
    assert_eq!(report.build, BuildOutcome::Completed {
        playlist_id: "playlist-1".to_string(),
        added: 1,
        batches: 1,
    });

    let calls = catalog.calls();
    assert_eq!(calls.len(), 22);
    assert_eq!(calls[20], Call::Create {
        username: "alice".to_string(),
        name: "Fall".to_string(),
    });
    assert_eq!(calls[21], Call::Add {
        playlist_id: "playlist-1".to_string(),
        ids: vec!["a".to_string()],
    });
}

#[tokio::test]
async fn test_no_results_creates_empty_playlist() {
    let catalog = RecordingCatalog::default();

    let report = matching::run_with_catalog(&catalog, "Echo", &config()).await;

    assert!(report.search.tracks.is_empty());
    assert!(report.search.is_complete());
    assert!(report.matched_ids.is_empty());
    assert_eq!(report.build.added(), 0);
    assert!(catalog.added_batches().is_empty());
    assert!(catalog.calls().contains(&Call::Create {
        username: "alice".to_string(),
        name: "Echo".to_string(),
    }));
}

#[tokio::test]
async fn test_search_requests_exactly_twenty_pages() {
    // short pages never stop the pagination early
    let catalog = RecordingCatalog::default()
        .with_page(0, titled("x", 3, "Echo"))
        .with_page(50, Vec::new());

    matching::run_with_catalog(&catalog, "Echo", &config()).await;

    let expected: Vec<u32> = (0..20).map(|i| i * 50).collect();
    assert_eq!(catalog.search_offsets(), expected);
    assert!(catalog.search_offsets().iter().all(|o| *o < 1000));

    for call in catalog.calls() {
        if let Call::Search {
            query,
            market,
            limit,
            ..
        } = call
        {
            assert_eq!(query, "track:Echo");
            assert_eq!(market, "JP");
            assert_eq!(limit, 50);
        }
    }
}

#[tokio::test]
async fn test_failed_page_is_isolated() {
    let catalog = RecordingCatalog::default()
        .with_page(100, titled("p", 2, "Echo"))
        .with_page(200, titled("q", 2, "Echo"))
        .failing_at(150);

    let report = matching::run_with_catalog(&catalog, "Echo", &config()).await;

    let offsets = catalog.search_offsets();
    assert_eq!(offsets.len(), 20);
    assert!((200..1000).step_by(50).all(|o| offsets.contains(&o)));

    assert_eq!(report.matched_ids, vec!["p0", "p1", "q0", "q1"]);
    assert_eq!(report.search.failed_pages.len(), 1);
    assert_eq!(report.search.failed_pages[0].offset, 150);
}

#[tokio::test]
async fn test_batches_of_one_hundred() {
    let tracks = titled("t", 250, "Echo");
    let catalog = RecordingCatalog::default()
        .with_page(0, tracks[..50].to_vec())
        .with_page(50, tracks[50..100].to_vec())
        .with_page(100, tracks[100..150].to_vec())
        .with_page(150, tracks[150..200].to_vec())
        .with_page(200, tracks[200..].to_vec());

    let report = matching::run_with_catalog(&catalog, "Echo", &config()).await;

    let batches = catalog.added_batches();
    let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    // concatenated batches reproduce the matched ids in order
    let rebuilt: Vec<String> = batches.into_iter().flatten().collect();
    assert_eq!(rebuilt, report.matched_ids);
    assert_eq!(rebuilt.len(), 250);
}

#[tokio::test]
async fn test_duplicates_across_pages_are_kept() {
    // the same track returned on two pages is added twice; ids are not deduplicated
    let catalog = RecordingCatalog::default()
        .with_page(0, vec![Track::new("dup", "Echo")])
        .with_page(50, vec![Track::new("dup", "Echo")]);

    let report = matching::run_with_catalog(&catalog, "Echo", &config()).await;

    assert_eq!(report.matched_ids, vec!["dup", "dup"]);
    assert_eq!(catalog.added_batches(), vec![vec![
        "dup".to_string(),
        "dup".to_string()
    ]]);
}

#[tokio::test]
async fn test_create_failure_skips_adding() {
    let catalog = RecordingCatalog {
        fail_create: true,
        ..RecordingCatalog::default()
    }
    .with_page(0, vec![Track::new("a", "Echo")]);

    let report = matching::run_with_catalog(&catalog, "Echo", &config()).await;

    assert!(matches!(report.build, BuildOutcome::CreateFailed { .. }));
    assert_eq!(report.matched_ids, vec!["a"]);
    assert!(catalog.added_batches().is_empty());
}

#[tokio::test]
async fn test_market_comes_from_config() {
    let catalog = RecordingCatalog::default();
    let config = Config {
        market: "US".to_string(),
        ..config()
    };

    matching::run_with_catalog(&catalog, "Echo", &config).await;

    assert!(catalog.calls().iter().all(|c| match c {
        Call::Search { market, .. } => market == "US",
        _ => true,
    }));
}

#[test]
fn test_filter_is_idempotent() {
    let tracks = vec![
        Track::new("a", "Echo"),
        Track::new("b", "ECHO"),
        Track::new("c", "Echo"),
        Track::new("d", "Echoes"),
    ];

    let first = filter_exact("Echo", &tracks);
    let second = filter_exact("Echo", &tracks);
    assert_eq!(first, vec!["a", "c"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_credentials_end_the_run() {
    let config = Config::from_lookup(|key| match key {
        "SPOTIFY_USERNAME" => Some("matchlist-test-user-without-cached-token".to_string()),
        "SPOTIFY_SCOPE" => Some("playlist-modify-public".to_string()),
        _ => None,
    });

    let result = matching::make_playlist_by_perfect_matching("Echo", &config).await;

    match result {
        Err(SpotifyError::Auth(msg)) => assert!(msg.contains("SPOTIFY_CLIENT_ID")),
        other => panic!("expected an authorization error, got {:?}", other.map(|_| ())),
    }
}
