use matchlist::types::Track;
use matchlist::utils::*;

#[test]
fn test_generate_state() {
    let state = generate_state();

    // Should be exactly 32 characters
    assert_eq!(state.len(), 32);

    // Should contain only alphanumeric characters
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated states should be different
    let state2 = generate_state();
    assert_ne!(state, state2);
}

#[test]
fn test_build_search_query() {
    assert_eq!(build_search_query("Fall"), "track:Fall");
    assert_eq!(build_search_query("秋"), "track:秋");

    // keyword is embedded verbatim, including spaces
    assert_eq!(build_search_query("Let It Be"), "track:Let It Be");
}

#[test]
fn test_track_uri() {
    assert_eq!(track_uri("4uLU6hMCjMI75M1A2tKUQC"), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");

    // already prefixed ids are left alone
    assert_eq!(
        track_uri("spotify:track:4uLU6hMCjMI75M1A2tKUQC"),
        "spotify:track:4uLU6hMCjMI75M1A2tKUQC"
    );
}

#[test]
fn test_track_table_rows() {
    let a = Track::new("a", "Fall");
    let b = Track {
        id: "b".to_string(),
        name: None,
        uri: None,
    };

    let rows = track_table_rows(&[&a, &b]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].position, 1);
    assert_eq!(rows[0].id, "a");
    assert_eq!(rows[0].name, "Fall");
    assert_eq!(rows[1].position, 2);
    assert_eq!(rows[1].name, "");
}

#[test]
fn test_now_timestamp_is_recent() {
    // 2020-01-01T00:00:00Z
    assert!(now_timestamp() > 1_577_836_800);
}
