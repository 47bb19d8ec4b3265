//! Playlist navigation driving the playback service.

use async_trait::async_trait;
use bridge_desktop::HeadlessMediaElement;
use bridge_traits::{
    error::Result as BridgeResult, BridgeError, MediaElement, StaticTrackCatalog, TrackCatalog,
};
use core_playback::{
    PlaybackError, PlaybackService, PlaybackStatus, PlaylistController, PlaylistSelection, Track,
};
use std::sync::Arc;

fn tracks() -> Vec<Track> {
    vec![
        Track::new("https://cdn.example.com/a.mp3").with_title("A"),
        Track::new("https://cdn.example.com/b.mp3").with_title("B"),
        Track::new("https://cdn.example.com/c.mp3").with_title("C"),
    ]
}

fn setup() -> (Arc<HeadlessMediaElement>, PlaylistController) {
    let element = Arc::new(HeadlessMediaElement::with_auto_ready(180.0));
    let service = PlaybackService::new(element.clone());
    (element, PlaylistController::with_tracks(service, tracks()))
}

struct UnreachableCatalog;

#[async_trait]
impl TrackCatalog for UnreachableCatalog {
    async fn list_tracks(&self) -> BridgeResult<Vec<Track>> {
        Err(BridgeError::Http("catalog responded with HTTP 503".to_string()))
    }
}

#[tokio::test]
async fn next_walks_to_the_end_and_stops_there() {
    let (element, mut playlist) = setup();
    let [a, b, c]: [Track; 3] = tracks().try_into().unwrap();

    playlist.open_track(a, 0).unwrap();
    assert!(playlist.is_first_playing());
    assert!(!playlist.is_last_playing());

    playlist.next().unwrap();
    assert_eq!(
        playlist.selection(),
        Some(&PlaylistSelection {
            index: 1,
            track: b.clone()
        })
    );
    assert!(!playlist.is_first_playing());
    assert!(!playlist.is_last_playing());
    assert_eq!(element.src(), Some(b.url));

    playlist.next().unwrap();
    assert_eq!(playlist.selection().map(|s| s.index), Some(2));
    assert!(playlist.is_last_playing());
    assert_eq!(element.src(), Some(c.url.clone()));

    let err = playlist.next().unwrap_err();
    assert!(matches!(err, PlaybackError::OutOfRange { index: 3, len: 3 }));
    assert!(err.is_navigation_error());
    assert_eq!(
        playlist.selection(),
        Some(&PlaylistSelection { index: 2, track: c.clone() })
    );
    assert!(playlist.state().playing());
    assert_eq!(element.src(), Some(c.url));
}

#[tokio::test]
async fn previous_from_first_track_is_rejected() {
    let (element, mut playlist) = setup();
    playlist.open_index(0).unwrap();
    element.advance(30.0);

    let err = playlist.previous().unwrap_err();

    assert!(matches!(err, PlaybackError::OutOfRange { index: -1, len: 3 }));
    assert_eq!(playlist.selection().map(|s| s.index), Some(0));
    assert_eq!(playlist.state().current_time, Some(30.0));
}

#[tokio::test]
async fn previous_goes_back_one_track() {
    let (element, mut playlist) = setup();
    playlist.open_index(2).unwrap();

    playlist.previous().unwrap();

    assert_eq!(playlist.selection().map(|s| s.index), Some(1));
    assert_eq!(element.src().as_deref(), Some("https://cdn.example.com/b.mp3"));
}

#[tokio::test]
async fn navigation_needs_a_selection() {
    let (_element, mut playlist) = setup();

    assert!(matches!(playlist.next(), Err(PlaybackError::NoTrackSelected)));
    assert!(matches!(playlist.previous(), Err(PlaybackError::NoTrackSelected)));
    assert!(!playlist.is_first_playing());
    assert!(!playlist.is_last_playing());
    assert!(playlist.selection().is_none());
}

#[tokio::test]
async fn opening_a_track_never_overlaps_sessions() {
    let (element, mut playlist) = setup();

    playlist.open_index(0).unwrap();
    playlist.next().unwrap();
    playlist.open_index(0).unwrap();

    assert_eq!(playlist.service().active_session_count(), 1);
    assert_eq!(element.listener_count(), 1);
    assert!(playlist.session().is_some_and(|s| s.is_active()));
}

#[tokio::test]
async fn open_index_outside_playlist_fails() {
    let (_element, mut playlist) = setup();

    let err = playlist.open_index(7).unwrap_err();

    assert!(matches!(err, PlaybackError::OutOfRange { index: 7, len: 3 }));
    assert!(playlist.selection().is_none());
    assert_eq!(playlist.state().status, PlaybackStatus::Idle);
}

#[tokio::test]
async fn stop_keeps_selection_and_releases_session() {
    let (element, mut playlist) = setup();
    playlist.open_index(1).unwrap();

    playlist.stop();

    assert!(playlist.session().is_none());
    assert_eq!(playlist.selection().map(|s| s.index), Some(1));
    assert_eq!(playlist.state().status, PlaybackStatus::Idle);
    assert!(element.is_paused());

    playlist.next().unwrap();
    assert!(playlist.state().playing());
}

#[tokio::test]
async fn track_end_resets_state_but_keeps_selection() {
    let (element, mut playlist) = setup();
    playlist.open_index(0).unwrap();

    element.advance(180.0);

    assert_eq!(playlist.state().status, PlaybackStatus::Idle);
    assert_eq!(playlist.selection().map(|s| s.index), Some(0));
    assert!(playlist.session().is_some_and(|s| !s.is_active()));
}

#[tokio::test]
async fn next_recovers_from_media_error() {
    let (element, mut playlist) = setup();
    playlist.open_index(0).unwrap();
    element.fail();
    assert!(playlist.state().error());

    playlist.next().unwrap();

    let state = playlist.state();
    assert!(!state.error());
    assert!(state.playing());
}

#[tokio::test]
async fn transport_controls_pass_through() {
    let (element, mut playlist) = setup();
    playlist.open_index(0).unwrap();

    playlist.pause().unwrap();
    assert_eq!(playlist.state().status, PlaybackStatus::Paused);
    playlist.play().unwrap();
    assert!(playlist.state().playing());

    playlist.seek_to(95.0).unwrap();
    assert_eq!(playlist.state().readable_current_time(), "00:01:35");

    playlist.set_volume(0.4).unwrap();
    assert_eq!(element.volume(), 0.4);
    assert_eq!(playlist.state().volume, 0.4);
}

#[tokio::test]
async fn load_from_replaces_tracks() {
    let element = Arc::new(HeadlessMediaElement::with_auto_ready(60.0));
    let mut playlist = PlaylistController::new(PlaybackService::new(element));
    let catalog = StaticTrackCatalog::from_json(
        r#"[
            {"url": "https://cdn.example.com/1.mp3", "name": "One"},
            {"url": "https://cdn.example.com/2.mp3", "name": "Two"}
        ]"#,
    )
    .unwrap();

    let count = playlist.load_from(&catalog).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(playlist.tracks()[1].title.as_deref(), Some("Two"));
    playlist.open_index(1).unwrap();
    assert!(playlist.is_last_playing());
}

#[tokio::test]
async fn load_from_failure_keeps_existing_tracks() {
    let (_element, mut playlist) = setup();

    let err = playlist.load_from(&UnreachableCatalog).await.unwrap_err();

    assert!(matches!(err, PlaybackError::Catalog(ref msg) if msg.contains("503")));
    assert_eq!(playlist.tracks().len(), 3);
}

#[tokio::test]
async fn open_track_rejects_index_outside_playlist() {
    let (element, mut playlist) = setup();
    let [a, ..]: [Track; 3] = tracks().try_into().unwrap();

    let err = playlist.open_track(a.clone(), usize::MAX).unwrap_err();
    assert!(matches!(err, PlaybackError::OutOfRange { index: isize::MAX, len: 3 }));

    let err = playlist.open_track(a, 3).unwrap_err();
    assert!(matches!(err, PlaybackError::OutOfRange { index: 3, len: 3 }));

    assert!(playlist.selection().is_none());
    assert!(!playlist.is_last_playing());
    assert_eq!(element.listener_count(), 0);
}

#[tokio::test]
async fn navigation_after_playlist_shrinks_reports_out_of_range() {
    let (element, mut playlist) = setup();
    playlist.open_index(2).unwrap();
    playlist.set_tracks(vec![Track::new("https://cdn.example.com/z.mp3")]);

    assert!(!playlist.is_last_playing());
    assert!(matches!(
        playlist.next(),
        Err(PlaybackError::OutOfRange { index: 3, len: 1 })
    ));
    assert!(matches!(
        playlist.previous(),
        Err(PlaybackError::OutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(playlist.selection().map(|s| s.index), Some(2));
    assert_eq!(element.src().as_deref(), Some("https://cdn.example.com/c.mp3"));
}

#[tokio::test]
async fn last_track_of_empty_playlist_is_never_playing() {
    let element = Arc::new(HeadlessMediaElement::new());
    let playlist = PlaylistController::new(PlaybackService::new(element));

    assert!(!playlist.is_last_playing());
    assert!(!playlist.is_first_playing());
}
