use super::*;
use crate::audio::{AudioCmd, PlayerSnapshot, TransportState};
use crate::config::ControlsSettings;
use crate::library::Track;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn t(id: &str, title: &str, artist: &str) -> Track {
    Track {
        id: id.into(),
        title: title.into(),
        artist: artist.into(),
        cover: None,
        source: Some(format!("/m/{id}.mp3")),
    }
}

fn app() -> App {
    App::new(vec![
        t("1", "Hello World", "Alpha"),
        t("2", "Goodbye", "Beta"),
        t("3", "Hello Again", "Gamma"),
    ])
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn snapshot_with(id: Option<&str>, transport: TransportState) -> PlayerSnapshot {
    PlayerSnapshot {
        current: id.map(|id| t(id, "x", "y")),
        transport,
        ..PlayerSnapshot::default()
    }
}

#[test]
fn fuzzy_match_is_case_insensitive_subsequence() {
    assert!(App::fuzzy_matches("Hello World", "hw"));
    assert!(App::fuzzy_matches("Hello World", "ELLO"));
    assert!(!App::fuzzy_matches("Hello World", "xyz"));
    assert!(!App::fuzzy_matches("Hello World", "wh"));
}

#[test]
fn filter_limits_visible_tracks_and_keeps_selection_visible() {
    let mut a = app();
    a.selected = 1;
    a.enter_filter_mode();
    for c in "hello".chars() {
        a.push_filter_char(c);
    }
    assert_eq!(a.visible_indices(), vec![0, 2]);
    assert_eq!(a.selected, 0);

    a.clear_filter();
    assert_eq!(a.visible_indices(), vec![0, 1, 2]);
    assert!(!a.filter_mode);
}

#[test]
fn selection_wraps_within_visible_list() {
    let mut a = app();
    a.select_prev();
    assert_eq!(a.selected, 2);
    a.select_next();
    assert_eq!(a.selected, 0);
}

#[test]
fn queue_from_selection_uses_visible_list_and_position() {
    let mut a = app();
    a.filter_query = "hello".into();
    a.selected = 2;
    let (tracks, start) = a.queue_from_selection().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(start, 1);
    assert_eq!(tracks[start].id, "3");
}

#[test]
fn keyboard_surface_maps_space_and_arrows() {
    let mut a = app();
    let controls = ControlsSettings::default();

    assert!(matches!(
        handle_key(key(KeyCode::Char(' ')), &mut a, &controls),
        KeyAction::Send(AudioCmd::TogglePlayback)
    ));
    assert!(matches!(
        handle_key(key(KeyCode::Right), &mut a, &controls),
        KeyAction::Send(AudioCmd::SeekBy(s)) if s == 5.0
    ));
    assert!(matches!(
        handle_key(key(KeyCode::Left), &mut a, &controls),
        KeyAction::Send(AudioCmd::SeekBy(s)) if s == -5.0
    ));
}

#[test]
fn keyboard_surface_is_inactive_while_filter_has_focus() {
    let mut a = app();
    let controls = ControlsSettings::default();
    handle_key(key(KeyCode::Char('/')), &mut a, &controls);
    assert!(a.filter_mode);

    assert!(matches!(
        handle_key(key(KeyCode::Char(' ')), &mut a, &controls),
        KeyAction::None
    ));
    assert!(matches!(
        handle_key(key(KeyCode::Right), &mut a, &controls),
        KeyAction::None
    ));
    assert!(matches!(
        handle_key(key(KeyCode::Char('q')), &mut a, &controls),
        KeyAction::None
    ));
    assert_eq!(a.filter_query, " q");
}

#[test]
fn enter_sends_the_visible_list_as_queue() {
    let mut a = app();
    let controls = ControlsSettings::default();
    a.selected = 1;

    match handle_key(key(KeyCode::Enter), &mut a, &controls) {
        KeyAction::Send(AudioCmd::SetQueueAndPlay { tracks, start }) => {
            assert_eq!(tracks.len(), 3);
            assert_eq!(start, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn enter_in_filter_mode_plays_filtered_list_and_leaves_the_input() {
    let mut a = app();
    let controls = ControlsSettings::default();
    handle_key(key(KeyCode::Char('/')), &mut a, &controls);
    handle_key(key(KeyCode::Char('l')), &mut a, &controls);
    handle_key(key(KeyCode::Char('l')), &mut a, &controls);
    handle_key(key(KeyCode::Down), &mut a, &controls);

    match handle_key(key(KeyCode::Enter), &mut a, &controls) {
        KeyAction::Send(AudioCmd::SetQueueAndPlay { tracks, start }) => {
            assert_eq!(tracks.len(), 2);
            assert_eq!(tracks[start].id, "3");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!a.filter_mode);
}

#[test]
fn closed_player_reappears_on_resume_or_new_track() {
    let mut a = app();
    a.sync_snapshot(snapshot_with(Some("1"), TransportState::Playing));
    assert!(a.player_visible());

    a.hide_player();
    a.sync_snapshot(snapshot_with(Some("1"), TransportState::Paused));
    assert!(!a.player_visible());

    a.sync_snapshot(snapshot_with(Some("1"), TransportState::Playing));
    assert!(a.player_visible());

    a.hide_player();
    a.sync_snapshot(snapshot_with(Some("2"), TransportState::Idle));
    assert!(a.player_visible());
}

#[test]
fn player_is_not_visible_without_a_current_track() {
    let mut a = app();
    a.sync_snapshot(snapshot_with(None, TransportState::Idle));
    assert!(!a.player_visible());
}

#[test]
fn stale_playing_snapshot_after_close_keeps_the_bar_hidden() {
    let mut a = app();
    a.sync_snapshot(snapshot_with(Some("1"), TransportState::Playing));
    a.hide_player();

    // The engine has not processed the pause yet.
    a.sync_snapshot(snapshot_with(Some("1"), TransportState::Playing));
    assert!(!a.player_visible());

    a.sync_snapshot(snapshot_with(Some("1"), TransportState::Paused));
    assert!(!a.player_visible());

    a.sync_snapshot(snapshot_with(Some("1"), TransportState::Playing));
    assert!(a.player_visible());
}

#[test]
fn digit_keys_jump_into_a_track_with_known_duration() {
    let mut a = app();
    let controls = ControlsSettings::default();

    assert!(matches!(
        handle_key(key(KeyCode::Char('3')), &mut a, &controls),
        KeyAction::None
    ));

    a.sync_snapshot(PlayerSnapshot {
        duration: Some(200.0),
        ..snapshot_with(Some("1"), TransportState::Playing)
    });
    assert!(matches!(
        handle_key(key(KeyCode::Char('3')), &mut a, &controls),
        KeyAction::Send(AudioCmd::Seek(s)) if s == 60.0
    ));
    assert!(matches!(
        handle_key(key(KeyCode::Char('0')), &mut a, &controls),
        KeyAction::Send(AudioCmd::Seek(s)) if s == 0.0
    ));
}
