//! Keyboard surface.
//!
//! Space toggles playback and Left/Right seek, but only while the filter
//! input does not have focus; there every printable key edits the query.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::audio::AudioCmd;
use crate::config::ControlsSettings;

use super::model::App;

/// What the runtime should do in response to a key.
#[derive(Debug)]
pub enum KeyAction {
    None,
    Quit,
    /// Forward to the engine thread.
    Send(AudioCmd),
    /// Close the player bar: pause and hide it.
    ClosePlayer,
}

/// Handle one key press: edits `app` directly for UI-only keys and returns
/// whatever has to leave the UI.
pub fn handle_key(key: KeyEvent, app: &mut App, controls: &ControlsSettings) -> KeyAction {
    if app.filter_mode {
        return handle_filter_key(key, app);
    }

    let seek = controls.seek_seconds as f64;
    let step = controls.volume_step;

    match key.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char(' ') => KeyAction::Send(AudioCmd::TogglePlayback),
        KeyCode::Right => KeyAction::Send(AudioCmd::SeekBy(seek)),
        KeyCode::Left => KeyAction::Send(AudioCmd::SeekBy(-seek)),
        KeyCode::Char('n') => KeyAction::Send(AudioCmd::Next),
        KeyCode::Char('p') => KeyAction::Send(AudioCmd::Prev),
        KeyCode::Char('s') => KeyAction::Send(AudioCmd::ToggleShuffle),
        KeyCode::Char('r') => KeyAction::Send(AudioCmd::CycleRepeat),
        KeyCode::Char('m') => KeyAction::Send(AudioCmd::ToggleMute),
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::Send(AudioCmd::AdjustVolume(step)),
        KeyCode::Char('-') => KeyAction::Send(AudioCmd::AdjustVolume(-step)),
        KeyCode::Char('x') => KeyAction::ClosePlayer,
        KeyCode::Char(c @ '0'..='9') => match (app.snapshot.duration, c.to_digit(10)) {
            // `3` jumps to 30% of the track; needs a known duration.
            (Some(total), Some(tenths)) => KeyAction::Send(AudioCmd::Seek(total * tenths as f64 / 10.0)),
            _ => KeyAction::None,
        },
        KeyCode::Char('/') => {
            app.enter_filter_mode();
            KeyAction::None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            KeyAction::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            KeyAction::None
        }
        KeyCode::Enter => match app.queue_from_selection() {
            Some((tracks, start)) => KeyAction::Send(AudioCmd::SetQueueAndPlay { tracks, start }),
            None => KeyAction::None,
        },
        _ => KeyAction::None,
    }
}

fn handle_filter_key(key: KeyEvent, app: &mut App) -> KeyAction {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Enter => {
            app.exit_filter_mode();
            if let Some((tracks, start)) = app.queue_from_selection() {
                return KeyAction::Send(AudioCmd::SetQueueAndPlay { tracks, start });
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        _ => {}
    }
    KeyAction::None
}
