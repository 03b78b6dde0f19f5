use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, KeyAction, handle_key};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::ui;

/// Main terminal event loop: pulls the engine snapshot, draws, and turns
/// key presses into engine commands. Returns `Ok(())` when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.sync_snapshot(audio_player.snapshot());

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(key, app, &settings.controls) {
            KeyAction::None => {}
            KeyAction::Quit => return Ok(()),
            KeyAction::Send(cmd) => send(audio_player, cmd),
            KeyAction::ClosePlayer => {
                send(audio_player, AudioCmd::Pause);
                app.hide_player();
            }
        }
    }
}

fn send(audio_player: &AudioPlayer, cmd: AudioCmd) {
    debug!("ui -> engine: {cmd:?}");
    if audio_player.send(cmd).is_err() {
        warn!("audio engine is not running; command dropped");
    }
}
