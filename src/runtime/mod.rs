use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::store::MemoryStore;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init_logging(&settings.log);

    let arg = env::args().nth(1).unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| ".".to_string())
    });

    let catalog = startup::load_catalog(&arg, &settings)?;
    let defaults = startup::engine_defaults(&settings);
    let audio_player = match startup::open_store(&settings) {
        Some(store) => {
            info!("settings store at {}", store.path().display());
            AudioPlayer::new(store, defaults)
        }
        None => {
            info!("no state directory; settings will not survive a restart");
            AudioPlayer::new(MemoryStore::new(), defaults)
        }
    };

    let mut app = App::new(catalog.tracks);
    app.set_source_label(catalog.label);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &audio_player);

    audio_player.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
