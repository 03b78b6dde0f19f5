use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::LogSettings;
use crate::store::state_dir;

/// Route `log` output to a file; the terminal belongs to the UI.
///
/// `RUST_LOG` still overrides the configured level. Without a writable log
/// file, logging stays off.
pub fn init_logging(settings: &LogSettings) {
    let Some(path) = settings.file.clone().or_else(default_log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("loop-player: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let _ = Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .try_init();
}

fn default_log_path() -> Option<PathBuf> {
    state_dir().map(|d| d.join("loop-player.log"))
}
