use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `LOOP_PLAYER__`) override it, falling back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("LOOP_PLAYER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let v = self.playback.default_volume;
        if !(0.0..=1.0).contains(&v) {
            return Err(format!("playback.default_volume must be within 0..=1, got {v}"));
        }
        if self.controls.seek_seconds == 0 {
            return Err("controls.seek_seconds must be >= 1".to_string());
        }
        let step = self.controls.volume_step;
        if !(step > 0.0 && step <= 1.0) {
            return Err(format!("controls.volume_step must be within (0, 1], got {step}"));
        }
        Ok(())
    }
}

/// Resolve the config path from `LOOP_PLAYER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("LOOP_PLAYER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/loop-player/config.toml`
/// or `~/.config/loop-player/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("loop-player").join("config.toml"))
}
