use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_env_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LOOP_PLAYER_CONFIG_PATH", "/tmp/loop-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/loop-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("loop-player")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("loop-player")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_player_conventions() {
    let s = Settings::default();
    assert!(!s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::Off);
    assert_eq!(s.playback.default_volume, 0.8);
    assert_eq!(s.controls.seek_seconds, 5);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = "repeat-one"
default_volume = 0.5

[controls]
seek_seconds = 10
volume_step = 0.1

[ui]
header_text = "hello"
show_cover = false

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false

[store]
path = "/tmp/loop-state.toml"

[log]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LOOP_PLAYER_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("LOOP_PLAYER__CONTROLS__SEEK_SECONDS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::One);
    assert_eq!(s.playback.default_volume, 0.5);
    assert_eq!(s.controls.seek_seconds, 10);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_cover);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(
        s.store.path,
        Some(std::path::PathBuf::from("/tmp/loop-state.toml"))
    );
    assert_eq!(s.log.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
seek_seconds = 10
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LOOP_PLAYER_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("LOOP_PLAYER__CONTROLS__SEEK_SECONDS", "3");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.seek_seconds, 3);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.playback.default_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.seek_seconds = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());
}
