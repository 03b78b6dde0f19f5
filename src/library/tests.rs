use super::*;
use std::fs;

fn t(id: &str, title: &str, artist: &str) -> Track {
    Track {
        id: id.into(),
        title: title.into(),
        artist: artist.into(),
        cover: None,
        source: None,
    }
}

#[test]
fn display_prefers_artist_dash_title() {
    assert_eq!(t("1", "Song", "Artist").display(), "Artist - Song");
    assert_eq!(t("1", "Song", "  ").display(), "Song");
    assert_eq!(t("1", "Song", "").display(), "Song");
}

#[test]
fn tracks_compare_by_id_only() {
    assert_eq!(t("1", "A", "x"), t("1", "B", "y"));
    assert_ne!(t("1", "A", "x"), t("2", "A", "x"));
}

#[test]
fn playable_source_ignores_blank_locators() {
    let mut track = t("1", "A", "");
    assert_eq!(track.playable_source(), None);
    track.source = Some("   ".into());
    assert_eq!(track.playable_source(), None);
    track.source = Some(" /music/a.mp3 ".into());
    assert_eq!(track.playable_source(), Some("/music/a.mp3"));
}

#[test]
fn load_mix_resolves_relative_locators_and_keeps_sourceless_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late-night.toml");
    fs::write(
        &path,
        r#"
[[tracks]]
id = "a"
title = "Intro"
artist = "Someone"
source = "music/intro.flac"
cover = "https://cdn.example/intro.jpg"

[[tracks]]
id = "b"
title = "Not uploaded yet"
"#,
    )
    .unwrap();

    let mix = load_mix(&path).unwrap();
    assert_eq!(mix.name, "late-night");
    assert_eq!(mix.tracks.len(), 2);

    let a = &mix.tracks[0];
    assert_eq!(
        a.source.as_deref(),
        Some(dir.path().join("music/intro.flac").display().to_string().as_str())
    );
    assert_eq!(a.cover.as_deref(), Some("https://cdn.example/intro.jpg"));

    let b = &mix.tracks[1];
    assert_eq!(b.artist, "");
    assert_eq!(b.playable_source(), None);
}

#[test]
fn load_mix_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[[tracks]]\ntitle = 3\n").unwrap();

    assert!(matches!(
        load_mix(&path),
        Err(crate::error::LibraryError::Parse { .. })
    ));
    assert!(matches!(
        load_mix(&dir.path().join("missing.toml")),
        Err(crate::error::LibraryError::Io { .. })
    ));
}
