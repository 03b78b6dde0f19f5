//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::audio::{PlayerSnapshot, RepeatMode, TransportState};
use crate::config::{ControlsSettings, UiSettings};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play from here"),
    ("space", "play/pause"),
    ("n/p", "next/prev"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("m", "mute"),
    ("+/-", "volume"),
    ("/", "filter"),
    ("x", "close player"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect();
    parts.insert(4, format!("[←/→] seek -/+{}s", seek_seconds));
    parts.insert(5, "[0-9] jump to 0-90%".to_string());
    parts.join(" | ")
}

/// Format seconds as `m:ss`. Unknown, negative or non-finite values read `0:00`.
pub fn format_time(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => s.floor() as u64,
        _ => 0,
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn repeat_label(repeat: RepeatMode) -> &'static str {
    match repeat {
        RepeatMode::Off => "Repeat: off",
        RepeatMode::All => "Repeat: all",
        RepeatMode::One => "Repeat: one",
    }
}

/// Volume as shown to the user: zero while muted.
fn volume_percent(snapshot: &PlayerSnapshot) -> u32 {
    (snapshot.effective_volume() * 100.0).round() as u32
}

/// Lines of the player bar. Empty when there is nothing to show.
fn player_lines(app: &App, ui: &UiSettings) -> Vec<String> {
    let snap = &app.snapshot;
    let Some(track) = snap.current.as_ref() else {
        return Vec::new();
    };

    let artist = if track.artist.trim().is_empty() {
        "—"
    } else {
        track.artist.as_str()
    };
    let state = match snap.transport {
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
        TransportState::Idle => "Stopped",
    };

    let mut lines = vec![
        format!("{} • {}", track.title, artist),
        format!(
            "{} [{} / {}] • Shuffle: {} • {} • Vol: {}%{}",
            state,
            format_time(Some(snap.current_time)),
            format_time(snap.duration),
            if snap.shuffle { "ON" } else { "OFF" },
            repeat_label(snap.repeat),
            volume_percent(snap),
            if snap.muted { " (muted)" } else { "" },
        ),
    ];
    if ui.show_cover {
        if let Some(cover) = track.cover.as_deref() {
            lines.push(format!("Cover: {}", cover));
        }
    }
    lines
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings, controls: &ControlsSettings) {
    let player = if app.player_visible() {
        player_lines(app, ui_settings)
    } else {
        Vec::new()
    };
    let player_height = if player.is_empty() {
        0
    } else {
        player.len() as u16 + 2
    };
    let show_filter = app.filter_mode || !app.filter_query.trim().is_empty();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(if show_filter { 3 } else { 0 }),
            Constraint::Length(player_height),
            Constraint::Length(if app.snapshot.notice.is_some() { 1 } else { 0 }),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" loop ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_track_list(frame, app, chunks[1]);

    if show_filter {
        let cursor = if app.filter_mode { "_" } else { "" };
        let filter = Paragraph::new(format!("{}{}", app.filter_query, cursor)).block(
            Block::bordered()
                .padding(Padding::left(1))
                .title(" filter (esc clears) "),
        );
        frame.render_widget(filter, chunks[2]);
    }

    if !player.is_empty() {
        let bar = Paragraph::new(player.join("\n"))
            .block(
                Block::bordered()
                    .padding(Padding::left(1))
                    .title(" now playing "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(bar, chunks[3]);
    }

    if let Some(notice) = app.snapshot.notice.as_deref() {
        frame.render_widget(Paragraph::new(notice).red(), chunks[4]);
    }

    let footer = Paragraph::new(controls_text(controls.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::left(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

fn draw_track_list(frame: &mut Frame, app: &App, area: Rect) {
    let display = app.visible_indices();
    let playing_id = app.snapshot.current.as_ref().map(|t| t.id.as_str());

    // Center the selected item when possible by building only the visible window.
    let total = display.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.tracks[i];
            let item = ListItem::new(track.display());
            if Some(track.id.as_str()) == playing_id {
                item.bold()
            } else {
                item
            }
        })
        .collect();

    let title = if app.source_label.is_empty() {
        " tracks ".to_string()
    } else {
        format!(" tracks • {} ", app.source_label)
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Track;

    fn app_with_current(artist: &str) -> App {
        let mut app = App::new(Vec::new());
        app.sync_snapshot(PlayerSnapshot {
            current: Some(Track {
                id: "a".into(),
                title: "Song".into(),
                artist: artist.into(),
                cover: Some("/covers/a.png".into()),
                source: Some("/m/a.mp3".into()),
            }),
            transport: TransportState::Playing,
            current_time: 65.4,
            duration: Some(200.0),
            volume: 0.5,
            muted: true,
            ..PlayerSnapshot::default()
        });
        app
    }

    #[test]
    fn format_time_renders_minutes_and_padded_seconds() {
        assert_eq!(format_time(Some(0.0)), "0:00");
        assert_eq!(format_time(Some(65.9)), "1:05");
        assert_eq!(format_time(Some(3600.0)), "60:00");
    }

    #[test]
    fn format_time_reads_zero_for_unknown_values() {
        assert_eq!(format_time(None), "0:00");
        assert_eq!(format_time(Some(f64::NAN)), "0:00");
        assert_eq!(format_time(Some(f64::INFINITY)), "0:00");
        assert_eq!(format_time(Some(-3.0)), "0:00");
    }

    #[test]
    fn player_lines_show_placeholder_artist_and_muted_volume() {
        let app = app_with_current("  ");
        let lines = player_lines(&app, &UiSettings::default());
        assert_eq!(lines[0], "Song • —");
        assert!(lines[1].contains("[1:05 / 3:20]"));
        assert!(lines[1].contains("Vol: 0%"));
        assert_eq!(lines[2], "Cover: /covers/a.png");
    }

    #[test]
    fn player_lines_skip_cover_when_disabled() {
        let app = app_with_current("Band");
        let ui = UiSettings {
            show_cover: false,
            ..UiSettings::default()
        };
        let lines = player_lines(&app, &ui);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Song • Band");
    }

    #[test]
    fn controls_text_mentions_seek_seconds() {
        assert!(controls_text(7).contains("[←/→] seek -/+7s"));
    }
}
