//! Application model: the visible track list, the filter input and the
//! player bar, plus the latest engine snapshot the UI renders from.

use crate::audio::PlayerSnapshot;
use crate::library::Track;

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,

    /// The filter input has focus; keys edit the query.
    pub filter_mode: bool,
    pub filter_query: String,

    /// The player bar was closed by the user.
    pub player_hidden: bool,
    last_track_id: Option<String>,
    /// Transport of the previous snapshot; only a change to playing reveals the bar.
    was_playing: bool,

    pub snapshot: PlayerSnapshot,
    /// Where the list came from (directory or mix name).
    pub source_label: String,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            player_hidden: false,
            last_track_id: None,
            was_playing: false,
            snapshot: PlayerSnapshot::default(),
            source_label: String::new(),
        }
    }

    pub fn set_source_label(&mut self, label: impl Into<String>) {
        self.source_label = label.into();
    }

    /// Take a fresh engine snapshot. The player bar re-appears when playback
    /// resumes or a different track becomes current. A snapshot published
    /// before a close was processed still reads `Playing` and must not count
    /// as a resume.
    pub fn sync_snapshot(&mut self, snapshot: PlayerSnapshot) {
        let id = snapshot.current.as_ref().map(|t| t.id.clone());
        let playing = snapshot.is_playing();
        if playing && !self.was_playing {
            self.player_hidden = false;
        }
        self.was_playing = playing;
        if id.is_some() && id != self.last_track_id {
            self.player_hidden = false;
            self.last_track_id = id;
        }
        self.snapshot = snapshot;
    }

    pub fn hide_player(&mut self) {
        self.player_hidden = true;
    }

    /// Whether the player bar should be drawn at all.
    pub fn player_visible(&self) -> bool {
        self.snapshot.current.is_some() && !self.player_hidden
    }

    /// Indices into `tracks` that pass the current filter, in list order.
    pub fn visible_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        (0..self.tracks.len())
            .filter(|&i| query.is_empty() || Self::fuzzy_matches(&self.tracks[i].display(), query))
            .collect()
    }

    /// The visible list and the selection's position in it, ready to hand
    /// to the engine as a new queue.
    pub fn queue_from_selection(&self) -> Option<(Vec<Track>, usize)> {
        let visible = self.visible_indices();
        let pos = visible.iter().position(|&i| i == self.selected)?;
        let tracks = visible.iter().map(|&i| self.tracks[i].clone()).collect();
        Some((tracks, pos))
    }

    /// Case-insensitive subsequence match of `query` in `text`.
    pub fn fuzzy_matches(text: &str, query: &str) -> bool {
        let mut chars = text.chars().map(|c| c.to_ascii_lowercase());
        query
            .chars()
            .map(|q| q.to_ascii_lowercase())
            .all(|q| chars.any(|c| c == q))
    }

    /// Enter filter mode: the keyboard now edits the query.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }

    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    /// Append a character to the filter query and refresh view.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    /// Remove the last character from the filter query and refresh view.
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Move selection to the first visible track when it got filtered out.
    fn ensure_selected_visible(&mut self) {
        let visible = self.visible_indices();
        match visible.first() {
            None => self.selected = 0,
            Some(&first) if !visible.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }

    /// Move selection to the next visible track, wrapping around.
    pub fn select_next(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(p) => visible[(p + 1) % visible.len()],
            None => visible[0],
        };
    }

    /// Move selection to the previous visible track, wrapping around.
    pub fn select_prev(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(0) | None => visible[visible.len() - 1],
            Some(p) => visible[p - 1],
        };
    }
}
