//! The playback queue engine.
//!
//! Owns the queue, cursor, transport, shuffle/repeat policy, volume/mute and
//! the mirrored time position. It is the sole owner of the media sink and is
//! driven from one thread: user commands and sink notifications are applied
//! one at a time, each to completion.

use log::{debug, info, warn};

use crate::error::PlayerError;
use crate::library::Track;
use crate::store::{MUTED_KEY, SettingValue, SettingsStore, VOLUME_KEY};

use super::select::{Advance, next_index};
use super::sink::MediaSink;
use super::types::{AudioCmd, PlayerSnapshot, RepeatMode, SinkEvent, Ticket, TransportState};

/// A start request whose outcome has not arrived yet.
#[derive(Debug, Copy, Clone)]
struct PendingStart {
    ticket: Ticket,
    /// Where transport goes if the sink refuses.
    fallback: TransportState,
}

/// Start-up policy for a new engine.
#[derive(Debug, Copy, Clone)]
pub struct EngineDefaults {
    pub shuffle: bool,
    pub repeat: RepeatMode,
    /// Used when the store holds no volume.
    pub volume: f64,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: 0.8,
        }
    }
}

pub struct QueueEngine<S, St> {
    sink: S,
    store: St,

    queue: Vec<Track>,
    cursor: Option<usize>,
    transport: TransportState,

    shuffle: bool,
    repeat: RepeatMode,

    volume: f64,
    muted: bool,

    current_time: f64,
    duration: Option<f64>,

    /// Ticket of the track currently loaded into the sink.
    loaded: Option<Ticket>,
    pending_start: Option<PendingStart>,
    last_ticket: u64,
}

impl<S: MediaSink, St: SettingsStore> QueueEngine<S, St> {
    /// Build an engine, restoring volume and mute from `store`.
    pub fn new(mut sink: S, store: St, defaults: EngineDefaults) -> Self {
        let volume = store
            .get(VOLUME_KEY)
            .and_then(SettingValue::as_real)
            .filter(|v| v.is_finite())
            .unwrap_or(defaults.volume)
            .clamp(0.0, 1.0);
        let muted = store
            .get(MUTED_KEY)
            .and_then(SettingValue::as_bool)
            .unwrap_or(false);

        sink.set_output_volume(if muted { 0.0 } else { volume });

        Self {
            sink,
            store,
            queue: Vec::new(),
            cursor: None,
            transport: TransportState::Idle,
            shuffle: defaults.shuffle,
            repeat: defaults.repeat,
            volume,
            muted,
            current_time: 0.0,
            duration: None,
            loaded: None,
            pending_start: None,
            last_ticket: 0,
        }
    }

    // ---- observed state ----

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.queue.get(i))
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    /// What the sink is actually told to output.
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[cfg(test)]
    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn snapshot(&self, notice: Option<String>) -> PlayerSnapshot {
        PlayerSnapshot {
            queue_len: self.queue().len(),
            cursor: self.cursor(),
            current: self.current_track().cloned(),
            transport: self.transport(),
            shuffle: self.shuffle(),
            repeat: self.repeat(),
            volume: self.volume(),
            muted: self.muted(),
            current_time: self.current_time(),
            duration: self.duration(),
            notice,
        }
    }

    // ---- commands ----

    /// Dispatch one UI command. `Quit` only pauses; ending the loop is up to the caller.
    pub fn apply(&mut self, cmd: AudioCmd) -> Result<(), PlayerError> {
        match cmd {
            AudioCmd::SetQueueAndPlay { tracks, start } => self.set_queue_and_play(tracks, start),
            AudioCmd::Pause | AudioCmd::Quit => {
                self.pause();
                Ok(())
            }
            AudioCmd::TogglePlayback => self.toggle_playback(),
            AudioCmd::Next => self.next(),
            AudioCmd::Prev => self.prev(),
            AudioCmd::Seek(t) => {
                self.seek(t);
                Ok(())
            }
            AudioCmd::SeekBy(delta) => {
                self.seek(self.current_time() + delta);
                Ok(())
            }
            AudioCmd::AdjustVolume(delta) => {
                self.set_volume(self.volume() + delta);
                Ok(())
            }
            AudioCmd::ToggleMute => {
                self.toggle_mute();
                Ok(())
            }
            AudioCmd::ToggleShuffle => {
                self.toggle_shuffle();
                Ok(())
            }
            AudioCmd::CycleRepeat => {
                self.cycle_repeat();
                Ok(())
            }
        }
    }

    /// Replace the queue wholesale and start playing at `start` (clamped).
    pub fn set_queue_and_play(&mut self, tracks: Vec<Track>, start: usize) -> Result<(), PlayerError> {
        self.queue = tracks;
        if self.queue.is_empty() {
            self.halt_if_playing();
            self.cursor = None;
            self.transport = TransportState::Idle;
            self.pending_start = None;
            self.loaded = None;
            self.current_time = 0.0;
            self.duration = None;
            return Ok(());
        }
        self.cursor = Some(start.min(self.queue.len() - 1));
        self.load_current()
    }

    /// Resume the current track. From `Idle` the track is reloaded from the start.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        if self.current_track().is_none() {
            return Ok(());
        }
        match self.transport {
            TransportState::Playing => Ok(()),
            TransportState::Paused => {
                let ticket = self.issue_ticket();
                self.pending_start = Some(PendingStart {
                    ticket,
                    fallback: TransportState::Paused,
                });
                self.transport = TransportState::Playing;
                self.sink.start(ticket);
                Ok(())
            }
            TransportState::Idle => self.load_current(),
        }
    }

    /// Halt the sink, keeping the position. Supersedes any pending start.
    pub fn pause(&mut self) {
        if self.current_track().is_none() || self.transport != TransportState::Playing {
            return;
        }
        self.sink.halt();
        self.transport = TransportState::Paused;
        self.pending_start = None;
    }

    pub fn toggle_playback(&mut self) -> Result<(), PlayerError> {
        if self.transport == TransportState::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    pub fn next(&mut self) -> Result<(), PlayerError> {
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        match next_index(&mut rand::rng(), self.queue.len(), cursor, self.shuffle, self.repeat) {
            Advance::To(i) => {
                self.cursor = Some(i);
                self.load_current()
            }
            Advance::Stay => Ok(()),
            Advance::Finish => {
                self.finish_queue();
                Ok(())
            }
        }
    }

    /// Step back one track, clamping at the first. Always reloads.
    pub fn prev(&mut self) -> Result<(), PlayerError> {
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        self.cursor = Some(cursor.saturating_sub(1));
        self.load_current()
    }

    /// Move to `seconds`, clamped to `[0, duration]` (or `[0, ∞)` when unknown).
    pub fn seek(&mut self, seconds: f64) {
        if !seconds.is_finite() || self.loaded.is_none() {
            return;
        }
        let mut t = seconds.max(0.0);
        if let Some(d) = self.duration {
            t = t.min(d);
        }
        self.current_time = t;
        self.sink.set_position(t);
    }

    /// Store `v` clamped to `[0, 1]` and apply it unless muted.
    pub fn set_volume(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.volume = v.clamp(0.0, 1.0);
        self.sink.set_output_volume(self.effective_volume());
        self.persist(VOLUME_KEY, SettingValue::Real(self.volume));
    }

    /// Flip mute without touching the stored volume.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.sink.set_output_volume(self.effective_volume());
        self.persist(MUTED_KEY, SettingValue::Bool(self.muted));
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
    }

    // ---- sink notifications ----

    /// Apply one notification from the sink. Notifications for superseded
    /// requests are dropped.
    pub fn handle_sink_event(&mut self, ev: SinkEvent) -> Result<(), PlayerError> {
        match ev {
            SinkEvent::Progress { ticket, position } => {
                if self.is_loaded(ticket) && position.is_finite() {
                    let mut t = position.max(0.0);
                    if let Some(d) = self.duration {
                        t = t.min(d);
                    }
                    self.current_time = t;
                }
            }
            SinkEvent::MetadataReady { ticket, duration } => {
                if self.is_loaded(ticket) {
                    self.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
                }
            }
            SinkEvent::Started { ticket } => match self.pending_start {
                Some(p) if p.ticket == ticket => self.pending_start = None,
                _ => debug!("ignoring stale start confirmation {ticket:?}"),
            },
            SinkEvent::StartFailed { ticket, reason } => match self.pending_start {
                Some(p) if p.ticket == ticket => {
                    self.pending_start = None;
                    self.transport = p.fallback;
                    warn!("start rejected: {reason}");
                    return Err(PlayerError::StartRejected { reason });
                }
                _ => debug!("ignoring stale start failure {ticket:?}: {reason}"),
            },
            SinkEvent::Completed { ticket } => {
                if self.is_loaded(ticket) && self.transport == TransportState::Playing {
                    return self.on_track_ended();
                }
                debug!("ignoring completion {ticket:?}");
            }
        }
        Ok(())
    }

    fn on_track_ended(&mut self) -> Result<(), PlayerError> {
        if self.repeat == RepeatMode::One {
            self.restart_current();
            return Ok(());
        }
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        match next_index(&mut rand::rng(), self.queue.len(), cursor, self.shuffle, self.repeat) {
            Advance::To(i) => {
                self.cursor = Some(i);
                self.load_current()
            }
            // A lone track under shuffle: nothing else to pick.
            Advance::Stay if self.repeat == RepeatMode::All => {
                self.restart_current();
                Ok(())
            }
            Advance::Stay | Advance::Finish => {
                self.finish_queue();
                Ok(())
            }
        }
    }

    // ---- internals ----

    fn issue_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    fn is_loaded(&self, ticket: Ticket) -> bool {
        self.loaded == Some(ticket)
    }

    fn halt_if_playing(&mut self) {
        if self.transport == TransportState::Playing {
            self.sink.halt();
        }
    }

    /// Load `queue[cursor]` and ask the sink to play it.
    fn load_current(&mut self) -> Result<(), PlayerError> {
        let Some(track) = self.current_track() else {
            return Ok(());
        };
        let id = track.id.clone();
        let source = track.playable_source().map(str::to_string);

        self.current_time = 0.0;
        self.duration = None;
        self.pending_start = None;

        let Some(source) = source else {
            self.halt_if_playing();
            self.loaded = None;
            self.transport = TransportState::Idle;
            warn!("track {id} has no source locator");
            return Err(PlayerError::ContentUnavailable { id });
        };

        let ticket = self.issue_ticket();
        info!("loading track {id} from {source}");
        self.loaded = Some(ticket);
        self.pending_start = Some(PendingStart {
            ticket,
            fallback: TransportState::Idle,
        });
        self.transport = TransportState::Playing;
        self.sink.load(ticket, &source);
        self.sink.start(ticket);
        Ok(())
    }

    /// Play the loaded track again from position 0; the cursor stays put.
    fn restart_current(&mut self) {
        let ticket = self.issue_ticket();
        self.current_time = 0.0;
        self.sink.set_position(0.0);
        self.pending_start = Some(PendingStart {
            ticket,
            fallback: TransportState::Idle,
        });
        self.transport = TransportState::Playing;
        self.sink.start(ticket);
    }

    /// End of the queue: stop without moving the cursor.
    fn finish_queue(&mut self) {
        self.halt_if_playing();
        self.pending_start = None;
        self.transport = TransportState::Idle;
    }

    fn persist(&mut self, key: &str, value: SettingValue) {
        if let Err(e) = self.store.set(key, value) {
            warn!("failed to persist {key}: {e}");
        }
    }
}
