//! Audio-related small types and handles.
//!
//! This module defines the policies, commands, sink notifications and the
//! shared snapshot the UI reads.

use std::sync::{Arc, Mutex};

use crate::config::RepeatSetting;
use crate::library::Track;

/// Identity of one sink request.
///
/// Every `load` and `start` carries a fresh ticket and the sink echoes it in
/// its notifications, so callbacks for superseded requests can be dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub(crate) u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportState {
    /// No current track, or the sink was never asked to play it.
    #[default]
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    Off,
    /// Wrap around to the start of the queue.
    All,
    /// Restart the current track when it ends.
    One,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(s: RepeatSetting) -> Self {
        match s {
            RepeatSetting::Off => Self::Off,
            RepeatSetting::All => Self::All,
            RepeatSetting::One => Self::One,
        }
    }
}

/// Notifications emitted by a media sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// Playback position of the loaded track, in seconds.
    Progress { ticket: Ticket, position: f64 },
    /// Duration of the loaded track became known (or is known to be unknown).
    MetadataReady { ticket: Ticket, duration: Option<f64> },
    /// A start request took effect.
    Started { ticket: Ticket },
    /// A start request was refused.
    StartFailed { ticket: Ticket, reason: String },
    /// The loaded track played to its natural end.
    Completed { ticket: Ticket },
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the queue and start playing at the given index.
    SetQueueAndPlay { tracks: Vec<Track>, start: usize },
    Pause,
    /// Pause when playing, play otherwise.
    TogglePlayback,
    Next,
    Prev,
    /// Seek to an absolute position in seconds.
    Seek(f64),
    /// Seek relative to the current position, in seconds.
    SeekBy(f64),
    /// Change the stored volume by a delta.
    AdjustVolume(f64),
    ToggleMute,
    ToggleShuffle,
    CycleRepeat,
    /// Pause and stop the engine thread.
    Quit,
}

/// Everything delivered to the engine thread goes through one channel.
#[derive(Debug)]
pub enum EngineMsg {
    Cmd(AudioCmd),
    Sink(SinkEvent),
}

impl From<AudioCmd> for EngineMsg {
    fn from(cmd: AudioCmd) -> Self {
        Self::Cmd(cmd)
    }
}

impl From<SinkEvent> for EngineMsg {
    fn from(ev: SinkEvent) -> Self {
        Self::Sink(ev)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Observed player state shared with the UI.
pub struct PlayerSnapshot {
    pub queue_len: usize,
    pub cursor: Option<usize>,
    pub current: Option<Track>,
    pub transport: TransportState,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub volume: f64,
    pub muted: bool,
    pub current_time: f64,
    /// `None` while the sink has not determined it.
    pub duration: Option<f64>,
    /// Last failure surfaced by the engine, for display.
    pub notice: Option<String>,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            queue_len: 0,
            cursor: None,
            current: None,
            transport: TransportState::Idle,
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: 0.8,
            muted: false,
            current_time: 0.0,
            duration: None,
            notice: None,
        }
    }
}

impl PlayerSnapshot {
    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }

    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }
}

pub type SnapshotHandle = Arc<Mutex<PlayerSnapshot>>;
