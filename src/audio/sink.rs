//! The media sink: the thing that actually makes sound.
//!
//! The engine only talks to [`MediaSink`]; outcomes come back as
//! [`SinkEvent`]s tagged with the ticket of the request they answer.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, warn};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::SinkError;

use super::types::{EngineMsg, SinkEvent, Ticket};

/// Output device contract driven by the queue engine.
///
/// `load` and `start` answer asynchronously with `MetadataReady`,
/// `Started` or `StartFailed`; `Progress` and `Completed` follow while the
/// loaded track plays.
pub trait MediaSink {
    /// Open `source` paused at position 0.
    fn load(&mut self, ticket: Ticket, source: &str);
    /// Begin or resume output.
    fn start(&mut self, ticket: Ticket);
    /// Stop output, keeping the position.
    fn halt(&mut self);
    fn set_position(&mut self, seconds: f64);
    /// Volume in `[0, 1]`, already zero when muted.
    fn set_output_volume(&mut self, volume: f64);
    /// Called periodically by the engine loop.
    fn tick(&mut self) {}
}

/// Turn a source locator (plain path or `file://` URL) into a path.
pub(crate) fn locator_path(source: &str) -> PathBuf {
    PathBuf::from(source.strip_prefix("file://").unwrap_or(source))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`,
/// along with the decoder's total duration when it knows one.
fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), SinkError> {
    let file = File::open(path).map_err(|source| SinkError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| SinkError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Put `built` into `slot`, retiring the previous value only once its
/// replacement exists.
fn install<T, E>(slot: &mut Option<T>, built: Result<T, E>, retire: impl FnOnce(T)) -> Result<(), E> {
    let fresh = built?;
    if let Some(old) = slot.replace(fresh) {
        retire(old);
    }
    Ok(())
}

/// `MediaSink` backed by the default rodio output device.
pub struct RodioSink {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,

    loaded: Option<Ticket>,
    load_error: Option<String>,
    total: Option<Duration>,
    /// Where the current rodio sink started inside the file.
    offset: Duration,
    playing: bool,
    drained: bool,
    volume: f32,

    events: Sender<EngineMsg>,
}

impl RodioSink {
    /// Open the default output device. Must run on the thread that keeps the sink.
    pub fn open(events: Sender<EngineMsg>) -> Result<Self, SinkError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| SinkError::NoDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; that would land on the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            path: None,
            loaded: None,
            load_error: None,
            total: None,
            offset: Duration::ZERO,
            playing: false,
            drained: false,
            volume: 1.0,
            events,
        })
    }

    fn emit(&self, ev: SinkEvent) {
        // The receiver is the engine loop that owns us.
        let _ = self.events.send(ev.into());
    }

    /// Replace the rodio sink with a fresh one starting at `at`. When the
    /// file can no longer be opened the old sink keeps running.
    fn rebuild_at(&mut self, at: Duration) -> Result<(), SinkError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let built = create_sink_at(&self.stream, &path, at).map(|(sink, _)| {
            sink.set_volume(self.volume);
            if self.playing {
                sink.play();
            }
            sink
        });
        install(&mut self.sink, built, |old| old.stop())?;
        self.offset = at;
        self.drained = false;
        Ok(())
    }

    fn position(&self) -> Duration {
        let played = self.sink.as_ref().map(Sink::get_pos).unwrap_or_default();
        self.offset + played
    }
}

impl MediaSink for RodioSink {
    fn load(&mut self, ticket: Ticket, source: &str) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let path = locator_path(source);

        self.loaded = Some(ticket);
        self.load_error = None;
        self.offset = Duration::ZERO;
        self.playing = false;
        self.drained = false;

        match create_sink_at(&self.stream, &path, Duration::ZERO) {
            Ok((sink, total)) => {
                sink.set_volume(self.volume);
                self.sink = Some(sink);
                self.total = total;
                self.path = Some(path);
                self.emit(SinkEvent::MetadataReady {
                    ticket,
                    duration: total.map(|d| d.as_secs_f64()),
                });
            }
            Err(e) => {
                warn!("{e}");
                self.total = None;
                self.path = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn start(&mut self, ticket: Ticket) {
        if self.sink.is_none() {
            let reason = self
                .load_error
                .clone()
                .unwrap_or_else(|| "nothing loaded".to_string());
            self.emit(SinkEvent::StartFailed { ticket, reason });
            return;
        }

        if self.drained {
            if let Err(e) = self.rebuild_at(Duration::ZERO) {
                self.emit(SinkEvent::StartFailed {
                    ticket,
                    reason: e.to_string(),
                });
                return;
            }
        }

        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.playing = true;
        self.emit(SinkEvent::Started { ticket });
    }

    fn halt(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.playing = false;
    }

    fn set_position(&mut self, seconds: f64) {
        if self.sink.is_none() {
            return;
        }
        let mut at = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::ZERO);
        if let Some(total) = self.total {
            at = at.min(total);
        }
        // Seeking rebuilds the sink and skips into the file; this works for
        // every format the decoder supports, seekable or not.
        if let Err(e) = self.rebuild_at(at) {
            warn!("seek failed: {e}");
        }
    }

    fn set_output_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0) as f32;
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let (Some(ticket), Some(sink)) = (self.loaded, self.sink.as_ref()) else {
            return;
        };

        if sink.empty() {
            if !self.drained {
                debug!("track drained");
                self.drained = true;
                self.playing = false;
                self.emit(SinkEvent::Completed { ticket });
            }
        } else {
            self.emit(SinkEvent::Progress {
                ticket,
                position: self.position().as_secs_f64(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_rebuild_keeps_the_running_sink() {
        let mut slot = Some("playing");
        let mut retired = Vec::new();

        let result = install(&mut slot, Err("file vanished"), |old| retired.push(old));

        assert_eq!(result, Err("file vanished"));
        assert_eq!(slot, Some("playing"));
        assert!(retired.is_empty());
    }

    #[test]
    fn successful_rebuild_retires_the_old_sink() {
        let mut slot = Some("old");
        let mut retired = Vec::new();

        install::<_, ()>(&mut slot, Ok("new"), |old| retired.push(old)).unwrap();

        assert_eq!(slot, Some("new"));
        assert_eq!(retired, vec!["old"]);
    }
}
