use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::error::PlayerError;
use crate::store::SettingsStore;

use super::engine::{EngineDefaults, QueueEngine};
use super::sink::{MediaSink, RodioSink};
use super::types::{AudioCmd, EngineMsg, SnapshotHandle};

/// How often the sink is polled for progress and completion.
const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_engine_thread<St>(
    tx: Sender<EngineMsg>,
    rx: Receiver<EngineMsg>,
    snapshot: SnapshotHandle,
    store: St,
    defaults: EngineDefaults,
) -> JoinHandle<()>
where
    St: SettingsStore + Send + 'static,
{
    thread::spawn(move || {
        // The output stream must be created on the thread that owns it.
        let sink = match RodioSink::open(tx) {
            Ok(sink) => sink,
            Err(e) => {
                error!("audio engine disabled: {e}");
                if let Ok(mut snap) = snapshot.lock() {
                    snap.notice = Some(e.to_string());
                }
                return;
            }
        };

        let engine = QueueEngine::new(sink, store, defaults);
        run_engine_loop(engine, &rx, &snapshot);
        info!("audio engine stopped");
    })
}

/// Process messages one at a time until `Quit` or the channel closes.
pub(super) fn run_engine_loop<S, St>(
    mut engine: QueueEngine<S, St>,
    rx: &Receiver<EngineMsg>,
    snapshot: &SnapshotHandle,
) where
    S: MediaSink,
    St: SettingsStore,
{
    let mut notice: Option<String> = None;
    let mut last_tick = Instant::now();
    publish(&engine, snapshot, &notice);

    loop {
        match rx.recv_timeout(TICK) {
            Ok(EngineMsg::Cmd(AudioCmd::Quit)) => {
                let _ = engine.apply(AudioCmd::Quit);
                publish(&engine, snapshot, &notice);
                break;
            }
            Ok(EngineMsg::Cmd(cmd)) => {
                // A fresh user command replaces whatever was shown before.
                notice = report(engine.apply(cmd));
            }
            Ok(EngineMsg::Sink(ev)) => {
                if let Some(msg) = report(engine.handle_sink_event(ev)) {
                    notice = Some(msg);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_tick.elapsed() >= TICK {
            engine.sink_mut().tick();
            last_tick = Instant::now();
        }
        publish(&engine, snapshot, &notice);
    }
}

fn report(result: Result<(), PlayerError>) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(e) => {
            warn!("{e}");
            Some(e.to_string())
        }
    }
}

fn publish<S, St>(engine: &QueueEngine<S, St>, snapshot: &SnapshotHandle, notice: &Option<String>)
where
    S: MediaSink,
    St: SettingsStore,
{
    if let Ok(mut snap) = snapshot.lock() {
        *snap = engine.snapshot(notice.clone());
    }
}
