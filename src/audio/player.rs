use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::store::SettingsStore;

use super::engine::EngineDefaults;
use super::thread::spawn_engine_thread;
use super::types::{AudioCmd, EngineMsg, PlayerSnapshot, SnapshotHandle};

/// Handle to the engine thread: send commands, read snapshots.
pub struct AudioPlayer {
    tx: Sender<EngineMsg>,
    snapshot: SnapshotHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new<St>(store: St, defaults: EngineDefaults) -> Self
    where
        St: SettingsStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<EngineMsg>();
        let snapshot: SnapshotHandle = Arc::new(Mutex::new(PlayerSnapshot::default()));

        let handle = spawn_engine_thread(tx.clone(), rx, snapshot.clone(), store, defaults);

        Self {
            tx,
            snapshot,
            join: Mutex::new(Some(handle)),
        }
    }

    /// Copy of the latest published state.
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<EngineMsg>> {
        self.tx.send(EngineMsg::Cmd(cmd))
    }

    /// Pause, stop the engine thread and wait for it.
    pub fn shutdown(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
