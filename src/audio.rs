//! Playback: the queue engine, the media sink it drives, and the thread
//! and handle that host them.

mod engine;
mod player;
mod select;
mod sink;
mod thread;
mod types;

pub use engine::*;
pub use player::*;
pub use sink::*;
pub use types::*;
