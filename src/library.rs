//! Track catalog: the list views the player is fed from.
//!
//! Tracks come either from scanning a music directory or from a TOML "mix"
//! file. The queue engine never fetches from here; the UI hands it lists.

mod mix;
mod model;
mod scan;

pub use mix::*;
pub use model::*;
pub use scan::*;

#[cfg(test)]
mod tests;
