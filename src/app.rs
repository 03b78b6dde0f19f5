//! Application module: the UI model and the keyboard surface.

mod keys;
mod model;

pub use keys::*;
pub use model::*;

#[cfg(test)]
mod tests;
