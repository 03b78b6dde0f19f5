//! User configuration: schema types and the file/env loader.
//!
//! Missing or invalid configuration never stops the player; the runtime
//! falls back to `Settings::default()`.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
