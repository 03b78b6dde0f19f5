//! Next-track selection.
//!
//! Shuffle picks a random index other than the cursor by re-drawing until it
//! differs. That drifts from uniform on short queues, which is accepted.

use rand::Rng;

use super::types::RepeatMode;

/// Outcome of asking for the track after the cursor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Move the cursor here and load it.
    To(usize),
    /// Nothing else to play; leave everything as is.
    Stay,
    /// The queue has finished.
    Finish,
}

pub(crate) fn next_index<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    cursor: usize,
    shuffle: bool,
    repeat: RepeatMode,
) -> Advance {
    if len == 0 {
        return Advance::Stay;
    }

    if shuffle {
        if len <= 1 {
            return Advance::Stay;
        }
        loop {
            let candidate = rng.random_range(0..len);
            if candidate != cursor {
                return Advance::To(candidate);
            }
        }
    }

    let candidate = cursor + 1;
    if candidate < len {
        Advance::To(candidate)
    } else if repeat == RepeatMode::All {
        Advance::To(0)
    } else {
        Advance::Finish
    }
}
