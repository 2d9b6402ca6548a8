//! Convergence scenarios for Quill.
//!
//! - `end_to_end` - the two-client walkthrough and concurrent edit races
//! - `faults` - malformed, lost and misdirected requests
//! - `properties` - arbitrary interleavings of many clients (proptest)
//! - `http` - the same guarantees over a real HTTP server

mod end_to_end;
mod faults;
mod http;
mod properties;

use edit_types::{Change, CharStyle};

pub(crate) fn insert(position: usize, text: &str) -> Change {
    Change::Insert {
        position,
        text: text.into(),
        style: CharStyle::PLAIN,
    }
}

pub(crate) fn delete(position: usize, num_chars: usize) -> Change {
    Change::Delete {
        position,
        num_chars,
    }
}
