//! Note identifier generation.
//!
//! Note ids are 128 bits drawn from the operating system's CSPRNG,
//! rendered as 32 lowercase hex characters. The contract only asks
//! for global uniqueness and unguessability, so there is no UUID
//! version/variant structure in the value.

use rand::rngs::OsRng;
use rand::RngCore;

/// Length of a rendered note id in characters.
pub const NOTE_ID_LEN: usize = 32;

/// Generate a fresh note identifier.
///
/// Collision probability across 2^128 values is negligible; ids are
/// never reused even after the note they named is deleted.
pub fn new_note_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Check whether a string is shaped like a note id.
///
/// Used for cheap request validation before touching storage; a
/// well-formed id may still name no note.
pub fn is_note_id(s: &str) -> bool {
    s.len() == NOTE_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}
