//! The access gate: owner-scoped visibility for notes.

use crate::models::Note;

/// True when `owner_id` matches the note's recorded owner.
///
/// Storage-layer fetch/update/delete paths consult this predicate and
/// report a mismatch as `NotFound`, identical to absence, so callers
/// cannot probe for the existence of other users' notes.
pub fn owns(note: &Note, owner_id: i64) -> bool {
    note.owner_id == owner_id
}
