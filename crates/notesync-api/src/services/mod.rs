//! Service layer for notesync-api.
//!
//! Services sit between the HTTP handlers and the repositories: they
//! validate field presence, delegate to storage, and keep all
//! ownership and timestamp logic out of the transport layer.

pub mod identity;
pub mod notes;

pub use identity::IdentityService;
pub use notes::{NoteService, RenderedNote};
