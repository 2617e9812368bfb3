//! # notesync-core
//!
//! Core types, traits, and abstractions for the notesync service.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the storage and API crates depend on.

pub mod error;
pub mod ids;
pub mod logging;
pub mod models;
pub mod ownership;
pub mod password;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use ids::new_note_id;
pub use models::{Note, User, DEFAULT_NOTE_TITLE};
pub use ownership::owns;
pub use password::{hash_password, verify_password};
pub use traits::{CreateNoteRequest, NoteRepository, UpdateNoteRequest, UserRepository};
