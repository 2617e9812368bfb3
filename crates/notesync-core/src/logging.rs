//! Structured logging field name constants for notesync.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |

/// Correlation ID propagated through a request. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "notes", "users", "identity"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create", "list", "update", "delete", "register"
pub const OPERATION: &str = "op";

/// Note id being operated on.
pub const NOTE_ID: &str = "note_id";

/// Owning user id presented by the request.
pub const OWNER_ID: &str = "owner_id";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned by a list/query.
pub const RESULT_COUNT: &str = "result_count";
