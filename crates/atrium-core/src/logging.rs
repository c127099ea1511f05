//! Structured logging schema and field name constants for the console.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log tooling can query by standardized names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Failed user action surfaced to the operator |
//! | WARN  | Recoverable issue (stale tenant selection, expired token) |
//! | INFO  | Lifecycle events (login, tenant switch), operation completions |
//! | DEBUG | Decision points, request shapes, config choices |
//! | TRACE | Per-item iteration (list filtering, stream chunks) |

/// Subsystem originating the log event.
/// Values: "session", "client", "state", "playground", "console"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "tenant_context", "mock_backend", "list_view", "compare"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "login", "switch_tenant", "bulk_delete", "rag"
pub const OPERATION: &str = "op";

/// Tenant UUID scoping the operation.
pub const TENANT_ID: &str = "tenant_id";

/// Knowledge base UUID being operated on.
pub const KB_ID: &str = "kb_id";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a list or query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of items processed so far in a bulk loop.
pub const APPLIED_COUNT: &str = "applied_count";

/// Model slug used for a generation request.
pub const MODEL: &str = "model";
