//! Centralized default constants for the Atrium console.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// QUERY / PLAYGROUND
// =============================================================================

/// Default number of chunks retrieved per query.
pub const TOP_K: u32 = 5;

/// Maximum accepted `top_k` before client-side validation rejects the form.
pub const TOP_K_MAX: u32 = 50;

/// Default generation model slug for RAG and comparison runs.
pub const RAG_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature for RAG requests.
pub const TEMPERATURE: f32 = 0.2;

// =============================================================================
// KNOWLEDGE BASE
// =============================================================================

/// Default embedding model assigned to new knowledge bases.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Fixed overall request timeout (seconds). No per-request override, no
/// retry: one request per user action.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fallback gateway base URL when `ATRIUM_API_BASE` is unset.
pub const API_BASE: &str = "http://localhost:8080";

// =============================================================================
// TENANT LIMITS
// =============================================================================

/// Default per-tenant request rate limit.
pub const RATE_LIMIT_PER_MINUTE: u32 = 60;

/// Default per-tenant document cap.
pub const MAX_DOCUMENTS: u64 = 10_000;

/// Default per-tenant storage cap in megabytes.
pub const MAX_STORAGE_MB: u64 = 5_120;

// =============================================================================
// LOCAL STATE STORE
// =============================================================================

/// Store key holding the bearer token.
pub const KEY_AUTH_TOKEN: &str = "auth_token";

/// Store key holding the persisted current-tenant id.
pub const KEY_TENANT_ID: &str = "tenant_id";

/// Store key holding the JSON-serialized user preferences object.
pub const KEY_PREFERENCES: &str = "preferences";

/// Store key holding the JSON array of saved prompts.
pub const KEY_SAVED_PROMPTS: &str = "saved_prompts";

/// File name of the persisted state store inside the state directory.
pub const STATE_FILE: &str = "atrium_state.json";
