//! Core data models for the Atrium console.
//!
//! These types are the wire shapes exchanged with the gateway. The console
//! owns no authoritative state — it caches and displays what the server
//! returns, so every field here is written by the backend and only read
//! locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// =============================================================================
// TENANT TYPES
// =============================================================================

/// Subscription plan for a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantPlan {
    Free,
    Pro,
    Enterprise,
}

impl std::fmt::Display for TenantPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Pro => write!(f, "pro"),
            Self::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Per-tenant operational limits, set server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSettings {
    pub rate_limit_per_minute: u32,
    pub max_documents: u64,
    pub max_storage_mb: u64,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: crate::defaults::RATE_LIMIT_PER_MINUTE,
            max_documents: crate::defaults::MAX_DOCUMENTS,
            max_storage_mb: crate::defaults::MAX_STORAGE_MB,
        }
    }
}

/// An isolated organizational scope owning knowledge bases, users, and
/// settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub plan: TenantPlan,
    pub settings: TenantSettings,
    pub created_at: DateTime<Utc>,
}

/// Role of a user within a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantRole {
    Owner,
    Admin,
    Member,
    Viewer,
}

/// Membership record of a user within a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: TenantRole,
    pub invited_at: DateTime<Utc>,
}

// =============================================================================
// KNOWLEDGE BASE TYPES
// =============================================================================

/// A named collection of indexed documents with a fixed embedding model.
///
/// `document_count` and `chunk_count` are server-computed aggregates; the
/// console never recomputes them client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub embedding_model: String,
    pub document_count: u64,
    pub chunk_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Ingestion status of a document.
///
/// Transitions are driven by the backend pipeline; the console observes
/// them but never drives them (except archiving, which is a soft delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Archived,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// A document inside a knowledge base.
///
/// `version` increases monotonically on every re-upload or rollback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub kb_id: Uuid,
    pub name: String,
    pub status: DocumentStatus,
    pub version: i32,
    pub chunk_count: u64,
    pub size_bytes: u64,
    pub content_type: String,
    /// Populated when status is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in a document's version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub version: i32,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================================
// DATA SOURCE TYPES
// =============================================================================

/// Connector status for an automated ingestion source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceStatus {
    Active,
    Paused,
    Error,
    Syncing,
}

impl std::fmt::Display for DataSourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Error => write!(f, "error"),
            Self::Syncing => write!(f, "syncing"),
        }
    }
}

/// Per-connector-type configuration, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceConfig {
    WebCrawler {
        start_url: String,
        max_depth: u32,
        /// Cron-style schedule string, interpreted server-side.
        #[serde(skip_serializing_if = "Option::is_none")]
        schedule: Option<String>,
    },
    ApiConnector {
        endpoint: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        auth_header: Option<String>,
        interval_minutes: u32,
    },
    FileWatcher {
        root_path: String,
        patterns: Vec<String>,
    },
}

impl DataSourceConfig {
    /// Connector type discriminant as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WebCrawler { .. } => "web_crawler",
            Self::ApiConnector { .. } => "api_connector",
            Self::FileWatcher { .. } => "file_watcher",
        }
    }
}

/// An automated ingestion connector feeding documents into a KB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub id: Uuid,
    pub kb_id: Uuid,
    pub name: String,
    pub status: DataSourceStatus,
    pub config: DataSourceConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
    pub document_count: u64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// PROMPT TYPES
// =============================================================================

/// A user-saved prompt, persisted in the local state store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPrompt {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    /// Placeholder names referenced as `{{name}}` in the content.
    pub variables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kb_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A built-in prompt template shipped with the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub content: String,
    pub variables: Vec<String>,
}

// =============================================================================
// ADMIN TYPES
// =============================================================================

/// One admin audit-log entry as returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub actor: String,
    pub action: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata for an issued API key (secret not included).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,
    pub name: String,
    /// First characters of the key, for display.
    pub prefix: String,
    pub created_at: DateTime<Utc>,
}

/// A freshly issued API key. The secret is shown exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedApiKey {
    pub key: ApiKey,
    pub secret: String,
}

// =============================================================================
// PLAYGROUND TYPES
// =============================================================================

/// Request for the `/query/search` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kb_id: Option<Uuid>,
}

/// One retrieved chunk from a search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub document_name: String,
    pub snippet: String,
    pub score: f32,
}

/// Response from the `/query/search` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub latency_ms: i64,
}

/// Request for the `/query/rag` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagRequest {
    pub query: String,
    pub top_k: u32,
    pub model: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kb_id: Option<Uuid>,
}

/// A source citation attached to a generated answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: Uuid,
    pub chunk_id: Uuid,
    pub snippet: String,
    pub score: f32,
}

/// Response from the `/query/rag` endpoint.
///
/// `answer` is always present (possibly a canned "no relevant context"
/// string); `citations` may be empty and the UI must render that state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub confidence: f32,
    pub model: String,
    pub latency_ms: i64,
}

/// Request for the `/query/extract` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    /// Field names to pull out of the text.
    pub fields: Vec<String>,
}

/// Response from the `/query/extract` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Extracted fields as a JSON object keyed by requested field name.
    pub fields: JsonValue,
    pub confidence: f32,
}

/// Per-model outcome of a comparison run.
///
/// A failed model still yields an entry: `error` carries the message and
/// `response` holds a placeholder answer with zero citations, so one
/// model's failure never hides the others' results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResult {
    pub model: String,
    pub response: RagResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// REQUEST DTOS
// =============================================================================

/// Request for creating a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to [`crate::defaults::EMBEDDING_MODEL`] when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

/// Request for updating a knowledge base (partial).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateKnowledgeBaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request for uploading a document into a KB.
///
/// Re-uploading under an existing name creates a new version of that
/// document rather than a second entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDocumentRequest {
    pub kb_id: Uuid,
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// Request for creating a data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDataSourceRequest {
    pub kb_id: Uuid,
    pub name: String,
    pub config: DataSourceConfig,
}

/// Request for updating a data source (partial).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDataSourceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<DataSourceConfig>,
}

/// Request for creating a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub plan: TenantPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<TenantSettings>,
}

/// Request for updating a tenant (partial).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenantRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<TenantPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<TenantSettings>,
}

/// Request for inviting a user into a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteUserRequest {
    pub email: String,
    pub role: TenantRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_config_tagged_serialization() {
        let config = DataSourceConfig::WebCrawler {
            start_url: "https://docs.example.com".to_string(),
            max_depth: 3,
            schedule: None,
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "web_crawler");
        assert_eq!(json["start_url"], "https://docs.example.com");
        assert_eq!(json["max_depth"], 3);
    }

    #[test]
    fn test_data_source_config_roundtrip_discriminant() {
        let config = DataSourceConfig::FileWatcher {
            root_path: "/srv/drop".to_string(),
            patterns: vec!["*.pdf".to_string()],
        };
        assert_eq!(config.kind(), "file_watcher");

        let json = serde_json::to_string(&config).unwrap();
        let back: DataSourceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_document_status_wire_format() {
        let json = serde_json::to_string(&DocumentStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let back: DocumentStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(back, DocumentStatus::Archived);
    }

    #[test]
    fn test_tenant_role_wire_format() {
        let json = serde_json::to_string(&TenantRole::Viewer).unwrap();
        assert_eq!(json, "\"viewer\"");
    }

    #[test]
    fn test_search_request_omits_missing_kb() {
        let req = SearchRequest {
            query: "quarterly report".to_string(),
            top_k: 5,
            kb_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("kb_id").is_none());
    }
}
