//! Core traits for the Atrium console abstractions.
//!
//! The façade traits define the stable per-entity API contract. Each one is
//! implemented twice with identical signatures: over HTTP in `atrium-client`
//! and over the in-memory mock backend. The trait is the interface callers
//! program against, so swapping the mock for the live gateway is a pure
//! wiring change.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Stream of answer-text deltas from a streaming RAG response.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

// =============================================================================
// LIST-VIEW SUPPORT
// =============================================================================

/// An entity that can populate a list-detail view.
///
/// `haystack` is the text the client-side substring filter matches against
/// (name plus description where one exists).
pub trait Listable {
    fn id(&self) -> Uuid;
    fn haystack(&self) -> String;
}

impl Listable for KnowledgeBase {
    fn id(&self) -> Uuid {
        self.id
    }

    fn haystack(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} {}", self.name, desc),
            None => self.name.clone(),
        }
    }
}

impl Listable for Document {
    fn id(&self) -> Uuid {
        self.id
    }

    fn haystack(&self) -> String {
        self.name.clone()
    }
}

impl Listable for DataSource {
    fn id(&self) -> Uuid {
        self.id
    }

    fn haystack(&self) -> String {
        self.name.clone()
    }
}

impl Listable for Tenant {
    fn id(&self) -> Uuid {
        self.id
    }

    fn haystack(&self) -> String {
        self.name.clone()
    }
}

// =============================================================================
// KNOWLEDGE BASE FACADE
// =============================================================================

/// Knowledge-base CRUD operations.
#[async_trait]
pub trait KnowledgeBaseApi: Send + Sync {
    /// List all knowledge bases owned by a tenant.
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<KnowledgeBase>>;

    /// Fetch a single knowledge base.
    async fn get(&self, id: Uuid) -> Result<KnowledgeBase>;

    /// Create a knowledge base. New KBs start with zero documents and
    /// chunks.
    async fn create(&self, tenant_id: Uuid, req: CreateKnowledgeBaseRequest)
        -> Result<KnowledgeBase>;

    /// Partially update a knowledge base.
    async fn update(&self, id: Uuid, req: UpdateKnowledgeBaseRequest) -> Result<KnowledgeBase>;

    /// Delete a knowledge base. Cascading data loss happens server-side.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// DOCUMENT FACADE
// =============================================================================

/// Document operations within a knowledge base.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// List all documents in a knowledge base.
    async fn list(&self, kb_id: Uuid) -> Result<Vec<Document>>;

    /// Fetch a single document.
    async fn get(&self, id: Uuid) -> Result<Document>;

    /// Upload a document. Re-uploading an existing name bumps its version.
    async fn upload(&self, req: UploadDocumentRequest) -> Result<Document>;

    /// Soft-delete (archive) a document.
    async fn archive(&self, id: Uuid) -> Result<Document>;

    /// Permanently delete a document.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Roll a document back to an earlier version. The rollback itself
    /// creates a new, higher version number.
    async fn rollback(&self, id: Uuid, version: i32) -> Result<Document>;

    /// Version history for a document, newest first.
    async fn versions(&self, id: Uuid) -> Result<Vec<DocumentVersion>>;
}

// =============================================================================
// DATA SOURCE FACADE
// =============================================================================

/// Data-source connector operations.
#[async_trait]
pub trait DataSourceApi: Send + Sync {
    /// List all data sources attached to a knowledge base.
    async fn list(&self, kb_id: Uuid) -> Result<Vec<DataSource>>;

    /// Fetch a single data source.
    async fn get(&self, id: Uuid) -> Result<DataSource>;

    /// Create a data source.
    async fn create(&self, req: CreateDataSourceRequest) -> Result<DataSource>;

    /// Partially update a data source.
    async fn update(&self, id: Uuid, req: UpdateDataSourceRequest) -> Result<DataSource>;

    /// Delete a data source.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Pause an active connector.
    async fn pause(&self, id: Uuid) -> Result<DataSource>;

    /// Resume a paused connector.
    async fn resume(&self, id: Uuid) -> Result<DataSource>;

    /// Trigger an immediate sync run.
    async fn trigger_sync(&self, id: Uuid) -> Result<DataSource>;
}

// =============================================================================
// TENANT FACADE
// =============================================================================

/// Tenant administration operations.
#[async_trait]
pub trait TenantApi: Send + Sync {
    /// List all tenants the authenticated user may access.
    async fn list(&self) -> Result<Vec<Tenant>>;

    /// Fetch a single tenant.
    async fn get(&self, id: Uuid) -> Result<Tenant>;

    /// Create a tenant.
    async fn create(&self, req: CreateTenantRequest) -> Result<Tenant>;

    /// Partially update a tenant.
    async fn update(&self, id: Uuid, req: UpdateTenantRequest) -> Result<Tenant>;

    /// Delete a tenant.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// List users belonging to a tenant.
    async fn list_users(&self, tenant_id: Uuid) -> Result<Vec<TenantUser>>;

    /// Invite a user by email.
    async fn invite_user(&self, tenant_id: Uuid, req: InviteUserRequest) -> Result<TenantUser>;

    /// Remove a user from a tenant.
    async fn remove_user(&self, tenant_id: Uuid, user_id: Uuid) -> Result<()>;

    /// Fetch the admin audit log, newest first.
    async fn audit_log(&self, tenant_id: Uuid, limit: u32) -> Result<Vec<AuditLogEntry>>;

    /// Issue a new API key. The secret is returned exactly once.
    async fn issue_api_key(&self, tenant_id: Uuid, name: &str) -> Result<IssuedApiKey>;

    /// List API key metadata for a tenant.
    async fn list_api_keys(&self, tenant_id: Uuid) -> Result<Vec<ApiKey>>;
}

// =============================================================================
// PLAYGROUND FACADE
// =============================================================================

/// Interactive query operations under the `/query/*` prefix.
#[async_trait]
pub trait PlaygroundApi: Send + Sync {
    /// Vector search over indexed chunks.
    async fn search(&self, tenant_id: Uuid, req: SearchRequest) -> Result<SearchResponse>;

    /// Retrieval-augmented generation with citations.
    async fn rag(&self, tenant_id: Uuid, req: RagRequest) -> Result<RagResponse>;

    /// Streaming RAG: answer text arrives as incremental deltas until the
    /// stream terminates.
    async fn rag_stream(&self, tenant_id: Uuid, req: RagRequest) -> Result<TokenStream>;

    /// Structured field extraction from free text.
    async fn extract(&self, tenant_id: Uuid, req: ExtractRequest) -> Result<ExtractResponse>;
}
