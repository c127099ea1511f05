//! HTTP implementations of the per-entity façade traits.
//!
//! `HttpGateway` is the live counterpart of the mock backend: identical
//! trait signatures, real requests. Resource collections are scoped by
//! path; `/query/*` endpoints carry the tenant id in the request body as
//! the gateway expects.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use atrium_core::{
    ApiKey, AuditLogEntry, CreateDataSourceRequest, CreateKnowledgeBaseRequest,
    CreateTenantRequest, DataSource, DataSourceApi, Document, DocumentApi, DocumentVersion,
    ExtractRequest, ExtractResponse, InviteUserRequest, IssuedApiKey, KnowledgeBase,
    KnowledgeBaseApi, PlaygroundApi, RagRequest, RagResponse, Result, SearchRequest,
    SearchResponse, Tenant, TenantApi, TenantUser, TokenStream, UpdateDataSourceRequest,
    UpdateKnowledgeBaseRequest, UpdateTenantRequest, UploadDocumentRequest,
};

use crate::http::ApiClient;
use crate::sse;

/// Live gateway backend implementing every façade trait over HTTP.
#[derive(Clone)]
pub struct HttpGateway {
    client: Arc<ApiClient>,
}

/// Body wrapper stamping the tenant id onto `/query/*` requests.
#[derive(Serialize)]
struct QueryEnvelope<'a, T: Serialize> {
    tenant_id: Uuid,
    #[serde(flatten)]
    request: &'a T,
}

impl HttpGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// The underlying client, for wiring token/tenant updates.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl KnowledgeBaseApi for HttpGateway {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<KnowledgeBase>> {
        self.client
            .get_json(&format!("/tenants/{}/knowledge-bases", tenant_id))
            .await
    }

    async fn get(&self, id: Uuid) -> Result<KnowledgeBase> {
        self.client
            .get_json(&format!("/knowledge-bases/{}", id))
            .await
    }

    async fn create(
        &self,
        tenant_id: Uuid,
        req: CreateKnowledgeBaseRequest,
    ) -> Result<KnowledgeBase> {
        self.client
            .post_json(&format!("/tenants/{}/knowledge-bases", tenant_id), &req)
            .await
    }

    async fn update(&self, id: Uuid, req: UpdateKnowledgeBaseRequest) -> Result<KnowledgeBase> {
        self.client
            .patch_json(&format!("/knowledge-bases/{}", id), &req)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client.delete(&format!("/knowledge-bases/{}", id)).await
    }
}

#[async_trait]
impl DocumentApi for HttpGateway {
    async fn list(&self, kb_id: Uuid) -> Result<Vec<Document>> {
        self.client
            .get_json(&format!("/knowledge-bases/{}/documents", kb_id))
            .await
    }

    async fn get(&self, id: Uuid) -> Result<Document> {
        self.client.get_json(&format!("/documents/{}", id)).await
    }

    async fn upload(&self, req: UploadDocumentRequest) -> Result<Document> {
        self.client.post_json("/documents", &req).await
    }

    async fn archive(&self, id: Uuid) -> Result<Document> {
        self.client
            .post_action(&format!("/documents/{}/archive", id))
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client.delete(&format!("/documents/{}", id)).await
    }

    async fn rollback(&self, id: Uuid, version: i32) -> Result<Document> {
        #[derive(Serialize)]
        struct RollbackBody {
            version: i32,
        }
        self.client
            .post_json(
                &format!("/documents/{}/rollback", id),
                &RollbackBody { version },
            )
            .await
    }

    async fn versions(&self, id: Uuid) -> Result<Vec<DocumentVersion>> {
        self.client
            .get_json(&format!("/documents/{}/versions", id))
            .await
    }
}

#[async_trait]
impl DataSourceApi for HttpGateway {
    async fn list(&self, kb_id: Uuid) -> Result<Vec<DataSource>> {
        self.client
            .get_json(&format!("/knowledge-bases/{}/data-sources", kb_id))
            .await
    }

    async fn get(&self, id: Uuid) -> Result<DataSource> {
        self.client.get_json(&format!("/data-sources/{}", id)).await
    }

    async fn create(&self, req: CreateDataSourceRequest) -> Result<DataSource> {
        self.client.post_json("/data-sources", &req).await
    }

    async fn update(&self, id: Uuid, req: UpdateDataSourceRequest) -> Result<DataSource> {
        self.client
            .patch_json(&format!("/data-sources/{}", id), &req)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client.delete(&format!("/data-sources/{}", id)).await
    }

    async fn pause(&self, id: Uuid) -> Result<DataSource> {
        self.client
            .post_action(&format!("/data-sources/{}/pause", id))
            .await
    }

    async fn resume(&self, id: Uuid) -> Result<DataSource> {
        self.client
            .post_action(&format!("/data-sources/{}/resume", id))
            .await
    }

    async fn trigger_sync(&self, id: Uuid) -> Result<DataSource> {
        self.client
            .post_action(&format!("/data-sources/{}/sync", id))
            .await
    }
}

#[async_trait]
impl TenantApi for HttpGateway {
    async fn list(&self) -> Result<Vec<Tenant>> {
        self.client.get_json("/tenants").await
    }

    async fn get(&self, id: Uuid) -> Result<Tenant> {
        self.client.get_json(&format!("/tenants/{}", id)).await
    }

    async fn create(&self, req: CreateTenantRequest) -> Result<Tenant> {
        self.client.post_json("/tenants", &req).await
    }

    async fn update(&self, id: Uuid, req: UpdateTenantRequest) -> Result<Tenant> {
        self.client
            .patch_json(&format!("/tenants/{}", id), &req)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client.delete(&format!("/tenants/{}", id)).await
    }

    async fn list_users(&self, tenant_id: Uuid) -> Result<Vec<TenantUser>> {
        self.client
            .get_json(&format!("/tenants/{}/users", tenant_id))
            .await
    }

    async fn invite_user(&self, tenant_id: Uuid, req: InviteUserRequest) -> Result<TenantUser> {
        self.client
            .post_json(&format!("/tenants/{}/users", tenant_id), &req)
            .await
    }

    async fn remove_user(&self, tenant_id: Uuid, user_id: Uuid) -> Result<()> {
        self.client
            .delete(&format!("/tenants/{}/users/{}", tenant_id, user_id))
            .await
    }

    async fn audit_log(&self, tenant_id: Uuid, limit: u32) -> Result<Vec<AuditLogEntry>> {
        self.client
            .get_json(&format!(
                "/admin/audit-log?tenant_id={}&limit={}",
                tenant_id, limit
            ))
            .await
    }

    async fn issue_api_key(&self, tenant_id: Uuid, name: &str) -> Result<IssuedApiKey> {
        #[derive(Serialize)]
        struct IssueBody<'a> {
            tenant_id: Uuid,
            name: &'a str,
        }
        self.client
            .post_json("/auth/api-keys", &IssueBody { tenant_id, name })
            .await
    }

    async fn list_api_keys(&self, tenant_id: Uuid) -> Result<Vec<ApiKey>> {
        self.client
            .get_json(&format!("/auth/api-keys?tenant_id={}", tenant_id))
            .await
    }
}

#[async_trait]
impl PlaygroundApi for HttpGateway {
    async fn search(&self, tenant_id: Uuid, req: SearchRequest) -> Result<SearchResponse> {
        self.client
            .post_json(
                "/query/search",
                &QueryEnvelope {
                    tenant_id,
                    request: &req,
                },
            )
            .await
    }

    async fn rag(&self, tenant_id: Uuid, req: RagRequest) -> Result<RagResponse> {
        self.client
            .post_json(
                "/query/rag",
                &QueryEnvelope {
                    tenant_id,
                    request: &req,
                },
            )
            .await
    }

    async fn rag_stream(&self, tenant_id: Uuid, req: RagRequest) -> Result<TokenStream> {
        let stream = self
            .client
            .post_stream(
                "/query/rag/stream",
                &QueryEnvelope {
                    tenant_id,
                    request: &req,
                },
            )
            .await?;
        Ok(sse::token_stream(stream))
    }

    async fn extract(&self, tenant_id: Uuid, req: ExtractRequest) -> Result<ExtractResponse> {
        self.client
            .post_json(
                "/query/extract",
                &QueryEnvelope {
                    tenant_id,
                    request: &req,
                },
            )
            .await
    }
}
