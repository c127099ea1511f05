//! In-memory mock backend with simulated latency.
//!
//! Placeholder counterpart of [`crate::facades::HttpGateway`]: identical
//! façade-trait signatures over an in-memory store, so callers written
//! against the traits keep working unchanged when the live gateway replaces
//! the mock. The store behaves like the server it stands in for — it owns
//! the aggregates (`document_count`, `chunk_count`) and the version
//! counters; the console never recomputes them.
//!
//! Failure injection (`fail_next`, `poison`) exists so error paths — bulk
//! loop aborts, per-model comparison failures, 401 teardown — can be
//! exercised deterministically.

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use atrium_core::{defaults, *};

/// Mock gateway backend for demos and tests.
#[derive(Clone)]
pub struct MockBackend {
    store: Arc<Mutex<MockStore>>,
    latency_ms: u64,
}

#[derive(Default)]
struct MockStore {
    tenants: Vec<Tenant>,
    users: HashMap<Uuid, Vec<TenantUser>>,
    kbs: Vec<KnowledgeBase>,
    documents: Vec<Document>,
    versions: HashMap<Uuid, Vec<DocumentVersion>>,
    sources: Vec<DataSource>,
    audit: Vec<AuditLogEntry>,
    api_keys: HashMap<Uuid, Vec<ApiKey>>,
    /// Ids whose next operation fails.
    poisoned: HashSet<Uuid>,
    /// Model slugs whose generation requests fail.
    failed_models: HashSet<String>,
    /// Error returned by the very next operation, whatever it is.
    fail_next: Option<Error>,
}

// Deterministic seed ids so demos and tests can reference fixtures.
pub const TENANT_ACME: Uuid = Uuid::from_u128(0xA1);
pub const TENANT_GLOBEX: Uuid = Uuid::from_u128(0xA2);
pub const KB_PRODUCT_DOCS: Uuid = Uuid::from_u128(0xB1);
pub const KB_SUPPORT: Uuid = Uuid::from_u128(0xB2);
pub const KB_GLOBEX_WIKI: Uuid = Uuid::from_u128(0xB3);

impl MockBackend {
    /// Empty mock backend with no latency.
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(MockStore::default())),
            latency_ms: 0,
        }
    }

    /// Set simulated latency applied before every operation.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Seed deterministic demo data: two tenants, three knowledge bases,
    /// documents in various ingestion states, and two connectors.
    pub fn with_seed_data(self) -> Self {
        {
            let mut store = self.store.lock().expect("mock store poisoned");
            store.seed();
        }
        self
    }

    /// Make the very next operation fail with `err`.
    pub fn fail_next(&self, err: Error) {
        self.store.lock().expect("mock store poisoned").fail_next = Some(err);
    }

    /// Make every operation targeting `id` fail until unpoisoned.
    pub fn poison(&self, id: Uuid) {
        self.store
            .lock()
            .expect("mock store poisoned")
            .poisoned
            .insert(id);
    }

    /// Make generation requests for `model` fail (comparison-mode error
    /// paths).
    pub fn fail_model(&self, model: &str) {
        self.store
            .lock()
            .expect("mock store poisoned")
            .failed_models
            .insert(model.to_string());
    }

    /// Clear a poisoned id.
    pub fn unpoison(&self, id: Uuid) {
        self.store
            .lock()
            .expect("mock store poisoned")
            .poisoned
            .remove(&id);
    }

    async fn simulate(&self, op: &str, target: Option<Uuid>) -> Result<()> {
        if self.latency_ms > 0 {
            let jitter = rand::thread_rng().gen_range(0..=self.latency_ms / 4);
            tokio::time::sleep(Duration::from_millis(self.latency_ms + jitter)).await;
        }

        let mut store = self.store.lock().expect("mock store poisoned");
        if let Some(err) = store.fail_next.take() {
            debug!(op, "mock: injected failure");
            return Err(err);
        }
        if let Some(id) = target {
            if store.poisoned.contains(&id) {
                debug!(op, id = %id, "mock: poisoned target");
                return Err(Error::Server(format!("simulated failure for {}", id)));
            }
        }
        Ok(())
    }

    fn record_audit(store: &mut MockStore, tenant_id: Uuid, action: &str, target: String) {
        store.audit.push(AuditLogEntry {
            id: Uuid::new_v4(),
            tenant_id,
            actor: "console".to_string(),
            action: action.to_string(),
            target,
            created_at: Utc::now(),
        });
    }

    // Completed documents visible to a tenant, optionally narrowed to one KB.
    fn retrieval_pool(store: &MockStore, tenant_id: Uuid, kb_id: Option<Uuid>) -> Vec<Document> {
        let kb_ids: HashSet<Uuid> = store
            .kbs
            .iter()
            .filter(|kb| kb.tenant_id == tenant_id)
            .filter(|kb| kb_id.map_or(true, |id| kb.id == id))
            .map(|kb| kb.id)
            .collect();

        store
            .documents
            .iter()
            .filter(|d| kb_ids.contains(&d.kb_id) && d.status == DocumentStatus::Completed)
            .cloned()
            .collect()
    }

    fn compose_answer(query: &str, pool: &[Document]) -> (String, f32) {
        if pool.is_empty() {
            (
                format!(
                    "No indexed context was found for \"{}\". Upload documents or connect a data source to get grounded answers.",
                    query
                ),
                0.2,
            )
        } else {
            (
                format!(
                    "Based on {} indexed document(s): {} — see the citations for the supporting passages.",
                    pool.len(),
                    query
                ),
                0.87,
            )
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    fn seed(&mut self) {
        let now = Utc::now();

        self.tenants = vec![
            Tenant {
                id: TENANT_ACME,
                name: "Acme Industries".to_string(),
                plan: TenantPlan::Pro,
                settings: TenantSettings::default(),
                created_at: now,
            },
            Tenant {
                id: TENANT_GLOBEX,
                name: "Globex Labs".to_string(),
                plan: TenantPlan::Free,
                settings: TenantSettings {
                    rate_limit_per_minute: 20,
                    max_documents: 500,
                    max_storage_mb: 512,
                },
                created_at: now,
            },
        ];

        self.users.insert(
            TENANT_ACME,
            vec![
                TenantUser {
                    user_id: Uuid::from_u128(0xC1),
                    email: "owner@acme.test".to_string(),
                    role: TenantRole::Owner,
                    invited_at: now,
                },
                TenantUser {
                    user_id: Uuid::from_u128(0xC2),
                    email: "analyst@acme.test".to_string(),
                    role: TenantRole::Member,
                    invited_at: now,
                },
            ],
        );

        self.kbs = vec![
            KnowledgeBase {
                id: KB_PRODUCT_DOCS,
                tenant_id: TENANT_ACME,
                name: "Product Docs".to_string(),
                description: Some("User guides and API references".to_string()),
                embedding_model: defaults::EMBEDDING_MODEL.to_string(),
                document_count: 3,
                chunk_count: 42,
                created_at: now,
                updated_at: now,
            },
            KnowledgeBase {
                id: KB_SUPPORT,
                tenant_id: TENANT_ACME,
                name: "Support Tickets".to_string(),
                description: None,
                embedding_model: defaults::EMBEDDING_MODEL.to_string(),
                document_count: 0,
                chunk_count: 0,
                created_at: now,
                updated_at: now,
            },
            KnowledgeBase {
                id: KB_GLOBEX_WIKI,
                tenant_id: TENANT_GLOBEX,
                name: "Internal Wiki".to_string(),
                description: Some("Engineering wiki export".to_string()),
                embedding_model: defaults::EMBEDDING_MODEL.to_string(),
                document_count: 0,
                chunk_count: 0,
                created_at: now,
                updated_at: now,
            },
        ];

        let doc = |id: u128, name: &str, status: DocumentStatus, version: i32, chunks: u64| {
            Document {
                id: Uuid::from_u128(id),
                kb_id: KB_PRODUCT_DOCS,
                name: name.to_string(),
                status,
                version,
                chunk_count: chunks,
                size_bytes: 64_000,
                content_type: "application/pdf".to_string(),
                error: if status == DocumentStatus::Failed {
                    Some("unsupported encoding on page 4".to_string())
                } else {
                    None
                },
                created_at: now,
                updated_at: now,
            }
        };
        self.documents = vec![
            doc(0xD1, "getting-started.pdf", DocumentStatus::Completed, 2, 18),
            doc(0xD2, "api-reference.pdf", DocumentStatus::Completed, 1, 24),
            doc(0xD3, "legacy-manual.pdf", DocumentStatus::Failed, 1, 0),
        ];
        self.versions.insert(
            Uuid::from_u128(0xD1),
            vec![
                DocumentVersion {
                    version: 2,
                    size_bytes: 64_000,
                    created_at: now,
                    note: Some("re-uploaded with fixed diagrams".to_string()),
                },
                DocumentVersion {
                    version: 1,
                    size_bytes: 61_500,
                    created_at: now,
                    note: None,
                },
            ],
        );

        self.sources = vec![
            DataSource {
                id: Uuid::from_u128(0xE1),
                kb_id: KB_PRODUCT_DOCS,
                name: "docs site crawler".to_string(),
                status: DataSourceStatus::Active,
                config: DataSourceConfig::WebCrawler {
                    start_url: "https://docs.acme.test".to_string(),
                    max_depth: 3,
                    schedule: Some("0 2 * * *".to_string()),
                },
                last_sync_at: Some(now),
                document_count: 2,
                created_at: now,
            },
            DataSource {
                id: Uuid::from_u128(0xE2),
                kb_id: KB_PRODUCT_DOCS,
                name: "release notes watcher".to_string(),
                status: DataSourceStatus::Paused,
                config: DataSourceConfig::FileWatcher {
                    root_path: "/srv/releases".to_string(),
                    patterns: vec!["*.md".to_string()],
                },
                last_sync_at: None,
                document_count: 1,
                created_at: now,
            },
        ];
    }
}

#[async_trait]
impl KnowledgeBaseApi for MockBackend {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<KnowledgeBase>> {
        self.simulate("kb.list", Some(tenant_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        Ok(store
            .kbs
            .iter()
            .filter(|kb| kb.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<KnowledgeBase> {
        self.simulate("kb.get", Some(id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        store
            .kbs
            .iter()
            .find(|kb| kb.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("knowledge base {}", id)))
    }

    async fn create(
        &self,
        tenant_id: Uuid,
        req: CreateKnowledgeBaseRequest,
    ) -> Result<KnowledgeBase> {
        self.simulate("kb.create", Some(tenant_id)).await?;
        if req.name.trim().is_empty() {
            return Err(Error::Validation("knowledge base name is required".to_string()));
        }

        let now = Utc::now();
        let kb = KnowledgeBase {
            id: Uuid::new_v4(),
            tenant_id,
            name: req.name,
            description: req.description,
            embedding_model: req
                .embedding_model
                .unwrap_or_else(|| defaults::EMBEDDING_MODEL.to_string()),
            document_count: 0,
            chunk_count: 0,
            created_at: now,
            updated_at: now,
        };

        let mut store = self.store.lock().expect("mock store poisoned");
        store.kbs.insert(0, kb.clone());
        Self::record_audit(&mut store, tenant_id, "kb.create", kb.name.clone());
        Ok(kb)
    }

    async fn update(&self, id: Uuid, req: UpdateKnowledgeBaseRequest) -> Result<KnowledgeBase> {
        self.simulate("kb.update", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let kb = store
            .kbs
            .iter_mut()
            .find(|kb| kb.id == id)
            .ok_or_else(|| Error::NotFound(format!("knowledge base {}", id)))?;

        if let Some(name) = req.name {
            kb.name = name;
        }
        if let Some(description) = req.description {
            kb.description = Some(description);
        }
        kb.updated_at = Utc::now();
        Ok(kb.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.simulate("kb.delete", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let before = store.kbs.len();
        store.kbs.retain(|kb| kb.id != id);
        if store.kbs.len() == before {
            return Err(Error::NotFound(format!("knowledge base {}", id)));
        }
        // Cascade, as the real backend would.
        store.documents.retain(|d| d.kb_id != id);
        store.sources.retain(|s| s.kb_id != id);
        Ok(())
    }
}

#[async_trait]
impl DocumentApi for MockBackend {
    async fn list(&self, kb_id: Uuid) -> Result<Vec<Document>> {
        self.simulate("document.list", Some(kb_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        Ok(store
            .documents
            .iter()
            .filter(|d| d.kb_id == kb_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Document> {
        self.simulate("document.get", Some(id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        store
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("document {}", id)))
    }

    async fn upload(&self, req: UploadDocumentRequest) -> Result<Document> {
        self.simulate("document.upload", Some(req.kb_id)).await?;
        if req.name.trim().is_empty() {
            return Err(Error::Validation("document name is required".to_string()));
        }

        let now = Utc::now();
        let mut store = self.store.lock().expect("mock store poisoned");
        if !store.kbs.iter().any(|kb| kb.id == req.kb_id) {
            return Err(Error::NotFound(format!("knowledge base {}", req.kb_id)));
        }

        // Re-upload under an existing name bumps the version of that
        // document instead of creating a second entry.
        if let Some(doc) = store
            .documents
            .iter_mut()
            .find(|d| d.kb_id == req.kb_id && d.name == req.name)
        {
            doc.version += 1;
            doc.status = DocumentStatus::Pending;
            doc.size_bytes = req.size_bytes;
            doc.content_type = req.content_type;
            doc.chunk_count = 0;
            doc.error = None;
            doc.updated_at = now;
            let updated = doc.clone();
            store.versions.entry(updated.id).or_default().insert(
                0,
                DocumentVersion {
                    version: updated.version,
                    size_bytes: updated.size_bytes,
                    created_at: now,
                    note: Some("re-upload".to_string()),
                },
            );
            return Ok(updated);
        }

        let doc = Document {
            id: Uuid::new_v4(),
            kb_id: req.kb_id,
            name: req.name,
            status: DocumentStatus::Pending,
            version: 1,
            chunk_count: 0,
            size_bytes: req.size_bytes,
            content_type: req.content_type,
            error: None,
            created_at: now,
            updated_at: now,
        };
        store.versions.insert(
            doc.id,
            vec![DocumentVersion {
                version: 1,
                size_bytes: doc.size_bytes,
                created_at: now,
                note: None,
            }],
        );
        store.documents.insert(0, doc.clone());
        if let Some(kb) = store.kbs.iter_mut().find(|kb| kb.id == doc.kb_id) {
            kb.document_count += 1;
            kb.updated_at = now;
        }
        Ok(doc)
    }

    async fn archive(&self, id: Uuid) -> Result<Document> {
        self.simulate("document.archive", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let doc = store
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::NotFound(format!("document {}", id)))?;
        doc.status = DocumentStatus::Archived;
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.simulate("document.delete", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let doc = store
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("document {}", id)))?;

        store.documents.retain(|d| d.id != id);
        store.versions.remove(&id);
        if let Some(kb) = store.kbs.iter_mut().find(|kb| kb.id == doc.kb_id) {
            kb.document_count = kb.document_count.saturating_sub(1);
            kb.chunk_count = kb.chunk_count.saturating_sub(doc.chunk_count);
        }
        Ok(())
    }

    async fn rollback(&self, id: Uuid, version: i32) -> Result<Document> {
        self.simulate("document.rollback", Some(id)).await?;
        let now = Utc::now();
        let mut store = self.store.lock().expect("mock store poisoned");

        let known = store
            .versions
            .get(&id)
            .map(|vs| vs.iter().any(|v| v.version == version))
            .unwrap_or(false);
        if !known {
            return Err(Error::Validation(format!(
                "document {} has no version {}",
                id, version
            )));
        }

        let doc = store
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::NotFound(format!("document {}", id)))?;

        // A rollback is itself a new, higher version.
        doc.version += 1;
        doc.status = DocumentStatus::Pending;
        doc.updated_at = now;
        let updated = doc.clone();
        store.versions.entry(id).or_default().insert(
            0,
            DocumentVersion {
                version: updated.version,
                size_bytes: updated.size_bytes,
                created_at: now,
                note: Some(format!("rollback to v{}", version)),
            },
        );
        Ok(updated)
    }

    async fn versions(&self, id: Uuid) -> Result<Vec<DocumentVersion>> {
        self.simulate("document.versions", Some(id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        store
            .versions
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("document {}", id)))
    }
}

#[async_trait]
impl DataSourceApi for MockBackend {
    async fn list(&self, kb_id: Uuid) -> Result<Vec<DataSource>> {
        self.simulate("data_source.list", Some(kb_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        Ok(store
            .sources
            .iter()
            .filter(|s| s.kb_id == kb_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<DataSource> {
        self.simulate("data_source.get", Some(id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        store
            .sources
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("data source {}", id)))
    }

    async fn create(&self, req: CreateDataSourceRequest) -> Result<DataSource> {
        self.simulate("data_source.create", Some(req.kb_id)).await?;
        if req.name.trim().is_empty() {
            return Err(Error::Validation("data source name is required".to_string()));
        }

        let mut store = self.store.lock().expect("mock store poisoned");
        if !store.kbs.iter().any(|kb| kb.id == req.kb_id) {
            return Err(Error::NotFound(format!("knowledge base {}", req.kb_id)));
        }

        let source = DataSource {
            id: Uuid::new_v4(),
            kb_id: req.kb_id,
            name: req.name,
            status: DataSourceStatus::Active,
            config: req.config,
            last_sync_at: None,
            document_count: 0,
            created_at: Utc::now(),
        };
        store.sources.insert(0, source.clone());
        Ok(source)
    }

    async fn update(&self, id: Uuid, req: UpdateDataSourceRequest) -> Result<DataSource> {
        self.simulate("data_source.update", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let source = store
            .sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("data source {}", id)))?;

        if let Some(name) = req.name {
            source.name = name;
        }
        if let Some(config) = req.config {
            source.config = config;
        }
        Ok(source.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.simulate("data_source.delete", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let before = store.sources.len();
        store.sources.retain(|s| s.id != id);
        if store.sources.len() == before {
            return Err(Error::NotFound(format!("data source {}", id)));
        }
        Ok(())
    }

    async fn pause(&self, id: Uuid) -> Result<DataSource> {
        self.set_status(id, "data_source.pause", DataSourceStatus::Paused, false)
            .await
    }

    async fn resume(&self, id: Uuid) -> Result<DataSource> {
        self.set_status(id, "data_source.resume", DataSourceStatus::Active, false)
            .await
    }

    async fn trigger_sync(&self, id: Uuid) -> Result<DataSource> {
        self.set_status(id, "data_source.sync", DataSourceStatus::Syncing, true)
            .await
    }
}

impl MockBackend {
    async fn set_status(
        &self,
        id: Uuid,
        op: &str,
        status: DataSourceStatus,
        touch_sync: bool,
    ) -> Result<DataSource> {
        self.simulate(op, Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let source = store
            .sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("data source {}", id)))?;
        source.status = status;
        if touch_sync {
            source.last_sync_at = Some(Utc::now());
        }
        Ok(source.clone())
    }
}

#[async_trait]
impl TenantApi for MockBackend {
    async fn list(&self) -> Result<Vec<Tenant>> {
        self.simulate("tenant.list", None).await?;
        let store = self.store.lock().expect("mock store poisoned");
        Ok(store.tenants.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Tenant> {
        self.simulate("tenant.get", Some(id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        store
            .tenants
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("tenant {}", id)))
    }

    async fn create(&self, req: CreateTenantRequest) -> Result<Tenant> {
        self.simulate("tenant.create", None).await?;
        if req.name.trim().is_empty() {
            return Err(Error::Validation("tenant name is required".to_string()));
        }

        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: req.name,
            plan: req.plan,
            settings: req.settings.unwrap_or_default(),
            created_at: Utc::now(),
        };
        let mut store = self.store.lock().expect("mock store poisoned");
        store.tenants.push(tenant.clone());
        Self::record_audit(&mut store, tenant.id, "tenant.create", tenant.name.clone());
        Ok(tenant)
    }

    async fn update(&self, id: Uuid, req: UpdateTenantRequest) -> Result<Tenant> {
        self.simulate("tenant.update", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let tenant = store
            .tenants
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("tenant {}", id)))?;

        if let Some(name) = req.name {
            tenant.name = name;
        }
        if let Some(plan) = req.plan {
            tenant.plan = plan;
        }
        if let Some(settings) = req.settings {
            tenant.settings = settings;
        }
        let updated = tenant.clone();
        Self::record_audit(&mut store, id, "tenant.update", updated.name.clone());
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.simulate("tenant.delete", Some(id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let before = store.tenants.len();
        store.tenants.retain(|t| t.id != id);
        if store.tenants.len() == before {
            return Err(Error::NotFound(format!("tenant {}", id)));
        }
        let kb_ids: HashSet<Uuid> = store
            .kbs
            .iter()
            .filter(|kb| kb.tenant_id == id)
            .map(|kb| kb.id)
            .collect();
        store.kbs.retain(|kb| kb.tenant_id != id);
        store.documents.retain(|d| !kb_ids.contains(&d.kb_id));
        store.sources.retain(|s| !kb_ids.contains(&s.kb_id));
        store.users.remove(&id);
        Ok(())
    }

    async fn list_users(&self, tenant_id: Uuid) -> Result<Vec<TenantUser>> {
        self.simulate("tenant.list_users", Some(tenant_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        Ok(store.users.get(&tenant_id).cloned().unwrap_or_default())
    }

    async fn invite_user(&self, tenant_id: Uuid, req: InviteUserRequest) -> Result<TenantUser> {
        self.simulate("tenant.invite_user", Some(tenant_id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        if !store.tenants.iter().any(|t| t.id == tenant_id) {
            return Err(Error::NotFound(format!("tenant {}", tenant_id)));
        }

        let members = store.users.entry(tenant_id).or_default();
        if members.iter().any(|u| u.email == req.email) {
            return Err(Error::Validation(format!(
                "{} is already a member",
                req.email
            )));
        }

        let user = TenantUser {
            user_id: Uuid::new_v4(),
            email: req.email,
            role: req.role,
            invited_at: Utc::now(),
        };
        members.push(user.clone());
        Self::record_audit(&mut store, tenant_id, "tenant.invite", user.email.clone());
        Ok(user)
    }

    async fn remove_user(&self, tenant_id: Uuid, user_id: Uuid) -> Result<()> {
        self.simulate("tenant.remove_user", Some(user_id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        let members = store
            .users
            .get_mut(&tenant_id)
            .ok_or_else(|| Error::NotFound(format!("tenant {}", tenant_id)))?;
        let before = members.len();
        members.retain(|u| u.user_id != user_id);
        if members.len() == before {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn audit_log(&self, tenant_id: Uuid, limit: u32) -> Result<Vec<AuditLogEntry>> {
        self.simulate("tenant.audit_log", Some(tenant_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        let mut entries: Vec<AuditLogEntry> = store
            .audit
            .iter()
            .filter(|e| e.tenant_id == tenant_id)
            .cloned()
            .collect();
        entries.reverse(); // newest first
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn issue_api_key(&self, tenant_id: Uuid, name: &str) -> Result<IssuedApiKey> {
        self.simulate("tenant.issue_api_key", Some(tenant_id)).await?;
        let mut store = self.store.lock().expect("mock store poisoned");
        if !store.tenants.iter().any(|t| t.id == tenant_id) {
            return Err(Error::NotFound(format!("tenant {}", tenant_id)));
        }

        let raw = Uuid::new_v4().simple().to_string();
        let key = ApiKey {
            id: Uuid::new_v4(),
            name: name.to_string(),
            prefix: format!("atr_{}", &raw[..8]),
            created_at: Utc::now(),
        };
        store
            .api_keys
            .entry(tenant_id)
            .or_default()
            .push(key.clone());
        Self::record_audit(&mut store, tenant_id, "api_key.issue", key.name.clone());
        Ok(IssuedApiKey {
            key,
            secret: format!("atr_sk_{}", raw),
        })
    }

    async fn list_api_keys(&self, tenant_id: Uuid) -> Result<Vec<ApiKey>> {
        self.simulate("tenant.list_api_keys", Some(tenant_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        Ok(store.api_keys.get(&tenant_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl PlaygroundApi for MockBackend {
    async fn search(&self, tenant_id: Uuid, req: SearchRequest) -> Result<SearchResponse> {
        self.simulate("query.search", Some(tenant_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        let pool = Self::retrieval_pool(&store, tenant_id, req.kb_id);

        let hits = pool
            .iter()
            .take(req.top_k as usize)
            .enumerate()
            .map(|(i, doc)| SearchHit {
                chunk_id: Uuid::new_v4(),
                document_id: doc.id,
                document_name: doc.name.clone(),
                snippet: format!("… passage from {} matching \"{}\" …", doc.name, req.query),
                score: (0.95 - 0.07 * i as f32).max(0.1),
            })
            .collect();

        Ok(SearchResponse {
            hits,
            latency_ms: self.latency_ms as i64,
        })
    }

    async fn rag(&self, tenant_id: Uuid, req: RagRequest) -> Result<RagResponse> {
        self.simulate("query.rag", Some(tenant_id)).await?;
        let store = self.store.lock().expect("mock store poisoned");
        if store.failed_models.contains(&req.model) {
            return Err(Error::Server(format!(
                "model {} is unavailable",
                req.model
            )));
        }
        let pool = Self::retrieval_pool(&store, tenant_id, req.kb_id);
        let (answer, confidence) = Self::compose_answer(&req.query, &pool);

        let citations = pool
            .iter()
            .take(req.top_k as usize)
            .enumerate()
            .map(|(i, doc)| Citation {
                document_id: doc.id,
                chunk_id: Uuid::new_v4(),
                snippet: format!("… supporting passage from {} …", doc.name),
                score: (0.9 - 0.05 * i as f32).max(0.1),
            })
            .collect();

        Ok(RagResponse {
            answer,
            citations,
            confidence,
            model: req.model,
            latency_ms: self.latency_ms as i64,
        })
    }

    async fn rag_stream(&self, tenant_id: Uuid, req: RagRequest) -> Result<TokenStream> {
        let response = self.rag(tenant_id, req).await?;
        // Stream the composed answer word by word, as the gateway would.
        let tokens: Vec<Result<String>> = response
            .answer
            .split_inclusive(' ')
            .map(|w| Ok(w.to_string()))
            .collect();
        Ok(futures::stream::iter(tokens).boxed())
    }

    async fn extract(&self, tenant_id: Uuid, req: ExtractRequest) -> Result<ExtractResponse> {
        self.simulate("query.extract", Some(tenant_id)).await?;
        if req.fields.is_empty() {
            return Err(Error::Validation(
                "at least one field to extract is required".to_string(),
            ));
        }

        // Naive "field: value" extraction, deterministic for tests/demos.
        let mut fields = serde_json::Map::new();
        let mut found = 0usize;
        for field in &req.fields {
            let needle = format!("{}:", field);
            let value = req.text.find(&needle).map(|pos| {
                let rest = &req.text[pos + needle.len()..];
                rest.split(|c| c == ',' || c == '\n' || c == ';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_string()
            });
            match value {
                Some(v) if !v.is_empty() => {
                    found += 1;
                    fields.insert(field.clone(), serde_json::Value::String(v));
                }
                _ => {
                    fields.insert(field.clone(), serde_json::Value::Null);
                }
            }
        }

        Ok(ExtractResponse {
            fields: serde_json::Value::Object(fields),
            confidence: found as f32 / req.fields.len() as f32,
        })
    }
}
