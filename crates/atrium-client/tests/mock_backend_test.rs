//! Behavioral tests for the mock gateway backend.
//!
//! These pin down the contract the live gateway must also satisfy, since
//! the façade traits are the stable interface shared by both backends.

use atrium_client::mock::{KB_SUPPORT, TENANT_ACME, TENANT_GLOBEX};
use atrium_client::MockBackend;
use atrium_core::{
    CreateDataSourceRequest, CreateKnowledgeBaseRequest, DataSourceApi, DataSourceConfig,
    DataSourceStatus, DocumentApi, DocumentStatus, Error, InviteUserRequest, KnowledgeBaseApi,
    PlaygroundApi, RagRequest, SearchRequest, TenantApi, TenantRole, UploadDocumentRequest,
};

fn backend() -> MockBackend {
    MockBackend::new().with_seed_data()
}

fn rag_request(query: &str) -> RagRequest {
    RagRequest {
        query: query.to_string(),
        top_k: 5,
        model: "gpt-4o-mini".to_string(),
        temperature: 0.2,
        kb_id: None,
    }
}

#[tokio::test]
async fn create_kb_starts_with_zero_counts() {
    let backend = backend();
    let kb = KnowledgeBaseApi::create(
        &backend,
        TENANT_ACME,
        CreateKnowledgeBaseRequest {
            name: "Technical Specs".to_string(),
            description: None,
            embedding_model: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(kb.document_count, 0);
    assert_eq!(kb.chunk_count, 0);
    assert!(!kb.embedding_model.is_empty());

    // The new KB is listed for its tenant.
    let listed = KnowledgeBaseApi::list(&backend, TENANT_ACME).await.unwrap();
    assert!(listed.iter().any(|k| k.id == kb.id));
}

#[tokio::test]
async fn create_kb_rejects_blank_name() {
    let backend = backend();
    let result = KnowledgeBaseApi::create(
        &backend,
        TENANT_ACME,
        CreateKnowledgeBaseRequest {
            name: "   ".to_string(),
            description: None,
            embedding_model: None,
        },
    )
    .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn kb_list_is_tenant_scoped() {
    let backend = backend();
    let acme = KnowledgeBaseApi::list(&backend, TENANT_ACME).await.unwrap();
    let globex = KnowledgeBaseApi::list(&backend, TENANT_GLOBEX).await.unwrap();
    assert_eq!(acme.len(), 2);
    assert_eq!(globex.len(), 1);
    assert!(acme.iter().all(|kb| kb.tenant_id == TENANT_ACME));
}

#[tokio::test]
async fn rag_with_no_indexed_documents_returns_empty_citations() {
    let backend = backend();
    // Globex has a KB but zero indexed documents.
    let response = backend
        .rag(TENANT_GLOBEX, rag_request("What is machine learning?"))
        .await
        .unwrap();

    assert!(response.citations.is_empty());
    assert!(!response.answer.is_empty());
}

#[tokio::test]
async fn rag_with_indexed_documents_cites_them() {
    let backend = backend();
    let response = backend
        .rag(TENANT_ACME, rag_request("How do I get started?"))
        .await
        .unwrap();

    assert!(!response.citations.is_empty());
    assert!(response.confidence > 0.5);
}

#[tokio::test]
async fn search_respects_top_k() {
    let backend = backend();
    let response = backend
        .search(
            TENANT_ACME,
            SearchRequest {
                query: "api".to_string(),
                top_k: 1,
                kb_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(response.hits.len(), 1);
}

#[tokio::test]
async fn reupload_bumps_version_monotonically() {
    let backend = backend();
    let req = UploadDocumentRequest {
        kb_id: KB_SUPPORT,
        name: "runbook.md".to_string(),
        content_type: "text/markdown".to_string(),
        size_bytes: 1024,
    };

    let v1 = backend.upload(req.clone()).await.unwrap();
    assert_eq!(v1.version, 1);
    assert_eq!(v1.status, DocumentStatus::Pending);

    let v2 = backend.upload(req).await.unwrap();
    assert_eq!(v2.id, v1.id, "re-upload must not create a second document");
    assert_eq!(v2.version, 2);

    let rolled = backend.rollback(v2.id, 1).await.unwrap();
    assert_eq!(rolled.version, 3, "rollback is itself a new version");

    let versions = backend.versions(v2.id).await.unwrap();
    assert_eq!(versions[0].version, 3);
}

#[tokio::test]
async fn rollback_to_unknown_version_is_rejected() {
    let backend = backend();
    let doc = backend
        .upload(UploadDocumentRequest {
            kb_id: KB_SUPPORT,
            name: "notes.txt".to_string(),
            content_type: "text/plain".to_string(),
            size_bytes: 10,
        })
        .await
        .unwrap();

    let result = backend.rollback(doc.id, 99).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn upload_increments_kb_document_count() {
    let backend = backend();
    let before = KnowledgeBaseApi::get(&backend, KB_SUPPORT).await.unwrap();
    backend
        .upload(UploadDocumentRequest {
            kb_id: KB_SUPPORT,
            name: "faq.md".to_string(),
            content_type: "text/markdown".to_string(),
            size_bytes: 2048,
        })
        .await
        .unwrap();
    let after = KnowledgeBaseApi::get(&backend, KB_SUPPORT).await.unwrap();
    assert_eq!(after.document_count, before.document_count + 1);
}

#[tokio::test]
async fn archive_marks_document_without_removing_it() {
    let backend = backend();
    let doc = backend
        .upload(UploadDocumentRequest {
            kb_id: KB_SUPPORT,
            name: "old.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 100,
        })
        .await
        .unwrap();

    let archived = backend.archive(doc.id).await.unwrap();
    assert_eq!(archived.status, DocumentStatus::Archived);
    assert!(DocumentApi::list(&backend, KB_SUPPORT)
        .await
        .unwrap()
        .iter()
        .any(|d| d.id == doc.id));
}

#[tokio::test]
async fn data_source_lifecycle_pause_resume_sync() {
    let backend = backend();
    let source = DataSourceApi::create(
        &backend,
        CreateDataSourceRequest {
            kb_id: KB_SUPPORT,
            name: "ticket poller".to_string(),
            config: DataSourceConfig::ApiConnector {
                endpoint: "https://tickets.acme.test/api".to_string(),
                auth_header: None,
                interval_minutes: 15,
            },
        },
    )
    .await
    .unwrap();
    assert_eq!(source.status, DataSourceStatus::Active);
    assert!(source.last_sync_at.is_none());

    let paused = backend.pause(source.id).await.unwrap();
    assert_eq!(paused.status, DataSourceStatus::Paused);

    let resumed = backend.resume(source.id).await.unwrap();
    assert_eq!(resumed.status, DataSourceStatus::Active);

    let syncing = backend.trigger_sync(source.id).await.unwrap();
    assert_eq!(syncing.status, DataSourceStatus::Syncing);
    assert!(syncing.last_sync_at.is_some());
}

#[tokio::test]
async fn invite_duplicate_email_is_rejected() {
    let backend = backend();
    let result = backend
        .invite_user(
            TENANT_ACME,
            InviteUserRequest {
                email: "owner@acme.test".to_string(),
                role: TenantRole::Admin,
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn audit_log_records_mutations_newest_first() {
    let backend = backend();
    KnowledgeBaseApi::create(
        &backend,
        TENANT_ACME,
        CreateKnowledgeBaseRequest {
            name: "First".to_string(),
            description: None,
            embedding_model: None,
        },
    )
    .await
    .unwrap();
    KnowledgeBaseApi::create(
        &backend,
        TENANT_ACME,
        CreateKnowledgeBaseRequest {
            name: "Second".to_string(),
            description: None,
            embedding_model: None,
        },
    )
    .await
    .unwrap();

    let log = backend.audit_log(TENANT_ACME, 10).await.unwrap();
    assert!(log.len() >= 2);
    assert_eq!(log[0].target, "Second");
    assert!(log.iter().all(|e| e.tenant_id == TENANT_ACME));
}

#[tokio::test]
async fn issued_api_key_secret_is_shown_once() {
    let backend = backend();
    let issued = backend.issue_api_key(TENANT_ACME, "ci").await.unwrap();
    assert!(issued.secret.starts_with("atr_sk_"));

    let keys = backend.list_api_keys(TENANT_ACME).await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "ci");
    // Listing exposes only the display prefix, never the secret.
    assert!(issued.secret.len() > keys[0].prefix.len());
}

#[tokio::test]
async fn fail_next_surfaces_once_then_recovers() {
    let backend = backend();
    backend.fail_next(Error::Unauthorized("token expired".to_string()));

    let first = TenantApi::list(&backend).await;
    assert!(matches!(first, Err(Error::Unauthorized(_))));

    let second = TenantApi::list(&backend).await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn tenant_delete_cascades() {
    let backend = backend();
    TenantApi::delete(&backend, TENANT_ACME).await.unwrap();
    assert!(KnowledgeBaseApi::list(&backend, TENANT_ACME)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        TenantApi::get(&backend, TENANT_ACME).await,
        Err(Error::NotFound(_))
    ));
}
