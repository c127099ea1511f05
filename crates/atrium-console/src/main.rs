//! atrium-console - demo shell for the Atrium console stack.
//!
//! Wires the session and tenant contexts, the mock gateway backend, the
//! list-view state engine, and the playground runners into one scripted
//! walkthrough. Everything a front-end would do, minus the rendering.

use anyhow::Context;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use atrium_client::MockBackend;
use atrium_core::{CreateKnowledgeBaseRequest, KnowledgeBase, KnowledgeBaseApi};
use atrium_playground::{compare_models, run_search, RagForm, SearchForm};
use atrium_session::{shared, Claims, SessionContext, StateStore, TenantContext};
use atrium_state::ListView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = shared(StateStore::from_env().context("opening state store")?);
    let backend = MockBackend::new().with_latency_ms(40).with_seed_data();

    // Session: restore, or log in with a demo token the mock world accepts.
    let mut session = SessionContext::restore(store.clone());
    if !session.is_authenticated() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "operator@acme.test".to_string(),
            role: "admin".to_string(),
            tenant_id: Some(atrium_client::mock::TENANT_ACME),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        };
        session.login(&claims.to_unsigned_token())?;
    }
    let user = session.user().context("session must be authenticated")?;
    info!(email = %user.email, "session ready");

    // Tenants: load the list, restore or repair the persisted selection.
    let mut tenants = TenantContext::load(&backend, store.clone()).await?;
    let current = tenants.current().context("no tenant available")?;
    println!("tenants: {}", tenants.tenants().len());
    println!("current tenant: {} ({})", current.name, current.plan);
    let tenant_id = current.id;

    // Knowledge bases through the list-view state engine.
    let mut kb_view: ListView<KnowledgeBase> = ListView::new();
    kb_view.finish_load(KnowledgeBaseApi::list(&backend, tenant_id).await);
    println!("knowledge bases: {}", kb_view.items().len());

    let created = KnowledgeBaseApi::create(
        &backend,
        tenant_id,
        CreateKnowledgeBaseRequest {
            name: "Technical Specs".to_string(),
            description: Some("Specifications uploaded from the demo".to_string()),
            embedding_model: None,
        },
    )
    .await?;
    kb_view.insert_head(created.clone());
    println!(
        "created '{}' (documents: {}, chunks: {})",
        created.name, created.document_count, created.chunk_count
    );

    // Playground: one search, one comparison run.
    let search = run_search(
        &backend,
        tenant_id,
        &SearchForm {
            query: "getting started".to_string(),
            ..SearchForm::default()
        },
    )
    .await?;
    println!("search hits: {}", search.hits.len());

    let form = RagForm {
        query: "What is machine learning?".to_string(),
        ..RagForm::default()
    };
    let models = vec!["gpt-4o-mini".to_string(), "llama3:8b".to_string()];
    let results = compare_models(&backend, tenant_id, &form, &models).await?;
    for result in &results {
        match &result.error {
            None => println!(
                "[{}] {} (citations: {})",
                result.model,
                result.response.answer,
                result.response.citations.len()
            ),
            Some(err) => println!("[{}] failed: {}", result.model, err),
        }
    }

    // Demonstrate tenant switching: a pure local-state change.
    if let Some(other) = tenants
        .tenants()
        .iter()
        .map(|t| t.id)
        .find(|id| *id != tenant_id)
    {
        tenants.switch(other)?;
        if let Some(t) = tenants.current() {
            println!("switched to tenant: {}", t.name);
        }
    }

    session.logout();
    info!("demo complete");
    Ok(())
}
