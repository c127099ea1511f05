//! Playground orchestration against the mock gateway backend.

use atrium_client::mock::TENANT_ACME;
use atrium_client::MockBackend;
use atrium_core::Error;
use atrium_playground::{
    collect_stream, compare_models, run_extract, run_rag, run_rag_stream, run_search, ExtractForm,
    RagForm, SearchForm,
};

fn backend() -> MockBackend {
    MockBackend::new().with_seed_data()
}

fn rag_form(query: &str) -> RagForm {
    RagForm {
        query: query.to_string(),
        ..RagForm::default()
    }
}

#[tokio::test]
async fn compare_keeps_results_in_selection_order() {
    let backend = backend();
    let models = vec![
        "gpt-4o-mini".to_string(),
        "llama3:8b".to_string(),
        "claude-sonnet".to_string(),
    ];

    let results = compare_models(&backend, TENANT_ACME, &rag_form("How do I deploy?"), &models)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    for (result, model) in results.iter().zip(&models) {
        assert_eq!(&result.model, model);
        assert!(result.error.is_none());
        assert_eq!(&result.response.model, model);
    }
}

#[tokio::test]
async fn one_failed_model_never_hides_the_others() {
    let backend = backend();
    backend.fail_model("llama3:8b");
    let models = vec!["gpt-4o-mini".to_string(), "llama3:8b".to_string()];

    let results = compare_models(&backend, TENANT_ACME, &rag_form("Summarize the docs"), &models)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);

    let ok = &results[0];
    assert!(ok.error.is_none());
    assert!(!ok.response.citations.is_empty());

    let failed = &results[1];
    assert_eq!(failed.model, "llama3:8b");
    assert!(failed.error.as_deref().unwrap().contains("unavailable"));
    assert_eq!(failed.response.answer, "llama3:8b did not return an answer.");
    assert!(failed.response.citations.is_empty());
    assert_eq!(failed.response.confidence, 0.0);
}

#[tokio::test]
async fn compare_rejects_invalid_form_before_any_call() {
    let backend = backend();
    let models = vec!["gpt-4o-mini".to_string()];

    let result = compare_models(&backend, TENANT_ACME, &rag_form("   "), &models).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn streamed_answer_matches_the_unary_one() {
    let backend = backend();
    let form = rag_form("What changed in the latest release?");

    let unary = run_rag(&backend, TENANT_ACME, &form).await.unwrap();
    let stream = run_rag_stream(&backend, TENANT_ACME, &form).await.unwrap();
    let streamed = collect_stream(stream).await.unwrap();

    assert_eq!(streamed, unary.answer);
}

#[tokio::test]
async fn search_validation_short_circuits() {
    let backend = backend();
    let form = SearchForm {
        query: "ml".to_string(),
        top_k: 0,
        kb_id: None,
    };
    let result = run_search(&backend, TENANT_ACME, &form).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn extract_pulls_labeled_fields() {
    let backend = backend();
    let form = ExtractForm {
        text: "name: Ada Lovelace, country: UK".to_string(),
        fields: vec!["name".to_string(), "country".to_string(), "age".to_string()],
    };

    let response = run_extract(&backend, TENANT_ACME, &form).await.unwrap();
    assert_eq!(response.fields["name"], "Ada Lovelace");
    assert_eq!(response.fields["country"], "UK");
    assert!(response.fields["age"].is_null());
    assert!(response.confidence > 0.6 && response.confidence < 0.7);
}
