//! # atrium-playground
//!
//! Orchestration for the interactive playground tools: search, RAG,
//! streaming RAG, model comparison, and extraction. Forms validate
//! client-side, submit exactly one request (or one per model in comparison
//! mode), and hand the structured response back verbatim for rendering.

pub mod forms;

pub use forms::{ExtractForm, RagForm, SearchForm};

use futures::future::join_all;
use futures::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use atrium_core::{
    CompareResult, ExtractResponse, PlaygroundApi, RagResponse, Result, SearchResponse,
    TokenStream,
};

/// Run a search query: validate the form, issue the single request.
pub async fn run_search(
    api: &dyn PlaygroundApi,
    tenant_id: Uuid,
    form: &SearchForm,
) -> Result<SearchResponse> {
    let req = form.to_request()?;
    debug!(tenant_id = %tenant_id, top_k = req.top_k, "search");
    api.search(tenant_id, req).await
}

/// Run a RAG query: validate the form, issue the single request.
pub async fn run_rag(
    api: &dyn PlaygroundApi,
    tenant_id: Uuid,
    form: &RagForm,
) -> Result<RagResponse> {
    let req = form.to_request()?;
    debug!(tenant_id = %tenant_id, model = %req.model, "rag");
    api.rag(tenant_id, req).await
}

/// Run an extraction query: validate the form, issue the single request.
pub async fn run_extract(
    api: &dyn PlaygroundApi,
    tenant_id: Uuid,
    form: &ExtractForm,
) -> Result<ExtractResponse> {
    let req = form.to_request()?;
    debug!(tenant_id = %tenant_id, field_count = req.fields.len(), "extract");
    api.extract(tenant_id, req).await
}

/// Open a streaming RAG request and return the raw token stream for
/// incremental rendering.
pub async fn run_rag_stream(
    api: &dyn PlaygroundApi,
    tenant_id: Uuid,
    form: &RagForm,
) -> Result<TokenStream> {
    let req = form.to_request()?;
    api.rag_stream(tenant_id, req).await
}

/// Drain a token stream into the final answer text.
///
/// Accumulates deltas until the stream ends (the transport layer swallows
/// the termination sentinel). Nothing is buffered across requests: a
/// stream error discards the partial answer and surfaces the error.
pub async fn collect_stream(mut stream: TokenStream) -> Result<String> {
    let mut answer = String::new();
    while let Some(delta) = stream.next().await {
        answer.push_str(&delta?);
    }
    Ok(answer)
}

/// Comparison mode: fan one RAG request out to several models at once and
/// fan the results back in, in the order the models were selected.
///
/// All calls start together and the aggregate waits for every one to
/// settle. Each model's failure is caught individually and becomes a
/// placeholder entry, so one model rejecting never invalidates the
/// others' results.
pub async fn compare_models(
    api: &dyn PlaygroundApi,
    tenant_id: Uuid,
    form: &RagForm,
    models: &[String],
) -> Result<Vec<CompareResult>> {
    let base = form.to_request()?;
    info!(tenant_id = %tenant_id, model_count = models.len(), "comparison run");

    let calls = models.iter().map(|model| {
        let mut req = base.clone();
        req.model = model.clone();
        let model = model.clone();
        async move {
            match api.rag(tenant_id, req).await {
                Ok(response) => CompareResult {
                    model,
                    response,
                    error: None,
                },
                Err(e) => {
                    warn!(model = %model, error = %e, "model failed during comparison");
                    CompareResult {
                        model: model.clone(),
                        response: RagResponse {
                            answer: format!("{} did not return an answer.", model),
                            citations: Vec::new(),
                            confidence: 0.0,
                            model,
                            latency_ms: 0,
                        },
                        error: Some(e.to_string()),
                    }
                }
            }
        }
    });

    Ok(join_all(calls).await)
}
