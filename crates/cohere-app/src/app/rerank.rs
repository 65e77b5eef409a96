use cohere_api::CohereClient;
use cohere_models::{DecodeError, RerankRequest, RerankResponse, ValidationError};

use super::RequestFailed;
use crate::cli::RerankArgs;

pub fn build_rerank_request(args: &RerankArgs) -> Result<RerankRequest, ValidationError> {
    let mut builder = RerankRequest::builder(args.model.as_str(), args.query.as_str())
        .documents(args.documents.iter().map(String::as_str));

    if let Some(top_n) = args.top_n {
        builder = builder.top_n(top_n);
    }
    if let Some(max_tokens) = args.max_tokens_per_doc {
        builder = builder.max_tokens_per_doc(max_tokens);
    }
    builder.build()
}

pub async fn run_rerank(client: &CohereClient, args: &RerankArgs) -> Result<(), RequestFailed> {
    let request = build_rerank_request(args).map_err(|e| RequestFailed::new("Rerank", e))?;
    let response = client.rerank(&request).await.map_err(|e| RequestFailed::new("Rerank", e))?;
    let text = render_rerank_response(&request, &response).map_err(|e| RequestFailed::new("Rerank", e))?;
    print!("{}", text);
    Ok(())
}

pub fn render_rerank_response(request: &RerankRequest, response: &RerankResponse) -> Result<String, DecodeError> {
    let ranked = response.resolve(request.documents())?;
    let rule = "-".repeat(80);

    let mut out = String::new();
    out.push_str("\nRerank Results:\n");
    out.push_str(&format!("Query: \"{}\"\n", request.query()));
    out.push_str(&format!("Model: {}\n", request.model()));
    out.push_str(&format!("Total documents: {}\n", request.documents().len()));
    out.push_str(&format!("Top documents returned: {}\n", ranked.len()));
    out.push_str("\nTop ranked documents:\n");
    out.push_str(&rule);
    out.push('\n');

    for doc in &ranked {
        out.push_str(&format!("\n{}. Relevance Score: {:.4}\n", doc.rank, doc.relevance_score));
        out.push_str(&format!("   Original Index: {}\n", doc.index));
        out.push_str(&format!("   Text: {}\n", doc.text));
    }
    out.push_str(&rule);
    out.push('\n');

    if let Some(id) = response.id() {
        out.push_str(&format!("\nAPI Response ID: {}\n", id));
    }
    if let Some(version) = response.meta().and_then(|m| m.api_version()) {
        out.push_str(&format!("API Version: {}\n", version));
    }
    if let Some(units) = response.search_units() {
        out.push_str(&format!("Billed Units: {}\n", units));
    }
    Ok(out)
}
