use cohere_api::CohereClient;
use cohere_models::{EmbedRequest, EmbedResponse, EmbeddingVectors, ValidationError};

use super::RequestFailed;
use crate::cli::EmbedArgs;

const PREVIEW_DIMENSIONS: usize = 5;

pub fn build_embed_request(args: &EmbedArgs) -> Result<EmbedRequest, ValidationError> {
    let mut builder = EmbedRequest::builder(args.model.as_str(), args.input_type)
        .texts(args.texts.iter().map(String::as_str))
        .embedding_types(args.embedding_types.iter().copied());

    if let Some(truncate) = args.truncate {
        builder = builder.truncate(truncate);
    }
    if let Some(dimension) = args.output_dimension {
        builder = builder.output_dimension(dimension);
    }
    if let Some(max_tokens) = args.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    builder.build()
}

pub async fn run_embed(client: &CohereClient, args: &EmbedArgs) -> Result<(), RequestFailed> {
    let request = build_embed_request(args).map_err(|e| RequestFailed::new("Embed", e))?;
    let response = client.embed(&request).await.map_err(|e| RequestFailed::new("Embed", e))?;
    print!("{}", render_embed_response(&request, &response));
    Ok(())
}

pub fn render_embed_response(request: &EmbedRequest, response: &EmbedResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("Embedding id: {}\n", response.id()));

    let kinds = response.available_types();
    let names: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
    out.push_str(&format!("Received typed embeddings for: {}\n", names.join(", ")));

    for kind in kinds {
        let Some(vectors) = response.embeddings_of(kind) else {
            continue;
        };
        out.push_str(&format!("Received {} {} embeddings\n", vectors.len(), kind));

        for (index, input) in request.inputs().iter().enumerate().take(vectors.len()) {
            out.push_str(&format!("\n=== Embedding {} ({}) ===\n", index + 1, kind));
            out.push_str(&format!("Text: \"{}\"\n", input));
            match vectors.dimension(index) {
                Some(dimension) => out.push_str(&format!("Vector dimensionality: {}\n", dimension)),
                None => out.push_str("Vector dimensionality: n/a\n"),
            }
            out.push_str(&format!("First {} dimensions: {}\n", PREVIEW_DIMENSIONS, preview(&vectors, index)));
        }
    }

    if let Some(meta) = response.meta() {
        if let Some(version) = meta.api_version() {
            out.push_str(&format!("\nAPI Version: {}\n", version));
        }
        for warning in meta.warnings() {
            out.push_str(&format!("Warning: {}\n", warning));
        }
    }
    if let Some(tokens) = response.billed_input_tokens() {
        out.push_str(&format!("Billed Units: {}\n", tokens));
    }
    out
}

/// `[a, b, c, d, e, ...]`, or the raw string for base64 encodings.
fn preview(vectors: &EmbeddingVectors<'_>, index: usize) -> String {
    fn join<T: ToString>(values: &[T]) -> String {
        let mut parts: Vec<String> = values.iter().take(PREVIEW_DIMENSIONS).map(T::to_string).collect();
        if values.len() > PREVIEW_DIMENSIONS {
            parts.push("...".to_string());
        }
        format!("[{}]", parts.join(", "))
    }

    match vectors {
        EmbeddingVectors::Float(v) => v.get(index).map(|v| join(v)).unwrap_or_default(),
        EmbeddingVectors::Integer(v) => v.get(index).map(|v| join(v)).unwrap_or_default(),
        EmbeddingVectors::Base64(v) => v
            .get(index)
            .map(|s| cohere_logging::safe_truncate(s, 40))
            .unwrap_or_default(),
    }
}
