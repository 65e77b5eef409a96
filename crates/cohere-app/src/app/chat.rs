use colored::Colorize;
use futures::StreamExt;
use std::io::{self, Write};

use cohere_api::{ChatOutcome, ChatStream, CohereClient};
use cohere_models::{
    ChatDocument, ChatMessage, ChatRequest, ChatResponse, ChatStreamAccumulator, ResponseFormat, ValidationError,
};

use super::RequestFailed;
use crate::cli::ChatArgs;

pub fn build_chat_request(args: &ChatArgs) -> Result<ChatRequest, ValidationError> {
    let mut builder = ChatRequest::builder(args.model.as_str()).stream(args.stream);

    if let Some(system) = &args.system {
        builder = builder.message(ChatMessage::system(system.as_str()));
    }
    builder = builder.message(ChatMessage::user(args.message.as_str()));

    for document in &args.documents {
        builder = builder.document(ChatDocument::Text(document.clone()));
    }
    for stop in &args.stop_sequences {
        builder = builder.stop_sequence(stop.as_str());
    }
    if let Some(mode) = args.citation_mode {
        builder = builder.citation_mode(mode);
    }
    if let Some(mode) = args.safety_mode {
        builder = builder.safety_mode(mode);
    }
    if let Some(max_tokens) = args.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(temperature) = args.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(penalty) = args.frequency_penalty {
        builder = builder.frequency_penalty(penalty);
    }
    if let Some(penalty) = args.presence_penalty {
        builder = builder.presence_penalty(penalty);
    }
    if let Some(k) = args.k {
        builder = builder.k(k);
    }
    if let Some(p) = args.p {
        builder = builder.p(p);
    }
    if args.json {
        builder = builder.response_format(ResponseFormat::JsonObject { json_schema: None });
    }

    builder.build()
}

pub async fn run_chat(client: &CohereClient, args: &ChatArgs) -> Result<(), RequestFailed> {
    let request = build_chat_request(args).map_err(|e| RequestFailed::new("Chat", e))?;

    match client.chat(&request).await.map_err(|e| RequestFailed::new("Chat", e))? {
        ChatOutcome::Complete(response) => {
            print!("{}", render_chat_response(&response));
        }
        ChatOutcome::Streaming(stream) => {
            let response = print_streamed(stream).await?;
            print!("{}", render_chat_footer(&response));
        }
    }
    Ok(())
}

/// Echo text deltas as they arrive and return the assembled response.
async fn print_streamed(mut stream: ChatStream) -> Result<ChatResponse, RequestFailed> {
    let mut accumulator = ChatStreamAccumulator::new();

    println!("\n{}", "=== Chat Response (streaming) ===".bright_blue().bold());
    print!("Assistant: ");
    io::stdout().flush().ok();

    while let Some(event) = stream.next().await {
        let event = event.map_err(|e| RequestFailed::new("Chat", e))?;
        if let Some(text) = event.text_delta() {
            print!("{}", text);
            io::stdout().flush().ok();
        }
        accumulator.apply(&event);
    }
    println!();

    if !accumulator.is_finished() {
        eprintln!("{}", "Stream closed before the final event".yellow());
    }
    Ok(accumulator.into_response())
}

pub fn render_chat_response(response: &ChatResponse) -> String {
    let mut out = String::new();
    out.push_str("\n=== Chat Response ===\n");
    out.push_str(&format!("Assistant: {}\n", response.text().unwrap_or_default()));
    out.push_str(&render_chat_footer(response));
    out
}

/// Everything after the answer text: tool calls, citations, id and usage.
pub fn render_chat_footer(response: &ChatResponse) -> String {
    let mut out = String::new();

    if let Some(plan) = response.tool_plan() {
        out.push_str(&format!("\nTool plan: {}\n", plan));
    }
    if response.has_tool_calls() {
        out.push_str("\nTool calls:\n");
        for call in response.tool_calls() {
            out.push_str(&format!("  - Function: {}\n", call.name()));
            out.push_str(&format!("    Parameters: {}\n", call.function.arguments));
        }
    }
    if !response.citations().is_empty() {
        out.push_str("\nCitations:\n");
        for citation in response.citations() {
            let span = match (citation.start, citation.end) {
                (Some(start), Some(end)) => format!(" [{}..{}]", start, end),
                _ => String::new(),
            };
            out.push_str(&format!(
                "  - \"{}\"{} ({} sources)\n",
                citation.text.as_deref().unwrap_or(""),
                span,
                citation.sources.len()
            ));
        }
    }

    out.push_str(&format!("\nResponse ID: {}\n", response.id()));
    if let Some(reason) = response.finish_reason() {
        out.push_str(&format!("Finish reason: {}\n", reason));
    }

    if response.usage().is_some() {
        out.push_str("\nToken Usage:\n");
        out.push_str(&format!("  Input tokens: {}\n", count(response.input_tokens())));
        out.push_str(&format!("  Output tokens: {}\n", count(response.output_tokens())));
        out.push_str(&format!("  Total tokens: {}\n", count(response.total_tokens())));
    }
    out
}

fn count(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}
