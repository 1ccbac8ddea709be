//! `ask_codex` tool — second opinions from the Codex CLI.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::codex::{CodexClient, DEFAULT_MODEL};
use crate::server::{ToolCallResult, ToolDefinition};

/// Parameters for the `ask_codex` tool.
///
/// `prompt` is declared optional here so that a missing field produces
/// the tool-level "prompt is required" error instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct AskParams {
    /// The question or code to ask Codex about.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Additional context: literal text or a file path to inline.
    #[serde(default)]
    pub context: Option<String>,
    /// Model to use. Default: gpt-5-codex.
    #[serde(default)]
    pub model: Option<String>,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "ask_codex".to_owned(),
        description: "Get a second opinion from OpenAI Codex on code, plans, or implementations."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "The question or code to ask Codex about"
                },
                "context": {
                    "type": "string",
                    "description": "Additional context or a file path to include"
                },
                "model": {
                    "type": "string",
                    "description": "Model to use (e.g., gpt-5-codex, gpt-5). Default: gpt-5-codex"
                }
            },
            "required": ["prompt"]
        }),
    }
}

/// Compose the outbound instruction from prompt and optional context.
///
/// With no context the instruction is the prompt verbatim. With context
/// the resolved (file-or-literal) text is cited first, then the
/// question.
pub fn build_instruction(workspace: &Path, prompt: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => {
            let expanded = super::resolve_context(workspace, ctx);
            format!("Context: {expanded}\n\nQuestion: {prompt}")
        }
        _ => prompt.to_owned(),
    }
}

/// Execute the `ask_codex` tool.
pub fn execute(
    codex: &CodexClient,
    workspace: &Path,
    arguments: serde_json::Value,
) -> Result<ToolCallResult> {
    let params: AskParams =
        serde_json::from_value(arguments).context("invalid ask_codex parameters")?;

    let Some(prompt) = params.prompt.filter(|p| !p.trim().is_empty()) else {
        return Ok(super::error_result("prompt is required".to_owned()));
    };

    let model = params.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let instruction = build_instruction(workspace, &prompt, params.context.as_deref());

    match codex.exec(model, &instruction) {
        Ok(output) => Ok(super::text_result(output)),
        Err(e) => Ok(super::error_result(format!("Codex execution failed: {e}"))),
    }
}
