//! `codex_review` tool — code review via the Codex CLI.
//!
//! The review target is classified exactly once into a tagged variant
//! so the precedence (sentinel keyword → existing file → literal
//! snippet) stays auditable in one place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::codex::{CodexClient, DEFAULT_MODEL};
use crate::git;
use crate::server::{ToolCallResult, ToolDefinition};

/// Default review focus when the caller does not name one.
pub const DEFAULT_FOCUS: &str = "code quality, bugs, and best practices";

/// Parameters for the `codex_review` tool.
#[derive(Debug, Deserialize)]
pub struct ReviewParams {
    /// What to review: a file path, a code snippet, or "current changes".
    #[serde(default)]
    pub target: Option<String>,
    /// Specific areas to focus on (security, performance, bugs, etc.).
    #[serde(default)]
    pub focus: Option<String>,
}

/// What a review target turned out to be.
#[derive(Debug, PartialEq, Eq)]
pub enum ReviewTarget {
    /// Sentinel keyword: review the current git changes.
    RecentChanges,
    /// An existing, readable, non-directory file.
    FilePath(PathBuf),
    /// Anything else: treat the target text as the code itself.
    Literal(String),
}

/// Classify a review target. Keyword matching trims and lowercases a
/// copy; the original value is kept for the file check and the literal
/// fallback.
pub fn classify(workspace: &Path, target: &str) -> ReviewTarget {
    let keyword = target.trim().to_lowercase();
    if keyword == "current changes" || keyword == "git diff" {
        return ReviewTarget::RecentChanges;
    }
    if let Some(path) = super::existing_file(workspace, target) {
        return ReviewTarget::FilePath(path);
    }
    ReviewTarget::Literal(target.to_owned())
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "codex_review".to_owned(),
        description: "Have OpenAI Codex review code changes or implementation plans. \
            Target may be a file path, a code snippet, or 'current changes' for the git diff."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "target": {
                    "type": "string",
                    "description": "What to review (file path, code snippet, or 'current changes')"
                },
                "focus": {
                    "type": "string",
                    "description": "Specific areas to focus on (security, performance, bugs, etc.)"
                }
            },
            "required": ["target"]
        }),
    }
}

/// Compose the outbound review instruction.
pub fn build_instruction(focus: &str, content: &str) -> String {
    format!(
        "Please review the following code with focus on: {focus}. \
         Provide specific, actionable feedback.\n\n{content}"
    )
}

/// Execute the `codex_review` tool.
pub fn execute(
    codex: &CodexClient,
    workspace: &Path,
    arguments: serde_json::Value,
) -> Result<ToolCallResult> {
    let params: ReviewParams =
        serde_json::from_value(arguments).context("invalid codex_review parameters")?;

    let Some(target) = params.target.filter(|t| !t.trim().is_empty()) else {
        return Ok(super::error_result("target is required".to_owned()));
    };

    let content = match classify(workspace, &target) {
        ReviewTarget::RecentChanges => match git::changes_for_review(workspace) {
            Ok(diff) if diff.is_empty() => {
                return Ok(super::error_result(
                    "No git changes found to review".to_owned(),
                ));
            }
            Ok(diff) => diff,
            Err(e) => {
                return Ok(super::error_result(format!("Failed to get git diff: {e}")));
            }
        },
        ReviewTarget::FilePath(path) => match std::fs::read_to_string(&path) {
            Ok(contents) => format!("File: {}\n\n{contents}", path.display()),
            Err(e) => {
                return Ok(super::error_result(format!(
                    "Failed to read file {}: {e}",
                    path.display()
                )));
            }
        },
        ReviewTarget::Literal(snippet) => snippet,
    };

    let focus = params.focus.as_deref().unwrap_or(DEFAULT_FOCUS);
    let instruction = build_instruction(focus, &content);

    // Review always runs against the default model; any model the
    // caller smuggles in is ignored.
    match codex.exec(DEFAULT_MODEL, &instruction) {
        Ok(output) => Ok(super::text_result(output)),
        Err(e) => Ok(super::error_result(format!("Codex review failed: {e}"))),
    }
}
