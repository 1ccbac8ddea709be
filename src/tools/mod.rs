//! Tool router — registers and dispatches MCP tool calls.
//!
//! Two tools are exposed: `ask_codex` and `codex_review`. Each tool
//! module provides a `tool_definition()` (name, description, JSON
//! Schema) and an `execute()` that takes JSON arguments and returns a
//! [`ToolCallResult`]. Handler-level failures are reported as
//! `isError` results so one bad call never takes the server down.

pub mod ask;
pub mod review;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::codex::CodexClient;
use crate::server::{ContentItem, ToolCallResult, ToolDefinition};

/// Build a successful text result.
pub(crate) fn text_result(text: String) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentItem {
            content_type: "text".to_owned(),
            text,
        }],
        is_error: false,
    }
}

/// Build a structured tool-level error result.
pub(crate) fn error_result(text: String) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentItem {
            content_type: "text".to_owned(),
            text,
        }],
        is_error: true,
    }
}

/// Check whether `raw` names an existing, readable, non-directory file.
///
/// Relative paths are resolved against the workspace; the path is
/// canonicalized so the label in the outgoing prompt shows the real
/// location. Returns `None` on any failure — missing path, directory,
/// permission denial — so callers degrade to literal-text treatment.
pub(crate) fn existing_file(workspace: &Path, raw: &str) -> Option<PathBuf> {
    if raw.is_empty() || raw.contains('\0') {
        return None;
    }
    let candidate = Path::new(raw);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        workspace.join(candidate)
    };
    let resolved = joined.canonicalize().ok()?;
    resolved.is_file().then_some(resolved)
}

/// Expand free-form context: if it names a readable file, return a
/// labeled block with the file's full contents; otherwise return the
/// text unchanged. Never errors.
pub(crate) fn resolve_context(workspace: &Path, text: &str) -> String {
    if let Some(path) = existing_file(workspace, text) {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            return format!("File: {}\n\n{contents}", path.display());
        }
    }
    text.to_owned()
}

/// Tool router that dispatches MCP tool calls to implementations.
pub struct ToolRouter {
    /// Base directory for relative file targets and git invocations.
    workspace: PathBuf,
    /// Client for the external codex binary.
    codex: CodexClient,
}

impl ToolRouter {
    /// Create a new tool router.
    #[must_use]
    pub const fn new(workspace: PathBuf, codex: CodexClient) -> Self {
        Self { workspace, codex }
    }

    /// List all available tools with their JSON Schema definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![ask::tool_definition(), review::tool_definition()]
    }

    /// Call a tool by name with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns an error only on malformed argument JSON; tool-level
    /// failures come back as `isError` results.
    pub fn call_tool(&self, name: &str, arguments: serde_json::Value) -> Result<ToolCallResult> {
        debug!(tool = name, "dispatching tool call");

        match name {
            "ask_codex" => ask::execute(&self.codex, &self.workspace, arguments),
            "codex_review" => review::execute(&self.codex, &self.workspace, arguments),
            _ => Ok(error_result(format!("Unknown tool: {name}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_file_resolves_relative_to_workspace() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("notes.txt"), "hi").expect("write");

        let resolved = existing_file(dir.path(), "notes.txt").expect("should resolve");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("notes.txt"));
    }

    #[test]
    fn test_existing_file_rejects_directories_and_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(existing_file(dir.path(), ".").is_none());
        assert!(existing_file(dir.path(), "no-such-file.rs").is_none());
        assert!(existing_file(dir.path(), "").is_none());
    }

    #[test]
    fn test_resolve_context_labels_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("ctx.rs");
        std::fs::write(&file, "fn main() {}\n").expect("write");

        let resolved = resolve_context(dir.path(), file.to_str().expect("utf-8 path"));
        assert!(resolved.starts_with("File: "));
        assert!(resolved.contains("ctx.rs"));
        assert!(resolved.contains("fn main() {}"));
    }

    #[test]
    fn test_resolve_context_falls_back_to_literal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let literal = "just some prose, not a path";
        assert_eq!(resolve_context(dir.path(), literal), literal);
    }
}
