//! MCP protocol integration tests.
//!
//! Drives the JSON-RPC types and the tool router directly. Codex itself
//! is replaced by a stub shell script that echoes its arguments, so the
//! tests can observe exactly what instruction would be sent.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::json;

use codex_consultant::codex::CodexClient;
use codex_consultant::tools::ToolRouter;

/// Write an executable stand-in for the codex binary that prints its
/// argument vector, so assertions can inspect the outbound invocation.
fn stub_codex(dir: &Path) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("codex-stub.sh");
    std::fs::write(&path, "#!/bin/sh\necho \"STUB CODEX: $@\"\n").expect("write stub");
    let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod stub");
    path.to_str().expect("utf-8 path").to_owned()
}

fn router_with(workspace: PathBuf, codex_bin: String) -> ToolRouter {
    ToolRouter::new(
        workspace,
        CodexClient::new(codex_bin, Duration::from_secs(30)),
    )
}

/// Router whose codex binary does not exist: any invocation fails, so a
/// response that is NOT an execution failure proves codex was never run.
fn router_without_codex(workspace: PathBuf) -> ToolRouter {
    router_with(workspace, "codex-consultant-missing-binary-98765".to_owned())
}

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git should run");
    assert!(status.success(), "git {args:?} failed");
}

fn init_repo_with_commit(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
    std::fs::write(dir.join("a.txt"), "one\n").expect("write");
    git(dir, &["add", "a.txt"]);
    git(dir, &["commit", "-q", "-m", "initial"]);
}

#[test]
fn test_json_rpc_request_parsing() {
    let req_json = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-06-18",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "0.1.0"
            }
        }
    });

    let req: codex_consultant::server::JsonRpcRequest =
        serde_json::from_value(req_json).expect("should parse initialize request");

    assert_eq!(req.method, "initialize");
    assert_eq!(req.id, Some(json!(1)));
}

#[test]
fn test_json_rpc_response_serialization() {
    let resp = codex_consultant::server::JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id: Some(json!(1)),
        result: Some(json!({"protocolVersion": "2025-06-18"})),
        error: None,
    };

    let json_str = serde_json::to_string(&resp).expect("should serialize");
    assert!(json_str.contains("2025-06-18"));
    assert!(!json_str.contains("error")); // error is None, should be skipped
}

#[test]
fn test_json_rpc_error_response() {
    let resp = codex_consultant::server::JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id: Some(json!(2)),
        result: None,
        error: Some(codex_consultant::server::JsonRpcError {
            code: -32601,
            message: "method not found".to_owned(),
            data: None,
        }),
    };

    let json_str = serde_json::to_string(&resp).expect("should serialize");
    assert!(json_str.contains("-32601"));
    assert!(json_str.contains("method not found"));
    assert!(!json_str.contains("result")); // result is None, should be skipped
}

#[test]
fn test_tool_definitions_complete() {
    let router = router_without_codex(PathBuf::from("/tmp"));

    let tools = router.list_tools();
    assert_eq!(tools.len(), 2);

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"ask_codex"));
    assert!(names.contains(&"codex_review"));

    for tool in &tools {
        assert!(
            !tool.description.is_empty(),
            "tool {} missing description",
            tool.name
        );
        assert!(
            tool.input_schema.is_object(),
            "tool {} missing input_schema",
            tool.name
        );
    }
}

#[test]
fn test_tool_call_unknown() {
    let router = router_without_codex(PathBuf::from("/tmp"));

    let result = router
        .call_tool("nonexistent_tool", json!({}))
        .expect("should not error");

    assert!(result.is_error);
    assert!(result.content[0].text.contains("Unknown tool"));
}

#[test]
fn test_ask_missing_prompt_never_invokes_codex() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = router_without_codex(dir.path().to_path_buf());

    let result = router
        .call_tool("ask_codex", json!({}))
        .expect("should not error");

    assert!(result.is_error);
    assert!(result.content[0].text.contains("prompt is required"));
    // Execution-failure wording would mean the missing binary was run.
    assert!(!result.content[0].text.contains("Codex execution failed"));
}

#[test]
fn test_ask_empty_context_sends_prompt_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = stub_codex(dir.path());
    let router = router_with(dir.path().to_path_buf(), stub);

    let result = router
        .call_tool("ask_codex", json!({"prompt": "Is this safe?", "context": ""}))
        .expect("should not error");

    assert!(!result.is_error);
    let text = &result.content[0].text;
    assert!(text.contains("STUB CODEX:"));
    assert!(text.contains("exec --model gpt-5-codex -- Is this safe?"));
    assert!(!text.contains("Context:"));
}

#[test]
fn test_ask_honors_model_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = stub_codex(dir.path());
    let router = router_with(dir.path().to_path_buf(), stub);

    let result = router
        .call_tool("ask_codex", json!({"prompt": "hi", "model": "gpt-5"}))
        .expect("should not error");

    assert!(!result.is_error);
    assert!(result.content[0].text.contains("--model gpt-5 --"));
}

#[test]
fn test_ask_subprocess_failure_is_structured_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = router_without_codex(dir.path().to_path_buf());

    let result = router
        .call_tool("ask_codex", json!({"prompt": "hello"}))
        .expect("should not error");

    assert!(result.is_error);
    assert!(result.content[0].text.contains("Codex execution failed"));
}

#[test]
fn test_review_missing_target() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = router_without_codex(dir.path().to_path_buf());

    let result = router
        .call_tool("codex_review", json!({}))
        .expect("should not error");

    assert!(result.is_error);
    assert!(result.content[0].text.contains("target is required"));
}

#[test]
fn test_review_nonexistent_path_is_literal_snippet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = stub_codex(dir.path());
    let router = router_with(dir.path().to_path_buf(), stub);

    let result = router
        .call_tool("codex_review", json!({"target": "/nonexistent/path.go"}))
        .expect("should not error");

    assert!(!result.is_error);
    let text = &result.content[0].text;
    assert!(text.contains("/nonexistent/path.go"));
    assert!(text.contains("code quality, bugs, and best practices"));
}

#[test]
fn test_review_file_target_inlines_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = stub_codex(dir.path());
    std::fs::write(dir.path().join("subject.rs"), "fn subject() {}\n").expect("write");
    let router = router_with(dir.path().to_path_buf(), stub);

    let result = router
        .call_tool(
            "codex_review",
            json!({"target": "subject.rs", "focus": "error handling"}),
        )
        .expect("should not error");

    assert!(!result.is_error);
    let text = &result.content[0].text;
    assert!(text.contains("focus on: error handling."));
    assert!(text.contains("File: "));
    assert!(text.contains("fn subject() {}"));
}

#[test]
fn test_review_clean_repo_never_invokes_codex() {
    let dir = tempfile::tempdir().expect("tempdir");
    init_repo_with_commit(dir.path());
    let router = router_without_codex(dir.path().to_path_buf());

    let result = router
        .call_tool("codex_review", json!({"target": "current changes"}))
        .expect("should not error");

    assert!(result.is_error);
    assert!(result.content[0].text.contains("No git changes found to review"));
    assert!(!result.content[0].text.contains("Codex review failed"));
}

#[test]
fn test_review_staged_fallback_reaches_codex() {
    let dir = tempfile::tempdir().expect("tempdir");
    init_repo_with_commit(dir.path());

    // Stage an edit, then restore the worktree: only `diff --staged`
    // has content, exercising the fallback path end to end.
    std::fs::write(dir.path().join("a.txt"), "one\nstaged\n").expect("write");
    git(dir.path(), &["add", "a.txt"]);
    std::fs::write(dir.path().join("a.txt"), "one\n").expect("write");

    let stub = stub_codex(dir.path());
    let router = router_with(dir.path().to_path_buf(), stub);

    let result = router
        .call_tool("codex_review", json!({"target": "Git Diff"}))
        .expect("should not error");

    assert!(!result.is_error);
    let text = &result.content[0].text;
    assert!(text.contains("STUB CODEX:"));
    assert!(text.contains("+staged"));
}
