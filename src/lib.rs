//! `codex-consultant` — MCP adapter for the OpenAI Codex CLI.
//!
//! Exposes the `codex` command-line tool as two MCP tools over stdio
//! (JSON-RPC 2.0, newline-delimited), so an MCP client can ask Codex
//! for a second opinion or a code review without leaving its session.
//!
//! # Tools
//!
//! - `ask_codex` — question + optional context (literal text or a file
//!   path to inline) + optional model
//! - `codex_review` — review a git diff ("current changes"), a file, or
//!   a literal code snippet, with an optional focus
//!
//! # Architecture
//!
//! ```text
//! stdin (JSON-RPC) → McpServer → ToolRouter → ask / review handlers
//!                                                  ↓
//!                                     codex exec / git diff subprocesses
//! stdout (JSON-RPC) ←──────────────────────────────┘
//! ```
//!
//! The server is fully synchronous: one request at a time, each tool
//! call blocking on its subprocess. The only startup requirement is
//! that the codex binary answers `--version`, checked once before the
//! serve loop begins.

pub mod codex;
pub mod error;
pub mod git;
pub mod server;
pub mod tools;
pub mod util;

pub use error::{ConsultError, ConsultResult};
pub use server::run_mcp_server;
