//! Error types for the codex-consultant crate.

/// Consultant-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    /// Codex CLI not found on PATH or not executable.
    #[error("codex command not found or not executable: {reason}")]
    CodexUnavailable { reason: String },

    /// A subprocess could not be spawned at all.
    #[error("failed to spawn {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A subprocess exceeded its execution deadline and was killed.
    #[error("{command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    /// A subprocess ran but exited non-zero. Captured combined
    /// stdout+stderr is carried for diagnostics.
    #[error("{command} exited with status {code}\nOutput: {output}")]
    ExecFailed {
        command: String,
        code: i32,
        output: String,
    },

    /// Git invocation failed. An empty diff is not an error, it is a
    /// meaningful signal handled by the review tool.
    #[error("git error: {reason}")]
    Git { reason: String },
}

/// Convenience result type for codex-consultant operations.
pub type ConsultResult<T> = Result<T, ConsultError>;
