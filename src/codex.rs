//! Codex CLI client — availability check and non-interactive execution.
//!
//! Shells out to the `codex` binary. `verify()` is the fail-fast startup
//! precondition; `exec()` runs `codex exec --model <model> -- <prompt>`
//! and relays combined stdout+stderr.

use std::process::Command;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConsultError, ConsultResult};
use crate::util::proc::run_captured;

/// Model requested when the caller does not pick one. Review always
/// uses this model regardless of caller input.
pub const DEFAULT_MODEL: &str = "gpt-5-codex";

/// Default deadline for a single codex invocation (seconds). Codex
/// latency is unbounded and the stdio transport carries no cancellation
/// signal, so the deadline is the only bound on a stuck call.
pub const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 600;

/// Bound on the quick `--version` probe at startup.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the external codex binary.
#[derive(Debug, Clone)]
pub struct CodexClient {
    binary: String,
    timeout: Duration,
}

impl CodexClient {
    #[must_use]
    pub const fn new(binary: String, timeout: Duration) -> Self {
        Self { binary, timeout }
    }

    /// The configured binary name (for log/error messages).
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Startup precondition: the binary must resolve on PATH and its
    /// version probe must exit 0. Called once before serving begins;
    /// failure here aborts startup.
    pub fn verify(&self) -> ConsultResult<()> {
        which::which(&self.binary).map_err(|e| ConsultError::CodexUnavailable {
            reason: format!("{}: {e}", self.binary),
        })?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--version");
        let captured = run_captured(cmd, VERIFY_TIMEOUT).map_err(|e| {
            ConsultError::CodexUnavailable {
                reason: e.to_string(),
            }
        })?;
        if !captured.success() {
            return Err(ConsultError::CodexUnavailable {
                reason: format!("`{} --version` exited with status {}", self.binary, captured.code),
            });
        }

        debug!(binary = self.binary, "codex CLI verified");
        Ok(())
    }

    /// Run codex in non-interactive mode with the given model and
    /// instruction, returning combined stdout+stderr verbatim.
    ///
    /// A non-zero exit becomes [`ConsultError::ExecFailed`] carrying the
    /// captured output; the handler boundary turns that into a
    /// structured tool error, never a crash.
    pub fn exec(&self, model: &str, instruction: &str) -> ConsultResult<String> {
        debug!(
            binary = self.binary,
            model,
            instruction_bytes = instruction.len(),
            "invoking codex exec"
        );

        let mut cmd = Command::new(&self.binary);
        cmd.arg("exec").arg("--model").arg(model).arg("--").arg(instruction);

        let captured = run_captured(cmd, self.timeout)?;
        if !captured.success() {
            return Err(ConsultError::ExecFailed {
                command: format!("{} exec", self.binary),
                code: captured.code,
                output: captured.output,
            });
        }
        Ok(captured.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_missing_binary() {
        let client = CodexClient::new(
            "codex-consultant-no-such-binary-12345".to_owned(),
            Duration::from_secs(5),
        );
        let err = client.verify().expect_err("missing binary must fail verification");
        assert!(matches!(err, ConsultError::CodexUnavailable { .. }));
    }

    #[test]
    fn test_exec_missing_binary_is_recoverable() {
        let client = CodexClient::new(
            "codex-consultant-no-such-binary-12345".to_owned(),
            Duration::from_secs(5),
        );
        let err = client.exec(DEFAULT_MODEL, "hello").expect_err("spawn must fail");
        assert!(matches!(err, ConsultError::SpawnFailed { .. }));
    }
}
