//! Blocking subprocess capture with a deadline.
//!
//! All external commands in this crate (codex, git) go through
//! [`run_captured`]: spawn with piped stdio, drain stdout and stderr on
//! reader threads so a chatty child cannot block on a full pipe, poll
//! until exit or deadline, kill and reap on expiry.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::{ConsultError, ConsultResult};

/// Poll interval while waiting for the child to exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of a captured subprocess run.
#[derive(Debug)]
pub struct CapturedOutput {
    /// Exit code (-1 if terminated by signal).
    pub code: i32,
    /// Combined output: stdout followed by stderr, lossily decoded.
    pub output: String,
}

impl CapturedOutput {
    /// Whether the child exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run `cmd` to completion, capturing combined stdout+stderr.
///
/// The child is killed and reaped if it is still running when `timeout`
/// elapses. A non-zero exit is NOT an error here; callers decide what a
/// failing exit means for them.
pub fn run_captured(mut cmd: Command, timeout: Duration) -> ConsultResult<CapturedOutput> {
    let display = command_display(&cmd);

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ConsultError::SpawnFailed {
            command: display.clone(),
            source,
        })?;

    // Drain both pipes concurrently; reading only after exit can
    // deadlock once the pipe buffer fills.
    let stdout_reader = child.stdout.take().map(spawn_drain);
    let stderr_reader = child.stderr.take().map(spawn_drain);

    let start = Instant::now();
    let status = loop {
        let polled = child.try_wait().map_err(|source| ConsultError::SpawnFailed {
            command: display.clone(),
            source,
        })?;
        match polled {
            Some(status) => break status,
            None if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                join_drain(stdout_reader);
                join_drain(stderr_reader);
                return Err(ConsultError::Timeout {
                    command: display,
                    secs: timeout.as_secs(),
                });
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    let stdout = join_drain(stdout_reader);
    let stderr = join_drain(stderr_reader);

    let mut output = String::from_utf8_lossy(&stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&stderr));

    Ok(CapturedOutput {
        code: status.code().unwrap_or(-1),
        output,
    })
}

/// Human-readable `program arg1 arg2 ...` for error messages.
fn command_display(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

fn spawn_drain(mut pipe: impl std::io::Read + Send + 'static) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_drain(handle: Option<std::thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
