//! Child-process lifecycle for one harness session.
//!
//! A [`Session`] is one external analytics server instance plus its three
//! pipes, owned exclusively by the scenario driver for its lifetime.
//! Termination is explicit ([`Session::terminate_and_wait`]) and must be
//! reachable from every exit path; `kill_on_drop` backstops panics and
//! early returns so no orphaned child survives a harness run.

use std::process::Stdio;

use thiserror::Error;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

/// The target executable could not be started. Fatal: aborts the run.
#[derive(Debug, Error)]
#[error("failed to launch {program}: {source}")]
pub struct LaunchError {
    pub program: String,
    #[source]
    pub source: std::io::Error,
}

/// Lifecycle state of a session.
///
/// `Terminated` is absorbing: once entered, no further exchanges are
/// accepted and repeated termination is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Terminated,
}

/// One spawned analytics server and its pipes.
#[derive(Debug)]
pub struct Session {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    // Held so the child never blocks on a full stderr pipe; read only for
    // post-mortem diagnostics.
    _stderr: Option<ChildStderr>,
    state: SessionState,
}

impl Session {
    /// Spawn the target executable with all three stdio streams piped.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the process cannot be spawned — the only
    /// fatal condition in the harness.
    pub fn start(program: &str, args: &[String]) -> Result<Self, LaunchError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| LaunchError {
            program: program.to_string(),
            source,
        })?;

        // Piped stdio is requested above, so the handles are always present.
        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| LaunchError {
                program: program.to_string(),
                source: std::io::Error::other("child stdout unavailable"),
            })?;
        let stderr = child.stderr.take();

        tracing::debug!(program, ?args, "session started");
        Ok(Self {
            child,
            stdin,
            stdout,
            _stderr: stderr,
            state: SessionState::Ready,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The write half of the request pipe, while the session is live.
    pub(crate) fn stdin_mut(&mut self) -> Option<&mut ChildStdin> {
        self.stdin.as_mut()
    }

    /// The buffered read half of the response pipe.
    pub(crate) fn stdout_mut(&mut self) -> &mut BufReader<ChildStdout> {
        &mut self.stdout
    }

    /// Signal the child and block until it has fully exited.
    ///
    /// Closing stdin first gives a cooperative child its EOF; the kill that
    /// follows covers one that ignores it. Repeated calls after the first
    /// are no-ops — `Terminated` is absorbing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if waiting on the child fails.
    pub async fn terminate_and_wait(&mut self) -> std::io::Result<()> {
        if self.state == SessionState::Terminated {
            return Ok(());
        }
        self.state = SessionState::Terminated;

        drop(self.stdin.take());
        // start_kill errors when the child already exited; the wait below
        // still reaps it either way.
        let _ = self.child.start_kill();
        let status = self.child.wait().await?;
        tracing::debug!(%status, "session terminated");
        Ok(())
    }

    /// Whether the child has exited, without blocking.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the status check fails.
    pub fn try_exit_status(&mut self) -> std::io::Result<Option<std::process::ExitStatus>> {
        self.child.try_wait()
    }
}
