//! Synchronous request/response exchange over a session.
//!
//! [`ProbeClient`] composes the session's pipes with the line framer into a
//! blocking call: write one framed request, then read exactly one framed
//! response line. The protocol is used strictly synchronously — one
//! outstanding request at a time — so id correlation degenerates to FIFO
//! matching and no pending-request table is kept. If pipelined requests
//! were ever introduced, this is the seam to replace with an
//! `id → waiter` map populated on send.

use serde_json::Value;
use thiserror::Error;

use mprobe_core::rpc::{Incoming, Request};

use crate::framing::{read_line, write_line};
use crate::session::{Session, SessionState};

/// A transport-level exchange failure.
///
/// Never fatal to the run: the scenario step is marked failed and the
/// driver proceeds to cleanup.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("session already terminated; no further exchanges allowed")]
    SessionTerminated,
    #[error("failed to write request: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to read response: {0}")]
    Read(#[source] std::io::Error),
}

/// A client driving one session through ordered exchanges.
#[derive(Debug)]
pub struct ProbeClient {
    session: Session,
    next_id: u64,
}

impl ProbeClient {
    /// Wrap a freshly started session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            next_id: 1,
        }
    }

    /// Issue one request and block until its response line is read.
    ///
    /// No response is ever read before the request is fully flushed, and
    /// exactly one line is consumed per call.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::SessionTerminated`] on use after
    /// termination (a usage error), or the underlying pipe failure.
    /// End-of-stream is *not* an error: it surfaces as
    /// [`Incoming::Absent`].
    pub async fn call(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Incoming, TransportError> {
        let request = Request::new(self.take_id(), method, params);
        self.exchange(&request).await
    }

    /// The session-initiation handshake.
    ///
    /// Must precede all tool calls within a session; the response is only
    /// checked for presence by the driver.
    ///
    /// # Errors
    ///
    /// See [`ProbeClient::call`].
    pub async fn initialize(
        &mut self,
        protocol_version: &str,
        client_name: &str,
        client_version: &str,
    ) -> Result<Incoming, TransportError> {
        let request = Request::initialize(
            self.take_id(),
            protocol_version,
            client_name,
            client_version,
        );
        self.exchange(&request).await
    }

    /// Tool discovery.
    ///
    /// # Errors
    ///
    /// See [`ProbeClient::call`].
    pub async fn list_tools(&mut self) -> Result<Incoming, TransportError> {
        let request = Request::tools_list(self.take_id());
        self.exchange(&request).await
    }

    /// Invoke a named tool with a structured arguments object.
    ///
    /// # Errors
    ///
    /// See [`ProbeClient::call`].
    pub async fn call_tool(
        &mut self,
        tool: &str,
        arguments: Value,
    ) -> Result<Incoming, TransportError> {
        let request = Request::tools_call(self.take_id(), tool, arguments);
        self.exchange(&request).await
    }

    /// Terminate the underlying session and wait for the child to exit.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if waiting on the child fails.
    pub async fn terminate_and_wait(&mut self) -> std::io::Result<()> {
        self.session.terminate_and_wait().await
    }

    /// The wrapped session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    async fn exchange(&mut self, request: &Request) -> Result<Incoming, TransportError> {
        if self.session.state() == SessionState::Terminated {
            return Err(TransportError::SessionTerminated);
        }
        tracing::debug!(id = request.id, method = %request.method, "exchange");

        {
            let stdin = self
                .session
                .stdin_mut()
                .ok_or(TransportError::SessionTerminated)?;
            write_line(stdin, request).await.map_err(TransportError::Write)?;
        }
        read_line(self.session.stdout_mut())
            .await
            .map_err(TransportError::Read)
    }
}
