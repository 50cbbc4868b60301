//! JSON-RPC wire model for the analytics MCP protocol.
//!
//! Requests are serialized to exactly one line of JSON; responses arrive as
//! one line each. The read side never fails on bad bytes — a line that does
//! not parse is surfaced as [`Incoming::Raw`] so diagnostics can always
//! inspect what the server actually wrote, and end-of-stream with no data is
//! [`Incoming::Absent`], which callers must treat as "no response".

use serde::Serialize;
use serde_json::{Value, json};

/// The protocol marker every request carries.
pub const JSONRPC_VERSION: &str = "2.0";

/// A single JSON-RPC request.
///
/// `id` uniquely identifies one in-flight exchange. The harness issues one
/// request at a time, so correlation degenerates to FIFO matching, but the
/// field is still required by the external contract.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    /// Build a request for an arbitrary method.
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params,
        }
    }

    /// The session-initiation handshake: protocol version, an empty
    /// capability set, and the client identity.
    pub fn initialize(
        id: u64,
        protocol_version: &str,
        client_name: &str,
        client_version: &str,
    ) -> Self {
        Self::new(
            id,
            "initialize",
            Some(json!({
                "protocolVersion": protocol_version,
                "capabilities": {},
                "clientInfo": {
                    "name": client_name,
                    "version": client_version,
                }
            })),
        )
    }

    /// Tool discovery.
    pub fn tools_list(id: u64) -> Self {
        Self::new(id, "tools/list", None)
    }

    /// Tool invocation with a structured arguments object.
    pub fn tools_call(id: u64, tool: &str, arguments: Value) -> Self {
        Self::new(
            id,
            "tools/call",
            Some(json!({
                "name": tool,
                "arguments": arguments,
            })),
        )
    }
}

/// One read attempt from the response stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// The line parsed as a JSON object.
    Parsed(Value),
    /// The line was not valid JSON; the literal bytes are preserved.
    Raw(String),
    /// End of stream before any data arrived.
    Absent,
}

impl Incoming {
    /// The parsed value, if this is a [`Incoming::Parsed`].
    pub fn as_parsed(&self) -> Option<&Value> {
        match self {
            Self::Parsed(v) => Some(v),
            _ => None,
        }
    }

    /// Whether any bytes arrived at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}
