//! mprobe-harness library crate.
//!
//! Drives an external analytics MCP server through newline-delimited
//! JSON-RPC over a child process's stdio pipes and checks the contract it
//! exposes: handshake, tool discovery, and tool invocation including the
//! metric-suggestion error shape. Exposed as a library for integration
//! testing and for embedding the scenario driver.
//!
//! Layering, leaves first: [`session`] owns the child process, [`framing`]
//! turns values into wire lines and back, [`exchange`] composes the two
//! into one-request-one-response calls, and [`scenario`] scripts ordered
//! exchanges and grades the responses into a [`report`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod exchange;
pub mod framing;
pub mod report;
pub mod scenario;
pub mod session;

pub use exchange::{ProbeClient, TransportError};
pub use session::{LaunchError, Session};
