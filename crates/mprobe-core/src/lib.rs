//! Core types for the metric-probe harness.
//!
//! This crate holds everything the harness asserts *about* — the wire model
//! for newline-delimited JSON-RPC, the response-shape contract, the textual
//! "Did you mean" suggestion block, and the metric query-expression surface —
//! with no process or pipe I/O of its own. The `mprobe-harness` crate owns
//! the child process and drives these types over its stdio pipes.

pub mod contract;
pub mod logging;
pub mod query;
pub mod rpc;
pub mod suggestion;

pub use contract::{ContractViolation, ToolDescriptor};
pub use query::{QueryExpr, Selector};
pub use rpc::{Incoming, Request};
pub use suggestion::SuggestionBlock;
