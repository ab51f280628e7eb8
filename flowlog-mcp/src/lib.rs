//! Flowlog MCP server
//!
//! Exposes the backend log API as MCP tools over JSON-RPC on stdio.
//!
//! - `tools`: the tool registry and the six log tools
//! - `server`: JSON-RPC method dispatch
//! - `stdio`: line-delimited transport
//! - `config`: host configuration

pub mod config;
pub mod protocol;
pub mod server;
pub mod stdio;
pub mod tools;
