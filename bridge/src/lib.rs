//! Kali bridge
//!
//! The calling side of the Kali tool server. [`client::RemoteClient`] reaches
//! the server over HTTP and folds every failure into a reply value instead of
//! an error. [`dispatch::Dispatcher`] maps agent function calls onto the
//! server's endpoints, and [`mcp`] exposes them as JSON-RPC tools.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod mcp;
pub mod schema;
