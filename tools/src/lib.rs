//! Kali tool API server
//!
//! Runs security tools and arbitrary shell commands on the host it is
//! deployed to. Every invocation goes through a [`session::ProcessSession`],
//! which enforces a wall-clock timeout and always yields an
//! [`kali_common::ExecutionResult`]. Tool endpoints render their command lines
//! from the shared catalog through the [`registry::Registry`].

pub mod commands;
pub mod config;
pub mod health;
pub mod registry;
pub mod server;
pub mod session;
