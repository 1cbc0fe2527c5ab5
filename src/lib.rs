//! Chat Relay Server
//!
//! A minimal multi-client TCP chat relay: clients connect, choose a
//! nickname, and exchange newline-delimited lines broadcast to every
//! connected peer. Single room, best-effort, in-memory only.

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;

pub use server::{Server, ServerConfig, ShutdownSignal};
