//! Server core functionality
//!
//! This module contains the main server implementation, configuration,
//! and shutdown coordination for the chat relay.

pub mod config;
pub mod core;
pub mod shutdown;

pub use config::ServerConfig;
pub use core::Server;
pub use shutdown::ShutdownSignal;
