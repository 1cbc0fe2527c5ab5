//! Client management system
//!
//! Handles client connections, the shared live set, and session lifecycle.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::handle_client;
pub use registry::{ClientHandle, ClientRegistry};
pub use state::Session;
