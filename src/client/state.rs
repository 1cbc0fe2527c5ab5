//! Module `state`
//!
//! Defines the `Session` struct holding one connection's chat state: its
//! socket address and current nickname.

use std::net::SocketAddr;

/// Per-connection session state.
///
/// The nickname starts unset and is filled in once negotiation completes.
/// It is taken verbatim from the client: no trimming, no uniqueness check,
/// the empty string is allowed.
pub struct Session {
    addr: SocketAddr,
    nickname: Option<String>,
}

impl Session {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            nickname: None,
        }
    }

    /// The peer's socket address, which is this session's identity in the
    /// registry.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The current nickname, or `""` before negotiation has completed.
    pub fn nickname(&self) -> &str {
        self.nickname.as_deref().unwrap_or("")
    }

    /// Returns whether nickname negotiation has completed.
    pub fn is_named(&self) -> bool {
        self.nickname.is_some()
    }

    /// Sets the nickname, both at negotiation and on `/nick` renames.
    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = Some(nickname);
    }
}
