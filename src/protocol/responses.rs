//! Server announcements
//!
//! Centralizes every line of text the server sends to clients, so the wire
//! format lives in one place. All lines are sent with a trailing newline
//! appended by the connection's writer task.

/// Prompt sent once per connection, before nickname negotiation.
pub const NICKNAME_PROMPT: &str = "Please enter a nickname: ";

/// Private reply to a `/nick` command with no argument.
pub const NO_NICKNAME: &str = "No nickname provided.";

/// Announcement broadcast when a client completes nickname negotiation.
pub fn joined(nickname: &str) -> String {
    format!("{} joined the chat!", nickname)
}

/// Announcement broadcast when a client changes nickname. Uses the old
/// name; the rename takes effect after the announcement.
pub fn renamed(old: &str, new: &str) -> String {
    format!("{} changed their nickname to {}", old, new)
}

/// Announcement broadcast when a client issues `/quit`.
pub fn departed(nickname: &str) -> String {
    format!("{} left the chat!", nickname)
}

/// A relayed chat line.
pub fn chat(nickname: &str, text: &str) -> String {
    format!("{}: {}", nickname, text)
}
