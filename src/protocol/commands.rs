//! Module `commands`
//!
//! Defines the chat commands parsed from client input lines.

/// Represents one line received from a client, classified into a command.
///
/// Commands are case-sensitive prefixes of the raw line; anything that is
/// not a recognized command is relayed verbatim as a chat message.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// `/nick <newname>` — change nickname; the argument is everything
    /// after the first space, taken verbatim (it may contain spaces).
    Nick(String),
    /// `/nick` with no argument, reported privately to the issuer.
    NickMissing,
    /// Any line starting with `/quit`: leave and shut the server down.
    Quit,
    /// Anything else, including the empty line, relayed as-is.
    Message(String),
}
