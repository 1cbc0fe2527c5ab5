//! Chat line parsing
//!
//! Classifies raw client lines into commands. Matching is deliberately
//! permissive: only the `/nick ` and `/quit` prefixes are special,
//! everything else (including `/nickname` and the empty line) is a
//! chat message relayed verbatim.

use crate::protocol::Command;

/// Strips a single trailing line terminator (`\n` or `\r\n`) from a line
/// read off the wire. Nothing else is trimmed; message text and nicknames
/// are preserved verbatim.
pub fn trim_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Parses one client line (already stripped of its terminator) into a
/// `Command`.
pub fn parse_line(line: &str) -> Command {
    if let Some(rest) = line.strip_prefix("/nick ") {
        if rest.is_empty() {
            Command::NickMissing
        } else {
            Command::Nick(rest.to_string())
        }
    } else if line == "/nick" {
        Command::NickMissing
    } else if line.starts_with("/quit") {
        Command::Quit
    } else {
        Command::Message(line.to_string())
    }
}
