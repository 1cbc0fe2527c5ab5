//! Chat protocol
//!
//! Line classification and the text of every server announcement.

pub mod commands;
pub mod parser;
pub mod responses;

pub use commands::Command;
pub use parser::{parse_line, trim_line_ending};
