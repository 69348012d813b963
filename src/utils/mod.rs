//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Command descriptors and execution
//! - `io` - File I/O with consistent error handling
//! - `parser` - Text extraction from markup
//! - `shell` - Shell escaping and quoting

pub mod command;
pub mod io;
pub mod parser;
pub mod shell;
