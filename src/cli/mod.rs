//! Command-line interface for the streamchat binary.
//!
//! Flags are parsed by hand before the runtime starts:
//!
//! ```ignore
//! use streamchat::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     Ok(CliCommand::Chat(options)) => { /* start chatting */ }
//!     Ok(other) => { /* version or help */ }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

pub mod args;
pub mod render;

pub use args::{parse_args, ArgsError, ChatOptions, CliCommand, USAGE};
pub use render::{OutputStatus, TranscriptPrinter};

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
