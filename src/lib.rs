//! streamchat - incremental chat stream decoding and conversation state
//!
//! This library exposes modules for use in integration tests and by the
//! `streamchat` binary.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod state;
pub mod traits;
