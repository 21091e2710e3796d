//! IniMeg: a console chat client for hosted LLM completion endpoints.
//!
//! The binary entry point is `src/main.rs`; everything it wires together is
//! exposed here for integration tests.

pub mod chat;
pub mod config;
pub mod console;
pub mod error;
pub mod llm;
pub mod logger;
