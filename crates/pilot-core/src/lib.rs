//! Core library for Prompt Pilot.
//!
//! Chat sessions, a folder-based prompt library and user principles, kept as
//! flat JSON collections and fed to an OpenAI chat-completions endpoint for
//! prompt optimization.

pub mod config;
pub mod error;
pub mod llm;
pub mod migrate;
pub mod model;
pub mod service;
pub mod store;

pub use service::PilotService;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
