//! Kiln execution engine.
//!
//! Runs untrusted source code inside an isolated per-request workspace,
//! captures its stdout/stderr, and collects an optional image artifact the
//! program may have produced. [`pipeline::Engine`] is the entry point; one
//! call to [`pipeline::Engine::execute`] drives a request from source text to
//! its terminal outcome and guarantees the workspace is released on every
//! exit path.

pub mod artifact;
pub mod config;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod provision;
pub mod runner;
pub mod toolchain;
pub mod workspace;


pub use config::EngineConfig;
pub use error::EngineError;
pub use language::Language;
pub use pipeline::{Engine, ExecutionOutcome, ExecutionRequest};
