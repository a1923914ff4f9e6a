//! Deterministic logic shared by the session engine.
//!
//! Core modules do no I/O. The only concurrency-aware type is
//! [`hazard::Hazard`], whose phase is the one piece of state shared with the
//! countdown thread.

pub mod command;
pub mod hazard;
pub mod namespace;
pub mod path;
pub mod session;
pub mod types;
