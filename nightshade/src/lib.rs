//! Interactive spy-terminal session engine.
//!
//! A read-only virtual namespace is browsed through a line-oriented command
//! interpreter while a countdown device, once armed, ticks on its own thread
//! and resolves exactly once: defused by the right code in time, or detonated
//! on expiry. The crate keeps a strict separation:
//!
//! - **[`core`]**: Deterministic logic (namespace, path resolution, parsing,
//!   session state, the hazard phase machine). No I/O.
//! - **[`io`]**: Terminal input and output, configuration, and the countdown
//!   thread.
//!
//! [`interpreter`] dispatches commands over the core types and [`session`]
//! drives the read-eval loop that ties everything to the I/O boundaries.

pub mod core;
pub mod exit_codes;
pub mod interpreter;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
