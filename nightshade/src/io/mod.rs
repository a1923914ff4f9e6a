//! Side-effecting boundaries: configuration files, terminal input and output,
//! and the countdown thread.

pub mod config;
pub mod countdown;
pub mod input;
pub mod sink;
