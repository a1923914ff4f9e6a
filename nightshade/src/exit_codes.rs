//! Stable exit codes for the nightshade CLI.

/// Session ended normally (exit, end of input, or defusal), or `check` passed.
pub const OK: i32 = 0;
/// Invalid config or namespace, or the input source failed.
pub const INVALID: i32 = 1;
/// The device detonated.
pub const DETONATED: i32 = 2;
