//! Command implementations behind the `reflector` binary.

pub mod commands;
