//! ormpack CLI library.
//!
//! Command implementations and machine-readable output types for the
//! `ormpack` binary.

pub mod commands;
