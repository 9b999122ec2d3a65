//! Fablepath — command-line front end.
//!
//! Wires the bounded contexts together for local use: validating story files
//! and replaying a list of choices against them.

pub mod config;
pub mod error;
pub mod recorder;
pub mod runner;
