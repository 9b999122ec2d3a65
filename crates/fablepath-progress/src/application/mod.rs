//! Application layer for the Session & Progress context.

pub mod command_handlers;
