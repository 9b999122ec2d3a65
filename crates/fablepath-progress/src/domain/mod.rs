//! Domain model for the Session & Progress context.

pub mod commands;
pub mod ports;
pub mod rewards;
