//! Application layer for the Narrative Playback context.

pub mod command_handlers;
pub mod query_handlers;
pub mod replay;
