//! Application layer for the Story Authoring context.

pub mod command_handlers;
pub mod query_handlers;
