//! Domain model for the Narrative Playback context.

pub mod aggregates;
pub mod commands;
pub mod errors;
pub mod events;
pub mod view;
