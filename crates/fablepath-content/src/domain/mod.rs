//! Domain model for the Story Authoring context.

pub mod authoring;
pub mod commands;
pub mod published;
pub mod repository;
pub mod rotation;
pub mod story;
pub mod validation;
