//! Fablepath — Story Authoring bounded context.
//!
//! Responsible for authoring payload ingestion, structural validation of the
//! story graph, and publication into the immutable arena form that sessions
//! play against.

pub mod application;
pub mod domain;
