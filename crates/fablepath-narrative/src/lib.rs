//! Fablepath — Narrative Playback bounded context.
//!
//! Responsible for walking a published story graph on behalf of one player:
//! presenting the current node, applying choices, accumulating score, and
//! finalizing the session when an ending is reached.

pub mod application;
pub mod domain;
