//! Deterministic replay of a recorded choice sequence.

use std::sync::Arc;

use fablepath_content::domain::published::PublishedStory;
use fablepath_core::clock::Clock;
use uuid::Uuid;

use crate::domain::aggregates::PlayerSession;
use crate::domain::errors::SessionError;

/// Opens a fresh session on `story` and applies `choices` in order.
///
/// The same story and the same sequence always yield the same score, ending
/// and path.
///
/// # Errors
///
/// Stops at the first rejected choice and returns its error.
pub fn replay(
    story: Arc<PublishedStory>,
    choices: &[usize],
    clock: &dyn Clock,
) -> Result<PlayerSession, SessionError> {
    let correlation_id = Uuid::new_v4();
    let mut session = PlayerSession::start(story, correlation_id, clock);
    for &choice_index in choices {
        session.choose(choice_index, correlation_id, clock)?;
    }
    Ok(session)
}
