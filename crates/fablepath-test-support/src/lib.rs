//! Shared test doubles and story fixtures for the Fablepath engine.

mod clock;
pub mod fixtures;
mod rng;

pub use clock::{FixedClock, SteppingClock, test_epoch};
pub use fablepath_content::domain::repository::InMemoryStoryStore;
pub use rng::{MockRng, SequenceRng};
