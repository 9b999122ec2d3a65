//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// An aggregate whose state changes are expressed as an ordered event log.
///
/// Command methods validate first, then build events and route every one of
/// them through [`AggregateRoot::apply`]. `apply` never fails, so a rejected
/// command leaves the aggregate untouched.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the number of events applied so far.
    fn version(&self) -> i64;

    /// Applies an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events produced since the last drain.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Removes and returns the uncommitted events, oldest first.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
