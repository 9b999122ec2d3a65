//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable type name, used in logs.
    fn command_type(&self) -> &'static str;

    /// Correlation ID linking the command to the events it causes.
    fn correlation_id(&self) -> Uuid;
}
