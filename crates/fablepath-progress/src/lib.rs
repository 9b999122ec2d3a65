//! Fablepath — Session & Progress bounded context.
//!
//! Responsible for turning a finished session into a reward and handing the
//! result to the external recorder and awarder.

pub mod application;
pub mod domain;
