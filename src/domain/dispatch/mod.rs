//! Command dispatch for mentions, direct messages and interactive callbacks

pub mod action;
pub mod command;
pub mod error;
pub mod router;

pub use action::{Action, ActionTable, InteractiveAction, Invocation};
pub use command::Command;
pub use error::DispatchError;
pub use router::{EventRouter, Outcome, RouterSettings, SkipReason};
