//! Slack Web API access

pub mod client;
pub mod dto;

#[cfg(test)]
pub use client::MockSlackApi;
pub use client::{SlackApi, SlackClient, SlackHandle};
pub use dto::OutgoingMessage;
