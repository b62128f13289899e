//! Slack webhook handling
//!
//! This module handles incoming requests from Slack:
//! - Events API callbacks (mentions, direct messages, URL verification)
//! - Interactive component callbacks (team selection)

pub mod dto;
pub mod signature;
pub mod slack_handler;

pub use slack_handler::{handle_slack_events, handle_slack_interactivity};
