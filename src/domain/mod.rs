pub mod bits;
pub mod dispatch;
pub mod health;
pub mod slack;
pub mod webhook;
