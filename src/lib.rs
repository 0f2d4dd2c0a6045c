//! telegram-bridge — Telegram adapter for a supervised bot coordinator.
//!
//! Normalizes inbound chat events into envelopes for the coordinator and
//! renders the coordinator's outbound directives as Telegram API calls.
//! Runs as a child process speaking JSON lines over stdio.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bus;
pub mod config;
pub mod l10n;
pub mod logging;
pub mod telegram;
pub mod types;
