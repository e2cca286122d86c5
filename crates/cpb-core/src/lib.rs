//! Core domain + application logic for the CryptoPulse Telegram bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / the price
//! provider live behind ports (traits) implemented in adapter crates.

pub mod coins;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod gate;
pub mod logging;
pub mod pricing;
pub mod texts;
pub mod users;

pub use errors::{Error, Result};
