//! Outbound messages.
//!
//! Wording for the two notification types and the relay that delivers them.
//! Alert deduplication and cooldowns are left to the relay (IFTTT applets).

pub mod narrative;
pub mod weather_report;
pub mod webhook;
