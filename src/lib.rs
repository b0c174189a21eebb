//! Hong Kong weather bot.
//!
//! Scrapes the Hong Kong Observatory RSS feeds and rainfall nowcast, turns
//! them into short bilingual notifications, and forwards those to an IFTTT
//! Maker webhook. Runs as a one-shot CLI or as a small HTTP trigger service.

pub mod alert;
pub mod analysis;
pub mod checks;
pub mod config;
pub mod endpoints;
pub mod extract;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod server;
