//! Confluence - rule-based bullish setup scanner for equities.
//!
//! Scores a symbol universe by a confluence of technical signals, enriches
//! candidates with fundamentals and delivers alerts.

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;
