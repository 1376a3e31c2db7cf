//! `freeze-watch` library crate.
//!
//! Looks up recent CloudTrail mutation events and mails one violation
//! notice per event. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod notifier;
pub mod runner;
pub mod source;
