//! shiftpay - group-chat shift extraction and payment tracking
//!
//! Watches a group chat for messages mentioning one tracked person,
//! extracts (date, venue) shift entries through a model-first pipeline
//! with a deterministic regex fallback, persists them in SQLite and
//! drives an unpaid → paid/waiting workflow over interactive prompts,
//! with a recurring overdue-reminder sweep.

pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod extract;
pub mod listener;
pub mod models;
pub mod report;
pub mod status;
pub mod sweep;
pub mod telegram;

pub use error::{Error, Result};
