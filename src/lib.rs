//! Leave Engine
//!
//! This crate computes leave balances and leave-pattern analytics for an HR
//! system: a monthly accrual ledger over a configurable leave year,
//! loss-of-pay days for a month, and "sandwich" leave that brackets holidays
//! or weekends. Results are exposed as a library and over a small HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
