//! # Atelier Income Reporting Engine
//!
//! This crate turns the raw order book into the shop's income reports. It
//! acts as the "unbiased bookkeeper" of the system.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `ReportingEngine` is a stateless
//!   calculator. It takes a collection of orders as input and produces an
//!   `IncomeReport` as output. This makes it highly reliable and easy to
//!   test.
//!
//! ## Public API
//!
//! - `ReportingEngine`: the main struct that contains the aggregation logic.
//! - `IncomeReport` and its `Daily`/`Monthly`/`Yearly` shapes.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::ReportingEngine;
pub use report::{DailyReport, DayBucket, IncomeReport, MonthBucket, MonthlyReport, YearlyReport};
