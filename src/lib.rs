//! Consensus Decentralization
//!
//! Attributes the blocks a ledger produced to the entities that control
//! them and measures how concentrated block production is.
//!
//! This crate provides the core implementation for the
//! `consensus-decentralization` CLI tool:
//!
//! - [`identity`] loads identity data and resolves ownership links
//! - [`mapping`] classifies blocks into entities
//! - [`aggregator`] counts blocks per entity and time chunk
//! - [`metrics`] computes Gini, HHI and related concentration metrics
//!
//! ## Getting Started
//!
//! ```bash
//! consensus-decentralization analyze --ledgers bitcoin --start 2021 --end 2021
//! ```

pub mod aggregator;
pub mod commands;
pub mod identity;
pub mod mapping;
pub mod metrics;
pub mod output;
pub mod parser;
pub mod utils;
