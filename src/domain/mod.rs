//! Core domain types and simulation logic.

pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod ledger;
pub mod metrics;
pub mod policy;
pub mod price;
pub mod simulation;
pub mod timeline;
pub mod trader;
pub mod universe;
