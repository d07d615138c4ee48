//! Core domain types and pricing logic.

pub mod plan;
pub mod strategy;
pub mod pricing;
pub mod quote_table;
pub mod validation;
pub mod error;
