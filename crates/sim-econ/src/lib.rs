#![deny(warnings)]

//! Agent models for the redistribution economy.
//!
//! This crate provides:
//! - Firm decisions: wage, price, hiring, production, wages and profits
//! - Household decisions: vendor and job search, consumption, taxes
//! - Decentralized matching helpers for the goods and labor markets
//! - The agent registry and inequality metrics

pub mod economy;
pub mod firm;
pub mod household;
pub mod market;
pub mod metrics;

pub use economy::Economy;
pub use firm::Firm;
pub use household::Household;
pub use metrics::{band_shares, gini, hoover, EqualityHistory};
