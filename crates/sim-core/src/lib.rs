#![deny(warnings)]

//! Core domain types for the redistribution economy.
//!
//! This crate defines the configuration, agent identifiers and the
//! serializable end-of-month snapshots shared by every other crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod config;
pub mod snapshot;

pub use config::{ConfigError, FirmParams, GovParams, HouseholdParams, PartyBasis, SimConfig};
pub use snapshot::{
    EqualitySnapshot, FirmSnapshot, GovSnapshot, HouseholdSnapshot, MonthSnapshot,
};

/// Index of a firm in the simulation registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FirmId(pub usize);

/// Index of a household in the simulation registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub usize);

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "firm#{}", self.0)
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hh#{}", self.0)
    }
}

/// Ternary recruiting state of a firm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiringStatus {
    /// One open position; the firm accepts the next eligible applicant.
    Hire,
    /// Neither hiring nor shedding staff.
    #[default]
    Idle,
    /// Stock is too high; one employee is laid off at month end.
    Fire,
}

/// Government policy variant, `None` disables the government phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovVariant {
    /// No government; nothing is taxed or redistributed.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Tax rate follows the latest wealth Gini.
    #[serde(rename = "data")]
    DataDriven,
    /// Every household votes on the tax rate.
    #[serde(rename = "dir")]
    DirectDemocratic,
    /// Quantile parties blend their demanded rates.
    #[serde(rename = "rep")]
    Representative,
}

impl GovVariant {
    /// Short name used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            GovVariant::None => "none",
            GovVariant::DataDriven => "data",
            GovVariant::DirectDemocratic => "dir",
            GovVariant::Representative => "rep",
        }
    }
}

impl fmt::Display for GovVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GovVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(GovVariant::None),
            "data" => Ok(GovVariant::DataDriven),
            "dir" => Ok(GovVariant::DirectDemocratic),
            "rep" => Ok(GovVariant::Representative),
            other => Err(format!("unknown government variant: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gov_variant_str_roundtrip() {
        for v in [
            GovVariant::None,
            GovVariant::DataDriven,
            GovVariant::DirectDemocratic,
            GovVariant::Representative,
        ] {
            assert_eq!(v.as_str().parse::<GovVariant>().unwrap(), v);
        }
        assert!("monarchy".parse::<GovVariant>().is_err());
    }

    #[test]
    fn gov_variant_serde_uses_short_names() {
        let s = serde_json::to_string(&GovVariant::DirectDemocratic).unwrap();
        assert_eq!(s, "\"dir\"");
    }
}
