//! Read-only views of the economy handed to statistics consumers at month end.

use serde::{Deserialize, Serialize};

use crate::GovVariant;

/// Per-firm reading.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FirmSnapshot {
    /// Cash balance (`f64`, conserved up to rounding).
    pub money: f64,
    /// Unsold stock at month end.
    pub inventory: f64,
    pub price: f64,
    pub marginal_cost: f64,
    /// Units requested from the firm this month.
    pub demand: f64,
    pub employee_count: usize,
    /// Posted wage, not the payout of a short month.
    pub wage: f64,
    /// Months since the firm last opened a position.
    pub months_hiring: u32,
}

/// Per-household reading.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HouseholdSnapshot {
    /// Balance after wages, profits, tax and UBI.
    pub money: f64,
    /// Wages and profit shares received this month.
    pub income: f64,
    /// Income tax paid this month.
    pub tax_paid: f64,
    /// UBI received this month.
    pub ubi_received: f64,
    pub employed: bool,
    pub reservation_wage: f64,
}

/// Government reading; `composition` holds party weights for the
/// representative variant and is empty otherwise.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GovSnapshot {
    pub variant: GovVariant,
    /// Treasury balance left after the UBI payout.
    pub money: f64,
    pub tax_rate: f64,
    /// UBI paid to each household this month.
    pub ubi: f64,
    pub composition: Vec<f64>,
}

/// Inequality metrics computed for the month.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EqualitySnapshot {
    pub gini_wealth: f64,
    pub gini_income: f64,
    pub hoover_wealth: f64,
}

/// Everything a statistics collaborator sees after a month has settled.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MonthSnapshot {
    /// Zero-based month index.
    pub month: u32,
    /// One entry per firm, in id order.
    pub firms: Vec<FirmSnapshot>,
    /// One entry per household, in id order.
    pub households: Vec<HouseholdSnapshot>,
    /// `None` when the economy runs without a government.
    pub government: Option<GovSnapshot>,
    pub equality: EqualitySnapshot,
}

impl MonthSnapshot {
    /// Sum of all balances, including the treasury.
    pub fn total_money(&self) -> f64 {
        self.firms.iter().map(|f| f.money).sum::<f64>()
            + self.households.iter().map(|h| h.money).sum::<f64>()
            + self.government.as_ref().map_or(0.0, |g| g.money)
    }

    /// Fraction of households with an employer.
    pub fn employment_rate(&self) -> f64 {
        if self.households.is_empty() {
            return 0.0;
        }
        let employed = self.households.iter().filter(|h| h.employed).count();
        employed as f64 / self.households.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hh(money: f64, employed: bool) -> HouseholdSnapshot {
        HouseholdSnapshot {
            money,
            income: 0.0,
            tax_paid: 0.0,
            ubi_received: 0.0,
            employed,
            reservation_wage: 1.0,
        }
    }

    #[test]
    fn employment_rate_counts_employed() {
        let snap = MonthSnapshot {
            month: 0,
            firms: vec![],
            households: vec![hh(1.0, true), hh(2.0, false), hh(3.0, true), hh(4.0, true)],
            government: Some(GovSnapshot {
                variant: GovVariant::DataDriven,
                money: 5.0,
                tax_rate: 0.0,
                ubi: 0.0,
                composition: vec![],
            }),
            equality: EqualitySnapshot::default(),
        };
        assert!((snap.employment_rate() - 0.75).abs() < 1e-12);
        assert!((snap.total_money() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let snap = MonthSnapshot {
            month: 2,
            firms: vec![FirmSnapshot {
                money: 10.0,
                inventory: 3.0,
                price: 1.2,
                marginal_cost: 0.8,
                demand: 40.0,
                employee_count: 4,
                wage: 52.0,
                months_hiring: 1,
            }],
            households: vec![hh(1.0, true)],
            government: Some(GovSnapshot {
                variant: GovVariant::Representative,
                money: 0.0,
                tax_rate: 0.1,
                ubi: 2.0,
                composition: vec![0.2; 5],
            }),
            equality: EqualitySnapshot { gini_wealth: 0.3, gini_income: 0.2, hoover_wealth: 0.1 },
        };
        let s = serde_json::to_string(&snap).unwrap();
        let back: MonthSnapshot = serde_json::from_str(&s).unwrap();
        assert_eq!(back, snap);
    }
}
