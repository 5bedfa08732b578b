//! Simulation parameters and their validation.
//!
//! Defaults follow the baseline calibration of Lengnick (2013),
//! "Agent-based macroeconomics: A baseline model".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GovVariant;

/// Configuration errors; all are fatal and surface before the first tick.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A count that must be at least one was zero.
    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),
    /// A probability or fraction fell outside [0, 1].
    #[error("{name} must be within [0,1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    /// A value that must be strictly positive was not.
    #[error("{name} must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    /// Numeric field must be finite.
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),
    /// A lower bound exceeds its upper bound.
    #[error("bound {lo} exceeds {hi}")]
    InvertedBounds { lo: &'static str, hi: &'static str },
    /// Households cannot keep more distinct vendors than there are firms.
    #[error("num_vendors ({vendors}) exceeds num_firms ({firms})")]
    TooManyVendors { vendors: usize, firms: usize },
}

/// Top-level simulation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the single deterministic RNG stream.
    pub seed: u64,
    /// Number of simulated months.
    pub num_months: u32,
    /// Working days per month.
    pub days_in_month: u32,
    /// Firm behaviour and endowment.
    pub firms: FirmParams,
    /// Household behaviour and endowment.
    pub households: HouseholdParams,
    /// Government variant and its voting parameters.
    pub government: GovParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_months: 240,
            days_in_month: 21,
            firms: FirmParams::default(),
            households: HouseholdParams::default(),
            government: GovParams::default(),
        }
    }
}

/// Firm behaviour and initial endowment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmParams {
    /// Number of firms.
    pub num_firms: usize,
    /// Probability that a firm reconsiders its price at the start of a month.
    pub price_adj_prob: f64,
    /// Maximum fractional price change per adjustment.
    pub price_adj_rate: f64,
    /// Maximum fractional wage change per adjustment.
    pub wage_adj_rate: f64,
    /// Months without an open position before wages are cut.
    pub lo_wage_months: u32,
    /// Multiple of last month's demand giving the upper inventory bound.
    /// Stock above it marks the firm for a layoff.
    pub inv_lo: f64,
    /// Multiple of last month's demand giving the lower inventory bound.
    /// Stock below it opens a position. The lower bound may exceed the upper
    /// one; the lower check wins.
    pub inv_up: f64,
    /// Lower price bound as a multiple of marginal cost.
    pub price_lo: f64,
    /// Upper price bound as a multiple of marginal cost.
    pub price_up: f64,
    /// Items produced per employee per day.
    pub tech_lvl: f64,
    /// Fraction of the wage bill kept back from profit distribution.
    pub buffer_rate: f64,
    /// Starting balance of every firm.
    pub init_money: f64,
    /// Starting stock; also seeds the first month's demand.
    pub init_inventory: f64,
    /// Starting price before jitter.
    pub init_price: f64,
    /// Starting wage before jitter.
    pub init_wage: f64,
}

impl Default for FirmParams {
    fn default() -> Self {
        Self {
            num_firms: 100,
            price_adj_prob: 0.75,
            price_adj_rate: 0.02,
            wage_adj_rate: 0.019,
            lo_wage_months: 24,
            inv_lo: 0.25,
            inv_up: 1.0,
            price_lo: 1.025,
            price_up: 1.15,
            tech_lvl: 3.0,
            buffer_rate: 0.1,
            init_money: 0.0,
            init_inventory: 50.0,
            init_price: 1.0,
            init_wage: 52.0,
        }
    }
}

/// Household behaviour and initial endowment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdParams {
    /// Number of households.
    pub num_households: usize,
    /// Exponent damping monthly consumption relative to wealth, in (0, 1].
    pub cost_decay: f64,
    /// Number of vendors each household buys from.
    pub num_vendors: usize,
    /// Firms an unemployed household approaches per month.
    pub unemployed_ask_num: usize,
    /// Probability that a satisfied employee looks for a better job.
    pub repl_employer_prob: f64,
    /// Monthly probability of looking for a cheaper vendor.
    pub repl_vend_price_prob: f64,
    /// Monthly probability of replacing a vendor that ran out of stock.
    pub repl_vend_inv_prob: f64,
    /// Minimum relative price advantage for switching vendors.
    pub lower_vendor_price: f64,
    /// Fraction of daily demand after which shopping stops.
    pub demand_sat: f64,
    /// Monthly reservation wage factor while employed.
    pub rw_change_employed: f64,
    /// Reservation wage factor after a month of fruitless job search.
    pub rw_change_unemployed: f64,
    /// Reservation wage factor applied on a layoff.
    pub rw_change_fired: f64,
    /// Starting balance of every household.
    pub init_money: f64,
    /// Starting reservation wage.
    pub init_reservation_wage: f64,
}

impl Default for HouseholdParams {
    fn default() -> Self {
        Self {
            num_households: 1000,
            cost_decay: 0.9,
            num_vendors: 7,
            unemployed_ask_num: 5,
            repl_employer_prob: 0.1,
            repl_vend_price_prob: 0.25,
            repl_vend_inv_prob: 0.25,
            lower_vendor_price: 0.01,
            demand_sat: 0.95,
            rw_change_employed: 1.0,
            rw_change_unemployed: 0.9,
            rw_change_fired: 1.0,
            init_money: 98.78,
            init_reservation_wage: 50.0,
        }
    }
}

/// Which distribution representative parties are drawn from.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartyBasis {
    /// Bands over household balances.
    #[default]
    Wealth,
    /// Bands over last month's household income.
    Income,
}

/// Government policy parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GovParams {
    /// Which government runs, if any.
    pub variant: GovVariant,
    /// Scaling between the wealth Gini and the data-driven tax rate.
    pub tax_scale: f64,
    /// Months between votes for the democratic variants.
    pub tax_adj_freq: u32,
    /// Tax rate used before any equality metric exists.
    pub initial_tax_rate: f64,
    /// Number of representative parties (wealth or income bands).
    pub num_parties: usize,
    /// Gini multiplier demanded by the poorest party.
    pub party_init_factor: f64,
    /// Decrease of the multiplier from one party to the next richer one.
    pub party_factor_step: f64,
    /// Distribution the parties are drawn from.
    pub party_basis: PartyBasis,
}

impl Default for GovParams {
    fn default() -> Self {
        Self {
            variant: GovVariant::None,
            tax_scale: 1.0,
            tax_adj_freq: 12,
            initial_tax_rate: 0.0,
            num_parties: 5,
            party_init_factor: 2.5,
            party_factor_step: 0.5,
            party_basis: PartyBasis::Wealth,
        }
    }
}

fn unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfUnitRange { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(name));
    }
    Ok(())
}

fn count(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroCount(name));
    }
    Ok(())
}

impl FirmParams {
    /// Validate firm parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        count("num_firms", self.num_firms)?;
        unit("price_adj_prob", self.price_adj_prob)?;
        unit("price_adj_rate", self.price_adj_rate)?;
        unit("wage_adj_rate", self.wage_adj_rate)?;
        unit("buffer_rate", self.buffer_rate)?;
        positive("tech_lvl", self.tech_lvl)?;
        positive("init_price", self.init_price)?;
        positive("init_wage", self.init_wage)?;
        finite("inv_lo", self.inv_lo)?;
        finite("inv_up", self.inv_up)?;
        if self.inv_lo < 0.0 {
            return Err(ConfigError::NonPositive { name: "inv_lo", value: self.inv_lo });
        }
        if self.inv_up < 0.0 {
            return Err(ConfigError::NonPositive { name: "inv_up", value: self.inv_up });
        }
        positive("price_lo", self.price_lo)?;
        positive("price_up", self.price_up)?;
        finite("init_money", self.init_money)?;
        finite("init_inventory", self.init_inventory)?;
        if self.price_lo > self.price_up {
            return Err(ConfigError::InvertedBounds { lo: "price_lo", hi: "price_up" });
        }
        Ok(())
    }
}

impl HouseholdParams {
    /// Validate household parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        count("num_households", self.num_households)?;
        count("num_vendors", self.num_vendors)?;
        count("unemployed_ask_num", self.unemployed_ask_num)?;
        positive("cost_decay", self.cost_decay)?;
        if self.cost_decay > 1.0 {
            return Err(ConfigError::OutOfUnitRange { name: "cost_decay", value: self.cost_decay });
        }
        unit("repl_employer_prob", self.repl_employer_prob)?;
        unit("repl_vend_price_prob", self.repl_vend_price_prob)?;
        unit("repl_vend_inv_prob", self.repl_vend_inv_prob)?;
        unit("lower_vendor_price", self.lower_vendor_price)?;
        unit("demand_sat", self.demand_sat)?;
        positive("rw_change_employed", self.rw_change_employed)?;
        positive("rw_change_unemployed", self.rw_change_unemployed)?;
        positive("rw_change_fired", self.rw_change_fired)?;
        finite("init_money", self.init_money)?;
        finite("init_reservation_wage", self.init_reservation_wage)?;
        Ok(())
    }
}

impl GovParams {
    /// Validate government parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tax_adj_freq == 0 {
            return Err(ConfigError::ZeroCount("tax_adj_freq"));
        }
        count("num_parties", self.num_parties)?;
        unit("initial_tax_rate", self.initial_tax_rate)?;
        finite("tax_scale", self.tax_scale)?;
        if self.tax_scale < 0.0 {
            return Err(ConfigError::NonPositive { name: "tax_scale", value: self.tax_scale });
        }
        finite("party_init_factor", self.party_init_factor)?;
        finite("party_factor_step", self.party_factor_step)?;
        Ok(())
    }
}

impl SimConfig {
    /// Validate the whole configuration, including cross-section constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_months == 0 {
            return Err(ConfigError::ZeroCount("num_months"));
        }
        if self.days_in_month == 0 {
            return Err(ConfigError::ZeroCount("days_in_month"));
        }
        self.firms.validate()?;
        self.households.validate()?;
        self.government.validate()?;
        if self.households.num_vendors > self.firms.num_firms {
            return Err(ConfigError::TooManyVendors {
                vendors: self.households.num_vendors,
                firms: self.firms.num_firms,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_households_rejected() {
        let mut cfg = SimConfig::default();
        cfg.households.num_households = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCount("num_households")));
    }

    #[test]
    fn vendors_capped_by_firms() {
        let mut cfg = SimConfig::default();
        cfg.firms.num_firms = 3;
        assert!(matches!(cfg.validate(), Err(ConfigError::TooManyVendors { vendors: 7, firms: 3 })));
    }

    #[test]
    fn inverted_price_bounds_rejected() {
        let mut cfg = SimConfig::default();
        cfg.firms.price_lo = 2.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvertedBounds { .. })));
    }

    #[test]
    fn inventory_multiples_may_cross() {
        let mut cfg = SimConfig::default();
        cfg.firms.inv_lo = 1.5;
        cfg.firms.inv_up = 0.5;
        assert_eq!(cfg.validate(), Ok(()));
        cfg.firms.inv_lo = -0.1;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositive { name: "inv_lo", .. })));
    }

    #[test]
    fn nan_rejected() {
        let mut cfg = SimConfig::default();
        cfg.firms.tech_lvl = f64::NAN;
        assert_eq!(cfg.validate(), Err(ConfigError::NonFinite("tech_lvl")));
    }

    #[test]
    fn partial_yaml_like_json_uses_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{"num_months": 3, "government": {"variant": "rep"}}"#).unwrap();
        assert_eq!(cfg.num_months, 3);
        assert_eq!(cfg.government.variant, GovVariant::Representative);
        assert_eq!(cfg.firms.num_firms, 100);
    }

    proptest! {
        #[test]
        fn probabilities_outside_unit_rejected(p in 1.0001f64..10.0) {
            let mut cfg = SimConfig::default();
            cfg.households.repl_vend_price_prob = p;
            let rejected = matches!(cfg.validate(), Err(ConfigError::OutOfUnitRange { .. }));
            prop_assert!(rejected);
        }
    }
}
