//! The simulation registry: every firm and household plus the parameters
//! they act under.

use rand::seq::index;
use rand::Rng;
use sim_core::{ConfigError, FirmId, HouseholdId, SimConfig};
use tracing::info;

use crate::firm::Firm;
use crate::household::Household;

/// Authoritative collection of agents. Agents refer to each other by id into
/// these vectors; ids equal vector positions and never change.
#[derive(Clone, Debug)]
pub struct Economy {
    pub firms: Vec<Firm>,
    pub households: Vec<Household>,
    pub config: SimConfig,
}

/// Small jitter so initial prices and wages are not all identical.
fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.gen::<f64>() - 0.5) / 50.0
}

impl Economy {
    /// Validate the configuration and populate the economy. Every household
    /// starts out employed (round-robin over firms) with `num_vendors`
    /// distinct random vendors.
    pub fn new<R: Rng + ?Sized>(config: SimConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let fp = &config.firms;
        let hp = &config.households;

        let mut firms: Vec<Firm> = (0..fp.num_firms)
            .map(|i| {
                let price = fp.init_price + jitter(rng);
                let wage = fp.init_wage + jitter(rng);
                Firm::new(FirmId(i), price, wage, fp)
            })
            .collect();

        let mut households = Vec::with_capacity(hp.num_households);
        for i in 0..hp.num_households {
            let mut hh = Household::new(HouseholdId(i), hp.init_money, hp.init_reservation_wage);
            let employer = FirmId(i % fp.num_firms);
            firms[employer.0].hire(hh.id);
            hh.employer = Some(employer);
            hh.vendors = index::sample(rng, fp.num_firms, hp.num_vendors)
                .into_iter()
                .map(FirmId)
                .collect();
            households.push(hh);
        }

        info!(
            firms = firms.len(),
            households = households.len(),
            gov = %config.government.variant,
            "economy initialized"
        );
        Ok(Self { firms, households, config })
    }

    pub fn days_in_month(&self) -> u32 {
        self.config.days_in_month
    }

    pub fn total_firm_money(&self) -> f64 {
        self.firms.iter().map(|f| f.money).sum()
    }

    pub fn total_household_money(&self) -> f64 {
        self.households.iter().map(|h| h.money).sum()
    }

    /// Money held by firms and households. Add the government balance for
    /// the economy-wide total.
    pub fn total_money(&self) -> f64 {
        self.total_firm_money() + self.total_household_money()
    }

    pub fn wealth(&self) -> Vec<f64> {
        self.households.iter().map(|h| h.money).collect()
    }

    pub fn incomes(&self) -> Vec<f64> {
        self.households.iter().map(|h| h.income).collect()
    }

    pub fn employment_rate(&self) -> f64 {
        if self.households.is_empty() {
            return 0.0;
        }
        let employed = self.households.iter().filter(|h| h.is_employed()).count();
        employed as f64 / self.households.len() as f64
    }

    /// Check that every employer link is mirrored by the firm's employee list
    /// and the other way round.
    pub fn employment_is_symmetric(&self) -> bool {
        let forward = self.households.iter().all(|h| match h.employer {
            Some(f) => self.firms.get(f.0).is_some_and(|firm| firm.employs(h.id)),
            None => self.firms.iter().all(|firm| !firm.employs(h.id)),
        });
        let backward = self.firms.iter().all(|f| {
            f.employees()
                .iter()
                .all(|h| self.households.get(h.0).is_some_and(|hh| hh.employer == Some(f.id)))
        });
        forward && backward
    }
}
