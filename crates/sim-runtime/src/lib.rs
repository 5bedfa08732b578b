#![deny(warnings)]

//! Month/day scheduler driving the economy.
//!
//! A month is `BeginningOfMonth`, `days_in_month` trading days and
//! `EndOfMonth`. All randomness flows from one seeded ChaCha8 stream so a run
//! is reproducible from its seed.

pub mod stats;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::{ConfigError, MonthSnapshot, SimConfig};
use sim_econ::{Economy, EqualityHistory};
use sim_policy::{Government, VoteContext};
use tracing::{debug, info, trace};

pub use stats::{MonthSummary, NullSink, StatsRecorder, StatsSink};

/// Position of the scheduler within the current month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    BeginningOfMonth,
    /// One-based trading day.
    Day(u32),
    EndOfMonth,
    Finished,
}

/// Owns the economy, the optional government and the random stream.
pub struct Scheduler<S: StatsSink = StatsRecorder> {
    economy: Economy,
    government: Option<Government>,
    history: EqualityHistory,
    rng: ChaCha8Rng,
    month: u32,
    phase: Phase,
    sink: S,
}

fn shuffled_order(n: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order
}

impl<S: StatsSink> Scheduler<S> {
    pub fn new(config: SimConfig, sink: S) -> Result<Self, ConfigError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let economy = Economy::new(config, &mut rng)?;
        let government = Government::from_params(&economy.config.government);
        Ok(Self {
            economy,
            government,
            history: EqualityHistory::new(),
            rng,
            month: 0,
            phase: Phase::BeginningOfMonth,
            sink,
        })
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn government(&self) -> Option<&Government> {
        self.government.as_ref()
    }

    pub fn history(&self) -> &EqualityHistory {
        &self.history
    }

    /// Zero-based index of the month in progress (or of the next one).
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Money held by firms, households and the government.
    pub fn total_money(&self) -> f64 {
        self.economy.total_money() + self.government.as_ref().map_or(0.0, Government::money)
    }

    /// Run the current phase and advance. Returns the phase that ran, or
    /// `None` once the run is finished.
    pub fn step(&mut self) -> Option<Phase> {
        let current = self.phase;
        match current {
            Phase::BeginningOfMonth => {
                self.begin_month();
                self.phase = Phase::Day(1);
            }
            Phase::Day(day) => {
                self.trade_day(day);
                self.phase = if day < self.economy.days_in_month() {
                    Phase::Day(day + 1)
                } else {
                    Phase::EndOfMonth
                };
            }
            Phase::EndOfMonth => {
                self.end_month();
                self.month += 1;
                self.phase = if self.month < self.economy.config.num_months {
                    Phase::BeginningOfMonth
                } else {
                    Phase::Finished
                };
            }
            Phase::Finished => return None,
        }
        Some(current)
    }

    /// Run until the current month's end has been settled. Returns false when
    /// nothing was left to run.
    pub fn run_month(&mut self) -> bool {
        loop {
            match self.step() {
                Some(Phase::EndOfMonth) => return true,
                Some(_) => {}
                None => return false,
            }
        }
    }

    /// Run every remaining month.
    pub fn run(&mut self) {
        while self.run_month() {}
        info!(months = self.month, total_money = self.total_money(), "simulation finished");
    }

    fn begin_month(&mut self) {
        let month = self.month;
        let Economy { firms, households, config } = &mut self.economy;
        let days = config.days_in_month;

        for firm in firms.iter_mut() {
            firm.update_wage(month, &config.firms, &mut self.rng);
            firm.update_hiring_status(month, &config.firms);
            firm.update_price(&config.firms, days, &mut self.rng);
            firm.reset_demand();
        }

        for i in shuffled_order(households.len(), &mut self.rng) {
            let hh = &mut households[i];
            hh.reset_income();
            hh.find_cheaper_vendor(firms, &config.households, &mut self.rng);
            hh.find_stocked_vendor(firms, &config.households, &mut self.rng);
            hh.search_job(firms, &config.households, &mut self.rng);
            hh.plan_demand(firms, &config.households, days);
        }
        debug!(month, "beginning of month settled");
    }

    fn trade_day(&mut self, day: u32) {
        let Economy { firms, households, config } = &mut self.economy;
        for i in shuffled_order(households.len(), &mut self.rng) {
            households[i].buy_items(firms, &config.households, &mut self.rng);
        }
        for firm in firms.iter_mut() {
            firm.produce_items(&config.firms);
        }
        trace!(month = self.month, day, "trading day");
    }

    fn end_month(&mut self) {
        let month = self.month;
        let Economy { firms, households, config } = &mut self.economy;

        let mut profits = 0.0;
        let mut layoffs = 0usize;
        for firm in firms.iter_mut() {
            firm.set_reserve(&config.firms);
            profits += firm.pay_profits(households);
            firm.pay_wages(households);
            if firm.make_layoff_decision(households, &config.households, &mut self.rng).is_some() {
                layoffs += 1;
            }
        }

        if let Some(gov) = self.government.as_mut() {
            gov.vote_tax(&VoteContext {
                month,
                households,
                history: &self.history,
                params: &config.government,
            });
            let collected = gov.collect_tax(households);
            gov.calc_ubi(households.len());
            gov.pay_ubi(households);
            debug!(month, collected, rate = gov.tax_rate(), "redistribution settled");
        }

        let wealth = self.economy.wealth();
        let incomes = self.economy.incomes();
        let equality = self.history.record(&wealth, &incomes);

        let snapshot = MonthSnapshot {
            month,
            firms: self.economy.firms.iter().map(|f| f.snapshot(month)).collect(),
            households: self.economy.households.iter().map(|h| h.snapshot()).collect(),
            government: self.government.as_ref().map(Government::snapshot),
            equality,
        };
        self.sink.record(&snapshot);

        info!(
            month,
            profits,
            layoffs,
            total_money = snapshot.total_money(),
            employment = snapshot.employment_rate(),
            gini_wealth = equality.gini_wealth,
            gini_income = equality.gini_income,
            "month closed"
        );
    }
}
