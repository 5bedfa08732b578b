//! Statistics collaborator interface and an in-memory recorder.

use serde::Serialize;
use sim_core::MonthSnapshot;

/// Receives a read-only snapshot after every month has settled.
pub trait StatsSink {
    fn record(&mut self, snapshot: &MonthSnapshot);
}

/// Discards every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatsSink for NullSink {
    fn record(&mut self, _snapshot: &MonthSnapshot) {}
}

/// Compact per-month reading derived from a snapshot.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct MonthSummary {
    pub month: u32,
    pub avg_firm_money: f64,
    pub avg_price: f64,
    pub avg_marginal_cost: f64,
    pub avg_inventory: f64,
    pub avg_demand: f64,
    pub avg_employees: f64,
    pub avg_wage: f64,
    pub avg_months_hiring: f64,
    pub avg_household_money: f64,
    pub avg_income: f64,
    pub avg_tax_paid: f64,
    pub avg_ubi_received: f64,
    pub avg_reservation_wage: f64,
    pub employment_rate: f64,
    pub gini_wealth: f64,
    pub gini_income: f64,
    pub hoover_wealth: f64,
    pub tax_rate: f64,
    pub ubi: f64,
}

fn mean<T>(items: &[T], f: impl Fn(&T) -> f64) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(f).sum::<f64>() / items.len() as f64
}

impl From<&MonthSnapshot> for MonthSummary {
    fn from(s: &MonthSnapshot) -> Self {
        let (tax_rate, ubi) = s
            .government
            .as_ref()
            .map(|g| (g.tax_rate, g.ubi))
            .unwrap_or((0.0, 0.0));
        Self {
            month: s.month,
            avg_firm_money: mean(&s.firms, |f| f.money),
            avg_price: mean(&s.firms, |f| f.price),
            avg_marginal_cost: mean(&s.firms, |f| f.marginal_cost),
            avg_inventory: mean(&s.firms, |f| f.inventory),
            avg_demand: mean(&s.firms, |f| f.demand),
            avg_employees: mean(&s.firms, |f| f.employee_count as f64),
            avg_wage: mean(&s.firms, |f| f.wage),
            avg_months_hiring: mean(&s.firms, |f| f64::from(f.months_hiring)),
            avg_household_money: mean(&s.households, |h| h.money),
            avg_income: mean(&s.households, |h| h.income),
            avg_tax_paid: mean(&s.households, |h| h.tax_paid),
            avg_ubi_received: mean(&s.households, |h| h.ubi_received),
            avg_reservation_wage: mean(&s.households, |h| h.reservation_wage),
            employment_rate: s.employment_rate(),
            gini_wealth: s.equality.gini_wealth,
            gini_income: s.equality.gini_income,
            hoover_wealth: s.equality.hoover_wealth,
            tax_rate,
            ubi,
        }
    }
}

/// Keeps a summary per month and, optionally, every full snapshot.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    keep_snapshots: bool,
    summaries: Vec<MonthSummary>,
    snapshots: Vec<MonthSnapshot>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also retain the full agent-level snapshots.
    pub fn with_snapshots() -> Self {
        Self { keep_snapshots: true, ..Self::default() }
    }

    pub fn summaries(&self) -> &[MonthSummary] {
        &self.summaries
    }

    pub fn snapshots(&self) -> &[MonthSnapshot] {
        &self.snapshots
    }

    pub fn last(&self) -> Option<&MonthSummary> {
        self.summaries.last()
    }
}

impl StatsSink for StatsRecorder {
    fn record(&mut self, snapshot: &MonthSnapshot) {
        self.summaries.push(MonthSummary::from(snapshot));
        if self.keep_snapshots {
            self.snapshots.push(snapshot.clone());
        }
    }
}
