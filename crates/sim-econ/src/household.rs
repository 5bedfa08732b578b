//! Consumer and worker decision logic.

use rand::seq::SliceRandom;
use rand::Rng;
use sim_core::{FirmId, HouseholdId, HouseholdParams, HouseholdSnapshot};
use tracing::{debug, trace};

use crate::firm::Firm;
use crate::market;

/// A household that works for at most one firm and buys from a few vendors.
#[derive(Clone, Debug)]
pub struct Household {
    /// Position in the economy's household vector.
    pub id: HouseholdId,
    /// Cash balance. Kept as `f64` like every balance in the economy; money
    /// is conserved up to float rounding.
    pub money: f64,
    /// Firm the household works for, if any.
    pub employer: Option<FirmId>,
    /// Firms the household buys from, unique.
    pub vendors: Vec<FirmId>,
    /// Vendors that could not serve a request, with the unserved quantity.
    pub blocked: Vec<(FirmId, f64)>,
    /// Lowest wage the household accepts.
    pub reservation_wage: f64,
    /// Items the household tries to buy per trading day this month.
    pub daily_demand: f64,
    /// Wages and profit shares received this month.
    pub income: f64,
    /// Income tax paid this month.
    pub tax_paid: f64,
    /// UBI received this month; not taxable.
    pub ubi_received: f64,
}

impl Household {
    /// Unemployed household without vendors.
    pub fn new(id: HouseholdId, money: f64, reservation_wage: f64) -> Self {
        Self {
            id,
            money,
            employer: None,
            vendors: Vec::new(),
            blocked: Vec::new(),
            reservation_wage,
            daily_demand: 0.0,
            income: 0.0,
            tax_paid: 0.0,
            ubi_received: 0.0,
        }
    }

    /// Whether the household has an employer.
    pub fn is_employed(&self) -> bool {
        self.employer.is_some()
    }

    /// Start a new month's ledger.
    pub fn reset_income(&mut self) {
        self.income = 0.0;
        self.tax_paid = 0.0;
        self.ubi_received = 0.0;
    }

    /// Book a wage as income. A wage above the reservation wage becomes the
    /// new reservation wage.
    pub fn receive_wage(&mut self, wage: f64) {
        self.money += wage;
        self.income += wage;
        if wage > self.reservation_wage {
            self.reservation_wage = wage;
        }
    }

    /// Book a profit share as income.
    pub fn receive_profit(&mut self, profit: f64) {
        self.money += profit;
        self.income += profit;
    }

    /// Book a UBI payment; it does not count as income.
    pub fn receive_ubi(&mut self, ubi: f64) {
        self.money += ubi;
        self.ubi_received += ubi;
    }

    /// Charge income tax without pushing the balance below zero. Returns the
    /// amount collected.
    pub fn pay_tax(&mut self, rate: f64) -> f64 {
        let tax = (self.income * rate).min(self.money.max(0.0)).max(0.0);
        self.money -= tax;
        self.tax_paid += tax;
        tax
    }

    /// The employer let this household go.
    pub fn fired(&mut self, params: &HouseholdParams) {
        self.employer = None;
        self.reservation_wage *= params.rw_change_fired;
    }

    /// Swap a random vendor for a cheaper firm, sampled by firm size.
    pub fn find_cheaper_vendor<R: Rng + ?Sized>(
        &mut self,
        firms: &[Firm],
        params: &HouseholdParams,
        rng: &mut R,
    ) -> bool {
        if rng.gen::<f64>() >= params.repl_vend_price_prob || self.vendors.is_empty() {
            return false;
        }
        let slot = rng.gen_range(0..self.vendors.len());
        let candidates = market::non_vendor_firms(firms, &self.vendors);
        let weights: Vec<f64> = candidates
            .iter()
            .map(|f| firms[f.0].employees().len() as f64)
            .collect();
        let Some(pick) = market::weighted_pick(&weights, rng) else {
            return false;
        };
        let old = self.vendors[slot];
        let new = candidates[pick];
        if firms[new.0].price <= firms[old.0].price * (1.0 - params.lower_vendor_price) {
            self.vendors[slot] = new;
            debug!(household = %self.id, %old, %new, "switched to cheaper vendor");
            return true;
        }
        false
    }

    /// Replace a vendor that could not serve last period's demand. Vendors
    /// that fell shorter are more likely to be dropped. The blocked set is
    /// cleared either way.
    pub fn find_stocked_vendor<R: Rng + ?Sized>(
        &mut self,
        firms: &[Firm],
        params: &HouseholdParams,
        rng: &mut R,
    ) -> bool {
        let blocked = std::mem::take(&mut self.blocked);
        if blocked.is_empty() || rng.gen::<f64>() >= params.repl_vend_inv_prob {
            return false;
        }
        let current: Vec<(FirmId, f64)> = blocked
            .into_iter()
            .filter(|(f, _)| self.vendors.contains(f))
            .collect();
        let weights: Vec<f64> = current.iter().map(|(_, shortfall)| *shortfall).collect();
        let Some(pick) = market::weighted_pick(&weights, rng) else {
            return false;
        };
        let old = current[pick].0;
        let candidates = market::non_vendor_firms(firms, &self.vendors);
        let Some(&new) = candidates.choose(rng) else {
            return false;
        };
        if let Some(slot) = self.vendors.iter().position(|&f| f == old) {
            self.vendors[slot] = new;
            debug!(household = %self.id, %old, %new, "replaced out-of-stock vendor");
            return true;
        }
        false
    }

    /// Look for work (unemployed) or for better work (employed).
    pub fn search_job<R: Rng + ?Sized>(
        &mut self,
        firms: &mut [Firm],
        params: &HouseholdParams,
        rng: &mut R,
    ) {
        match self.employer {
            None => self.search_employer(firms, params, rng),
            Some(employer) => self.search_better_employer(employer, firms, params, rng),
        }
    }

    fn search_employer<R: Rng + ?Sized>(
        &mut self,
        firms: &mut [Firm],
        params: &HouseholdParams,
        rng: &mut R,
    ) {
        for _ in 0..params.unemployed_ask_num {
            let Some(id) = market::sample_firm(firms.len(), rng) else {
                break;
            };
            let firm = &mut firms[id.0];
            if market::offers_position(firm, self.reservation_wage) {
                firm.hire(self.id);
                self.employer = Some(id);
                debug!(household = %self.id, firm = %id, wage = firm.wage, "hired");
                return;
            }
        }
        self.reservation_wage *= params.rw_change_unemployed;
    }

    fn search_better_employer<R: Rng + ?Sized>(
        &mut self,
        employer: FirmId,
        firms: &mut [Firm],
        params: &HouseholdParams,
        rng: &mut R,
    ) {
        self.reservation_wage *= params.rw_change_employed;

        let current = &firms[employer.0];
        let only_employee = current.employees().len() <= 1;
        let underpaid = current.wage < self.reservation_wage;
        let chance = rng.gen::<f64>() < params.repl_employer_prob;
        if !((underpaid && !only_employee) || chance) {
            return;
        }

        let candidates = market::non_employer_firms(firms, employer);
        let Some(&new) = candidates.choose(rng) else {
            return;
        };
        let current_wage = firms[employer.0].wage;
        let offer = &firms[new.0];
        if market::offers_position(offer, self.reservation_wage) && offer.wage > current_wage {
            firms[employer.0].grant_leave(self.id);
            firms[new.0].hire(self.id);
            self.employer = Some(new);
            debug!(household = %self.id, old = %employer, %new, "changed employer");
        }
    }

    /// Set the daily consumption target for the month from wealth and the
    /// mean price of the household's vendors.
    pub fn plan_demand(&mut self, firms: &[Firm], params: &HouseholdParams, days_in_month: u32) {
        let Some(mean_price) = market::mean_price(firms, &self.vendors) else {
            self.daily_demand = 0.0;
            return;
        };
        let no_decay_demand = self.money.max(0.0) / mean_price;
        let monthly_demand = no_decay_demand.powf(params.cost_decay).min(no_decay_demand);
        self.daily_demand = monthly_demand / f64::from(days_in_month);
    }

    /// Shop once at each vendor in random order until demand is met or money
    /// runs out.
    pub fn buy_items<R: Rng + ?Sized>(
        &mut self,
        firms: &mut [Firm],
        params: &HouseholdParams,
        rng: &mut R,
    ) {
        if self.daily_demand <= 0.0 {
            return;
        }
        let satisfied_at = (1.0 - params.demand_sat) * self.daily_demand;
        let mut remaining = self.daily_demand;
        let mut order = self.vendors.clone();
        order.shuffle(rng);

        for id in order {
            if self.money <= 0.0 || remaining <= satisfied_at {
                break;
            }
            let vendor = &mut firms[id.0];
            if vendor.price <= 0.0 {
                continue;
            }
            let ask = remaining.min(self.money / vendor.price);
            let price = vendor.price;
            let sold = vendor.sell_items(ask);
            self.money -= sold * price;
            remaining -= sold;
            if sold < ask {
                self.record_shortfall(id, ask - sold);
            }
        }
        trace!(household = %self.id, unmet = remaining.max(0.0), "shopping done");
    }

    fn record_shortfall(&mut self, vendor: FirmId, shortfall: f64) {
        match self.blocked.iter_mut().find(|(f, _)| *f == vendor) {
            Some(entry) => entry.1 += shortfall,
            None => self.blocked.push((vendor, shortfall)),
        }
    }

    /// End-of-month reading for statistics.
    pub fn snapshot(&self) -> HouseholdSnapshot {
        HouseholdSnapshot {
            money: self.money,
            income: self.income,
            tax_paid: self.tax_paid,
            ubi_received: self.ubi_received,
            employed: self.is_employed(),
            reservation_wage: self.reservation_wage,
        }
    }
}
