//! Producer and employer decision logic.

use rand::seq::SliceRandom;
use rand::Rng;
use sim_core::{FirmId, FirmParams, FirmSnapshot, HiringStatus, HouseholdId, HouseholdParams};
use tracing::debug;

use crate::household::Household;

/// A firm selling a single homogeneous good.
#[derive(Clone, Debug)]
pub struct Firm {
    /// Position in the economy's firm vector.
    pub id: FirmId,
    /// Cash balance. Kept as `f64`: wages, profit shares and purchases are
    /// float fractions, so totals are conserved up to rounding only.
    pub money: f64,
    /// Money withheld from the next profit distribution.
    pub reserve: f64,
    /// Unsold items in stock.
    pub inventory: f64,
    /// Posted price per item.
    pub price: f64,
    /// Cost of producing one more item, derived from the wage.
    pub marginal_cost: f64,
    /// (lo, hi) item price band.
    pub price_bounds: (f64, f64),
    /// (lo, hi) inventory band. `lo` may exceed `hi`.
    pub inventory_bounds: (f64, f64),
    /// Posted monthly wage per employee.
    pub wage: f64,
    /// Recruiting state decided at the start of the month.
    pub hiring: HiringStatus,
    /// Month in which the firm last opened a position.
    pub month_hiring: u32,
    /// Units requested this month, fulfilled or not.
    pub demand: f64,
    employees: Vec<HouseholdId>,
}

impl Firm {
    /// Create a firm with its initial endowment. `demand` seeds the first
    /// month's inventory bounds so firms do not start out shedding staff.
    pub fn new(id: FirmId, price: f64, wage: f64, params: &FirmParams) -> Self {
        Self {
            id,
            money: params.init_money,
            reserve: 0.0,
            inventory: params.init_inventory,
            price,
            marginal_cost: 0.0,
            price_bounds: (0.0, 0.0),
            inventory_bounds: (0.0, 0.0),
            wage,
            hiring: HiringStatus::Idle,
            month_hiring: 0,
            demand: params.init_inventory,
            employees: Vec::new(),
        }
    }

    /// Current staff, in hiring order.
    pub fn employees(&self) -> &[HouseholdId] {
        &self.employees
    }

    /// Whether `household` is on the payroll.
    pub fn employs(&self, household: HouseholdId) -> bool {
        self.employees.contains(&household)
    }

    /// Raise the wage while an opening stays unfilled; cut it after a long
    /// stretch without one.
    pub fn update_wage<R: Rng + ?Sized>(&mut self, month: u32, params: &FirmParams, rng: &mut R) {
        if self.hiring == HiringStatus::Hire && self.month_hiring < month {
            self.wage *= 1.0 + rng.gen::<f64>() * params.wage_adj_rate;
        }
        if self.hiring != HiringStatus::Hire
            && month.saturating_sub(self.month_hiring) > params.lo_wage_months
        {
            self.wage *= 1.0 - rng.gen::<f64>() * params.wage_adj_rate;
        }
    }

    /// `lo = inv_up × demand`, `hi = inv_lo × demand`.
    pub fn update_inventory_bounds(&mut self, params: &FirmParams) {
        self.inventory_bounds = (params.inv_up * self.demand, params.inv_lo * self.demand);
    }

    /// Marginal cost from the daily wage, and the price band around it.
    pub fn update_price_bounds(&mut self, params: &FirmParams, days_in_month: u32) {
        self.marginal_cost = (self.wage / f64::from(days_in_month)) / params.tech_lvl;
        self.price_bounds = (
            params.price_lo * self.marginal_cost,
            params.price_up * self.marginal_cost,
        );
    }

    /// Open a position when stock runs low, mark for layoff when it piles up.
    pub fn update_hiring_status(&mut self, month: u32, params: &FirmParams) {
        self.update_inventory_bounds(params);
        let (lo, hi) = self.inventory_bounds;
        if self.inventory < lo {
            self.hiring = HiringStatus::Hire;
            self.month_hiring = month;
        } else if self.inventory > hi {
            self.hiring = HiringStatus::Fire;
        } else {
            self.hiring = HiringStatus::Idle;
        }
    }

    /// Raise the price when stock is short and the price is still below the
    /// upper bound; lower it when stock is plentiful and the price is above it.
    pub fn update_price<R: Rng + ?Sized>(
        &mut self,
        params: &FirmParams,
        days_in_month: u32,
        rng: &mut R,
    ) {
        self.update_inventory_bounds(params);
        self.update_price_bounds(params, days_in_month);

        let chance = rng.gen::<f64>() < params.price_adj_prob;
        let few_items = self.inventory < self.inventory_bounds.0;
        let many_items = self.inventory > self.inventory_bounds.1;
        let hi_price = self.price_bounds.1;

        if few_items && self.price < hi_price && chance {
            self.price *= 1.0 + params.price_adj_rate * rng.gen::<f64>();
        } else if many_items && self.price > hi_price && chance {
            self.price *= 1.0 - params.price_adj_rate * rng.gen::<f64>();
        }
    }

    /// Start counting a new month's requests.
    pub fn reset_demand(&mut self) {
        self.demand = 0.0;
    }

    /// Daily output: `tech_lvl` items per employee.
    pub fn produce_items(&mut self, params: &FirmParams) {
        self.inventory += params.tech_lvl * self.employees.len() as f64;
    }

    /// Sell up to `ask` units and return how many were sold. The full request
    /// counts towards demand.
    pub fn sell_items(&mut self, ask: f64) -> f64 {
        let sold = ask.min(self.inventory).max(0.0);
        self.inventory -= sold;
        self.money += sold * self.price;
        self.demand += ask;
        sold
    }

    /// Posted wage times head count.
    pub fn wage_bill(&self) -> f64 {
        self.wage * self.employees.len() as f64
    }

    /// Pay every employee. A short treasury lowers the payout for this month
    /// only; the posted wage is kept.
    pub fn pay_wages(&mut self, households: &mut [Household]) {
        if self.employees.is_empty() {
            return;
        }
        let n = self.employees.len() as f64;
        let payout = if self.money < self.wage_bill() {
            (self.money / n).max(0.0)
        } else {
            self.wage
        };
        for &h in &self.employees {
            households[h.0].receive_wage(payout);
        }
        self.money -= payout * n;
    }

    /// Keep back `buffer_rate` of the wage bill, at most the money on hand.
    pub fn set_reserve(&mut self, params: &FirmParams) {
        let buffer = params.buffer_rate * self.wage_bill();
        self.reserve = buffer.min(self.money).max(0.0);
    }

    /// Distribute money above wages and reserve to all households in
    /// proportion to their wealth. Returns the amount paid out.
    pub fn pay_profits(&mut self, households: &mut [Household]) -> f64 {
        let profit = (self.money - self.wage_bill() - self.reserve).max(0.0);
        if profit <= 0.0 || households.is_empty() {
            return 0.0;
        }
        let wealth: f64 = households.iter().map(|h| h.money.max(0.0)).sum();
        if wealth > 0.0 {
            for hh in households.iter_mut() {
                let share = hh.money.max(0.0) / wealth;
                hh.receive_profit(profit * share);
            }
        } else {
            let even = profit / households.len() as f64;
            for hh in households.iter_mut() {
                hh.receive_profit(even);
            }
        }
        self.money -= profit;
        profit
    }

    /// Add an employee and close the open position.
    pub fn hire(&mut self, household: HouseholdId) {
        if !self.employs(household) {
            self.employees.push(household);
        }
        self.hiring = HiringStatus::Idle;
    }

    /// Remove a quitting employee. Returns false when the household was not
    /// employed here.
    pub fn grant_leave(&mut self, household: HouseholdId) -> bool {
        match self.employees.iter().position(|&h| h == household) {
            Some(idx) => {
                self.employees.remove(idx);
                true
            }
            None => {
                debug!(firm = %self.id, %household, "grant_leave for non-employee ignored");
                false
            }
        }
    }

    /// Lay off a uniformly chosen employee and notify the household.
    pub fn fire_random_employee<R: Rng + ?Sized>(
        &mut self,
        households: &mut [Household],
        params: &HouseholdParams,
        rng: &mut R,
    ) -> Option<HouseholdId> {
        let &household = self.employees.choose(rng)?;
        self.grant_leave(household);
        households[household.0].fired(params);
        debug!(firm = %self.id, %household, "employee laid off");
        Some(household)
    }

    /// Act on a `Fire` status. An open `Hire` position stays open into the
    /// next month.
    pub fn make_layoff_decision<R: Rng + ?Sized>(
        &mut self,
        households: &mut [Household],
        params: &HouseholdParams,
        rng: &mut R,
    ) -> Option<HouseholdId> {
        if self.hiring != HiringStatus::Fire {
            return None;
        }
        self.hiring = HiringStatus::Idle;
        self.fire_random_employee(households, params, rng)
    }

    /// End-of-month reading for statistics.
    pub fn snapshot(&self, month: u32) -> FirmSnapshot {
        FirmSnapshot {
            money: self.money,
            inventory: self.inventory,
            price: self.price,
            marginal_cost: self.marginal_cost,
            demand: self.demand,
            employee_count: self.employees.len(),
            wage: self.wage,
            months_hiring: month.saturating_sub(self.month_hiring),
        }
    }
}
