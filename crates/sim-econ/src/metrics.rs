//! Inequality metrics over wealth and income distributions.

use sim_core::EqualitySnapshot;

fn sorted_non_negative(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if let Some(min) = v.iter().copied().reduce(f64::min) {
        if min < 0.0 {
            for x in v.iter_mut() {
                *x -= min;
            }
        }
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    v
}

/// Gini coefficient in [0, 1]. Negative values are shifted so the minimum is
/// zero; an empty or all-zero distribution yields 0.
pub fn gini(values: &[f64]) -> f64 {
    let v = sorted_non_negative(values);
    let total: f64 = v.iter().sum();
    if v.is_empty() || total <= 0.0 {
        return 0.0;
    }
    let n = v.len() as f64;
    let mut acc = 0.0;
    for (i, &x) in v.iter().enumerate() {
        acc += (2.0 * (i as f64 + 1.0) - n - 1.0) * x;
    }
    (acc / (n * total)).clamp(0.0, 1.0)
}

/// Hoover index: share of the total that would have to move to reach
/// perfect equality.
pub fn hoover(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return 0.0;
    }
    let mean = total / values.len() as f64;
    0.5 * values.iter().map(|x| (x - mean).abs()).sum::<f64>() / total
}

/// Share of the total held by each of `bands` equal-population bands, poorest
/// first. Negative holdings count as zero. Shares are equal when nothing is
/// held at all.
pub fn band_shares(values: &[f64], bands: usize) -> Vec<f64> {
    if bands == 0 {
        return Vec::new();
    }
    let mut v: Vec<f64> = values.iter().map(|x| x.max(0.0)).collect();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Lorenz integral: lorenz[i] is the sum of the i poorest holdings.
    let mut lorenz = Vec::with_capacity(v.len() + 1);
    lorenz.push(0.0);
    for x in &v {
        let last = lorenz[lorenz.len() - 1];
        lorenz.push(last + x);
    }
    let total = lorenz[v.len()];
    if total <= 0.0 || !total.is_finite() {
        return vec![1.0 / bands as f64; bands];
    }
    (0..bands)
        .map(|b| {
            let start = b * v.len() / bands;
            let end = (b + 1) * v.len() / bands;
            (lorenz[end] - lorenz[start]) / total
        })
        .collect()
}

/// Per-month equality series, appended once per month after the month has
/// settled.
#[derive(Clone, Debug, Default)]
pub struct EqualityHistory {
    gini_wealth: Vec<f64>,
    gini_income: Vec<f64>,
}

impl EqualityHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append this month's metrics and return them.
    pub fn record(&mut self, wealth: &[f64], income: &[f64]) -> EqualitySnapshot {
        let snap = EqualitySnapshot {
            gini_wealth: gini(wealth),
            gini_income: gini(income),
            hoover_wealth: hoover(wealth),
        };
        self.gini_wealth.push(snap.gini_wealth);
        self.gini_income.push(snap.gini_income);
        snap
    }

    /// Number of settled months recorded.
    pub fn len(&self) -> usize {
        self.gini_wealth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gini_wealth.is_empty()
    }

    /// Wealth Gini of the most recently settled month.
    pub fn latest_wealth_gini(&self) -> Option<f64> {
        self.gini_wealth.last().copied()
    }

    /// Mean income Gini over the last `window` months, if that many exist.
    pub fn trailing_mean_income_gini(&self, window: usize) -> Option<f64> {
        if window == 0 || self.gini_income.len() < window {
            return None;
        }
        let tail = &self.gini_income[self.gini_income.len() - window..];
        Some(tail.iter().sum::<f64>() / window as f64)
    }
}
