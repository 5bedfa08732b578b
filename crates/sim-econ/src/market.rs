//! Decentralized matching helpers for the goods and labor markets.
//!
//! There is no order book: households sample a handful of counterparties and
//! settle with the first one that passes a local check.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use sim_core::{FirmId, HiringStatus};

use crate::firm::Firm;

/// Draw a firm uniformly. `None` when there are no firms.
pub fn sample_firm<R: Rng + ?Sized>(num_firms: usize, rng: &mut R) -> Option<FirmId> {
    if num_firms == 0 {
        return None;
    }
    Some(FirmId(rng.gen_range(0..num_firms)))
}

/// Draw an index with probability proportional to `weights`, falling back to
/// a uniform draw when every weight is zero. `None` for an empty slice.
pub fn weighted_pick<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    match WeightedIndex::new(weights) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(_) => Some(rng.gen_range(0..weights.len())),
    }
}

/// Firms the household does not buy from yet.
pub fn non_vendor_firms(firms: &[Firm], vendors: &[FirmId]) -> Vec<FirmId> {
    firms
        .iter()
        .map(|f| f.id)
        .filter(|id| !vendors.contains(id))
        .collect()
}

/// Every firm except the current employer.
pub fn non_employer_firms(firms: &[Firm], employer: FirmId) -> Vec<FirmId> {
    firms.iter().map(|f| f.id).filter(|&id| id != employer).collect()
}

/// A firm offers a job if it has an open position paying at least the
/// applicant's reservation wage.
pub fn offers_position(firm: &Firm, reservation_wage: f64) -> bool {
    firm.hiring == HiringStatus::Hire && firm.wage >= reservation_wage
}

/// Mean item price over a set of vendors; `None` when the set is empty or the
/// mean is not positive.
pub fn mean_price(firms: &[Firm], vendors: &[FirmId]) -> Option<f64> {
    if vendors.is_empty() {
        return None;
    }
    let sum: f64 = vendors.iter().map(|v| firms[v.0].price).sum();
    let mean = sum / vendors.len() as f64;
    (mean > 0.0 && mean.is_finite()).then_some(mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sim_core::FirmParams;

    fn firms(n: usize) -> Vec<Firm> {
        (0..n)
            .map(|i| Firm::new(FirmId(i), 1.0 + i as f64, 50.0, &FirmParams::default()))
            .collect()
    }

    #[test]
    fn weighted_pick_never_selects_zero_weight() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(weighted_pick(&[0.0, 3.0, 0.0], &mut rng), Some(1));
        }
    }

    #[test]
    fn weighted_pick_all_zero_is_uniform_fallback() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pick = weighted_pick(&[0.0, 0.0], &mut rng).unwrap();
        assert!(pick < 2);
        assert_eq!(weighted_pick(&[], &mut rng), None);
    }

    #[test]
    fn candidate_lists_exclude_current_links() {
        let f = firms(4);
        assert_eq!(
            non_vendor_firms(&f, &[FirmId(1), FirmId(3)]),
            vec![FirmId(0), FirmId(2)]
        );
        assert_eq!(non_employer_firms(&f, FirmId(0)), vec![FirmId(1), FirmId(2), FirmId(3)]);
    }

    #[test]
    fn mean_price_of_vendors() {
        let f = firms(3);
        assert_eq!(mean_price(&f, &[FirmId(0), FirmId(2)]), Some(2.0));
        assert_eq!(mean_price(&f, &[]), None);
    }

    #[test]
    fn position_requires_opening_and_wage() {
        let mut f = firms(1).remove(0);
        assert!(!offers_position(&f, 10.0));
        f.hiring = HiringStatus::Hire;
        assert!(offers_position(&f, 50.0));
        assert!(!offers_position(&f, 50.5));
    }

    #[test]
    fn sample_firm_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(sample_firm(0, &mut rng), None);
        for _ in 0..50 {
            assert!(sample_firm(5, &mut rng).unwrap().0 < 5);
        }
    }
}
