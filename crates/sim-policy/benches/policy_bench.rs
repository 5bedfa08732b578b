use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim_core::{GovParams, GovVariant, HouseholdId};
use sim_econ::{EqualityHistory, Household};
use sim_policy::{Government, VoteContext};

fn build_households(n: usize) -> Vec<Household> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            let mut hh = Household::new(HouseholdId(i), rng.gen_range(0.0..500.0), 50.0);
            hh.income = rng.gen_range(0.0..120.0);
            hh
        })
        .collect()
}

fn bench_votes(c: &mut Criterion) {
    let households = build_households(1000);
    let mut history = EqualityHistory::new();
    let wealth: Vec<f64> = households.iter().map(|h| h.money).collect();
    let income: Vec<f64> = households.iter().map(|h| h.income).collect();
    for _ in 0..12 {
        history.record(&wealth, &income);
    }
    for variant in [GovVariant::DirectDemocratic, GovVariant::Representative] {
        let params = GovParams { variant, ..GovParams::default() };
        c.bench_function(&format!("vote_tax {variant} x 1000 households"), |b| {
            b.iter(|| {
                let mut gov = Government::from_params(&params).expect("variant has a government");
                gov.vote_tax(&VoteContext {
                    month: 12,
                    households: &households,
                    history: &history,
                    params: &params,
                });
                black_box(gov.tax_rate())
            })
        });
    }
}

criterion_group!(benches, bench_votes);
criterion_main!(benches);
