use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::{GovParams, GovVariant, SimConfig};
use sim_runtime::{NullSink, Scheduler};

fn bench_months(c: &mut Criterion) {
    for variant in [GovVariant::None, GovVariant::Representative] {
        let cfg = SimConfig {
            num_months: u32::MAX,
            government: GovParams { variant, ..GovParams::default() },
            ..SimConfig::default()
        };
        let mut scheduler = Scheduler::new(cfg, NullSink).unwrap();
        c.bench_function(&format!("sim_month {variant}"), |b| {
            b.iter(|| scheduler.run_month())
        });
    }
}

criterion_group!(benches, bench_months);
criterion_main!(benches);
