#![deny(warnings)]

//! Headless runner for the redistribution economy.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sim_core::{GovVariant, SimConfig};
use sim_runtime::{Scheduler, StatsRecorder};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    months: Option<u32>,
    seed: Option<u64>,
    gov: Option<GovVariant>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = || it.next().with_context(|| format!("{arg} expects a value"));
        match arg.as_str() {
            "--config" => args.config = Some(value()?.into()),
            "--months" => args.months = Some(value()?.parse().context("--months")?),
            "--seed" => args.seed = Some(value()?.parse().context("--seed")?),
            "--gov" => {
                args.gov = Some(value()?.parse().map_err(anyhow::Error::msg)?);
            }
            "--out" => args.out = Some(value()?.into()),
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(months) = args.months {
        cfg.num_months = months;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(gov) = args.gov {
        cfg.government.variant = gov;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;
    let cfg = load_config(&args)?;
    info!(
        sha = env!("GIT_SHA"),
        seed = cfg.seed,
        months = cfg.num_months,
        gov = %cfg.government.variant,
        "starting eqsim"
    );

    let mut scheduler = Scheduler::new(cfg, StatsRecorder::new())?;
    scheduler.run();
    let total_money = scheduler.total_money();
    let recorder = scheduler.into_sink();

    if let Some(last) = recorder.last() {
        println!(
            "KPI | months: {} | employment: {:.1}% | price: {:.3} | wage: {:.2} | gini wealth: {:.3} | gini income: {:.3} | tax: {:.1}% | ubi: {:.2} | money: {:.2}",
            last.month + 1,
            last.employment_rate * 100.0,
            last.avg_price,
            last.avg_wage,
            last.gini_wealth,
            last.gini_income,
            last.tax_rate * 100.0,
            last.ubi,
            total_money
        );
    }

    if let Some(path) = &args.out {
        let json = serde_json::to_string_pretty(recorder.summaries())?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), months = recorder.summaries().len(), "summaries written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let args = Args {
            months: Some(6),
            seed: Some(9),
            gov: Some(GovVariant::Representative),
            ..Args::default()
        };
        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.num_months, 6);
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.government.variant, GovVariant::Representative);
        assert_eq!(cfg.firms.num_firms, 100);
    }

    #[test]
    fn zero_months_is_rejected() {
        let args = Args { months: Some(0), ..Args::default() };
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn yaml_config_is_partial() {
        let cfg: SimConfig = serde_yaml::from_str(
            "seed: 3\nfirms:\n  num_firms: 4\ngovernment:\n  variant: dir\n",
        )
        .unwrap();
        assert_eq!(cfg.seed, 3);
        assert_eq!(cfg.firms.num_firms, 4);
        assert_eq!(cfg.firms.tech_lvl, 3.0);
        assert_eq!(cfg.government.variant, GovVariant::DirectDemocratic);
        assert_eq!(cfg.households.num_households, 1000);
    }
}
