//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::PlanPricerError;
use crate::domain::plan::PlanConfig;
use crate::domain::pricing::compute_breakdown;
use crate::domain::quote_table::build_quote_table;
use crate::domain::strategy::{
    BasePricePolicy, ContractTerms, DaysPolicy, DepositPolicy, PlanBounds, PricingStrategy,
};
use crate::domain::validation::validate_strategy_config;
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(name = "planpricer", about = "Funded-trading plan pricing calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price a single plan
    Quote {
        /// Strategy calibration file (overrides --preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Built-in calibration: builder, promo-table or interp
        #[arg(long, default_value = "builder")]
        preset: String,
        #[arg(short, long)]
        drawdown: u32,
        #[arg(long, default_value_t = 1)]
        contracts: u32,
        #[arg(long, default_value_t = 12)]
        min_days: u32,
        #[arg(long)]
        rhythmic_feed: bool,
        #[arg(long)]
        split_payment: bool,
    },
    /// Validate a strategy calibration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the drawdown levels a strategy accepts
    Levels {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "builder")]
        preset: String,
    },
    /// Export a quote table over every supported drawdown level as CSV
    Table {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "builder")]
        preset: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 1)]
        contracts: u32,
        #[arg(long, default_value_t = 12)]
        min_days: u32,
        #[arg(long)]
        rhythmic_feed: bool,
        #[arg(long)]
        split_payment: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Quote {
            config,
            preset,
            drawdown,
            contracts,
            min_days,
            rhythmic_feed,
            split_payment,
        } => run_quote(
            config.as_ref(),
            &preset,
            PlanConfig {
                drawdown,
                contracts,
                min_days,
                rhythmic_feed,
                split_payment,
            },
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Levels { config, preset } => run_levels(config.as_ref(), &preset),
        Command::Table {
            config,
            preset,
            output,
            contracts,
            min_days,
            rhythmic_feed,
            split_payment,
        } => run_table(
            config.as_ref(),
            &preset,
            output.as_ref(),
            contracts,
            min_days,
            rhythmic_feed,
            split_payment,
        ),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PlanPricerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Resolve the active strategy: a calibration file when given, otherwise a
/// built-in preset.
fn resolve_strategy(config_path: Option<&PathBuf>, preset: &str) -> Result<PricingStrategy, ExitCode> {
    if let Some(path) = config_path {
        eprintln!("Loading calibration from {}", path.display());
        let adapter = load_config(path)?;
        if let Err(e) = validate_strategy_config(&adapter) {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
        return build_strategy(&adapter).map_err(|e| {
            eprintln!("error: {e}");
            (&e).into()
        });
    }

    match PricingStrategy::preset(preset) {
        Some(s) => Ok(s),
        None => {
            eprintln!(
                "error: unknown preset '{}' (expected builder, promo-table or interp)",
                preset
            );
            Err(ExitCode::from(2))
        }
    }
}

/// Build a [`PricingStrategy`] from a validated calibration config.
pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<PricingStrategy, PlanPricerError> {
    let name = adapter
        .get_string("strategy", "name")
        .unwrap_or_else(|| "Unnamed".to_string());

    let policy_name =
        adapter
            .get_string("strategy", "base_policy")
            .ok_or_else(|| PlanPricerError::ConfigMissing {
                section: "strategy".into(),
                key: "base_policy".into(),
            })?;

    let base_price = match policy_name.as_str() {
        "piecewise" => BasePricePolicy::PiecewiseTiered {
            lower_break: adapter.get_int("piecewise", "lower_break", 2250) as u32,
            upper_break: adapter.get_int("piecewise", "upper_break", 3000) as u32,
            rate: adapter.get_double("piecewise", "rate", 0.10),
            intercept: adapter.get_double("piecewise", "intercept", 249.0),
            upgrade_fee: adapter.get_double("piecewise", "upgrade_fee", 75.0),
            upper_rate: adapter.get_double("piecewise", "upper_rate", 0.34),
            upper_intercept: adapter.get_double("piecewise", "upper_intercept", -471.0),
        },
        "table" => BasePricePolicy::DiscreteTable {
            entries: build_table_entries(adapter)?,
        },
        "interp" => BasePricePolicy::LinearInterp {
            floor_drawdown: adapter.get_int("interp", "floor_drawdown", 1000) as u32,
            ceil_drawdown: adapter.get_int("interp", "ceil_drawdown", 6000) as u32,
            floor_price: adapter.get_double("interp", "floor_price", 149.0),
            ceil_price: adapter.get_double("interp", "ceil_price", 649.0),
        },
        other => {
            return Err(PlanPricerError::ConfigInvalid {
                section: "strategy".into(),
                key: "base_policy".into(),
                reason: format!("unknown policy '{}'", other),
            })
        }
    };

    let drawdown_step = if policy_name == "table" {
        None
    } else {
        Some(adapter.get_int("bounds", "drawdown_step", 250) as u32)
    };

    let bounds = PlanBounds {
        drawdown_min: adapter.get_int("bounds", "drawdown_min", 1000) as u32,
        drawdown_max: adapter.get_int("bounds", "drawdown_max", 6000) as u32,
        drawdown_step,
        contracts_min: adapter.get_int("bounds", "contracts_min", 1) as u32,
        contracts_max: adapter.get_int("bounds", "contracts_max", 12) as u32,
        days_min: adapter.get_int("bounds", "days_min", 5) as u32,
        days_max: adapter.get_int("bounds", "days_max", 12) as u32,
    };

    let contracts = ContractTerms {
        reference: adapter.get_int("contracts", "reference", 1) as u32,
        per_contract: adapter.get_double("contracts", "per_contract", 10.0),
        clamp_at_zero: adapter.get_bool("contracts", "clamp_at_zero", false),
    };

    let days = build_days_policy(adapter)?;

    let deposit = build_deposit_policy(adapter)?;

    Ok(PricingStrategy {
        name,
        bounds,
        base_price,
        contracts,
        days,
        feed_surcharge: adapter.get_double("feed", "surcharge", 20.0),
        deposit,
    })
}

fn build_table_entries(adapter: &dyn ConfigPort) -> Result<Vec<(u32, f64)>, PlanPricerError> {
    let keys = adapter.section_keys("table");
    if keys.is_empty() {
        return Err(PlanPricerError::ConfigMissing {
            section: "table".into(),
            key: "<drawdown> = <price> entries".into(),
        });
    }

    let mut entries = Vec::with_capacity(keys.len());
    for key in keys {
        let level: u32 =
            key.trim()
                .parse()
                .map_err(|_| PlanPricerError::ConfigInvalid {
                    section: "table".into(),
                    key: key.clone(),
                    reason: "table keys must be integer drawdown levels".into(),
                })?;
        let price = adapter.get_double("table", &key, f64::NAN);
        if !price.is_finite() {
            return Err(PlanPricerError::ConfigInvalid {
                section: "table".into(),
                key,
                reason: "price must be a number".into(),
            });
        }
        entries.push((level, price));
    }
    entries.sort_unstable_by_key(|(level, _)| *level);
    Ok(entries)
}

fn build_days_policy(adapter: &dyn ConfigPort) -> Result<DaysPolicy, PlanPricerError> {
    let baseline = adapter.get_int("days", "baseline", 12) as u32;
    let policy = adapter
        .get_string("days", "policy")
        .unwrap_or_else(|| "alternating".to_string());

    match policy.as_str() {
        "alternating" => {
            let raw = adapter
                .get_string("days", "increments")
                .unwrap_or_else(|| "10, 20".to_string());
            let increments = raw
                .split(',')
                .map(|s| s.trim().parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|_| PlanPricerError::ConfigInvalid {
                    section: "days".into(),
                    key: "increments".into(),
                    reason: "must be a comma-separated list of numbers".into(),
                })?;
            Ok(DaysPolicy::Alternating {
                baseline,
                increments,
            })
        }
        "flat" => Ok(DaysPolicy::FlatRate {
            baseline,
            per_day: adapter.get_double("days", "per_day", 15.0),
        }),
        other => Err(PlanPricerError::ConfigInvalid {
            section: "days".into(),
            key: "policy".into(),
            reason: format!("unknown policy '{}'", other),
        }),
    }
}

fn build_deposit_policy(adapter: &dyn ConfigPort) -> Result<DepositPolicy, PlanPricerError> {
    let policy = adapter
        .get_string("payment", "policy")
        .unwrap_or_else(|| "drawdown".to_string());

    match policy.as_str() {
        "drawdown" => Ok(DepositPolicy::OnDrawdown {
            rate: adapter.get_double("payment", "rate", 0.064),
        }),
        "total" => Ok(DepositPolicy::FractionOfTotal {
            fraction: adapter.get_double("payment", "fraction", 0.64),
        }),
        other => Err(PlanPricerError::ConfigInvalid {
            section: "payment".into(),
            key: "policy".into(),
            reason: format!("unknown policy '{}'", other),
        }),
    }
}

fn run_quote(config_path: Option<&PathBuf>, preset: &str, plan: PlanConfig) -> ExitCode {
    let strategy = match resolve_strategy(config_path, preset) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("Pricing with strategy: {}", strategy.name);

    let breakdown = match compute_breakdown(&plan, &strategy) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("Strategy:        {}", strategy.name);
    println!("Drawdown:        {}", plan.drawdown);
    println!("Contracts:       {}", plan.contracts);
    println!("Min Days:        {}", plan.min_days);
    println!("Base Price:      {:.2}", breakdown.base_price);
    println!("Contract Add-on: {:.2}", breakdown.contract_addon);
    println!("Days Adjustment: {:.2}", breakdown.days_adjustment);
    println!("Feed Surcharge:  {:.2}", breakdown.feed_surcharge);
    println!("Total:           {:.2}", breakdown.total);
    if let Some(schedule) = &breakdown.payment {
        println!("Deposit:         {:.2}", schedule.deposit);
        println!("Balance:         {:.2}", schedule.balance);
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating calibration: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Strategy: {}", strategy.name);
    eprintln!(
        "Drawdown levels: {}",
        strategy
            .supported_levels()
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    eprintln!("\nCalibration is valid.");
    ExitCode::SUCCESS
}

fn run_levels(config_path: Option<&PathBuf>, preset: &str) -> ExitCode {
    let strategy = match resolve_strategy(config_path, preset) {
        Ok(s) => s,
        Err(code) => return code,
    };

    for level in strategy.supported_levels() {
        println!("{level}");
    }
    ExitCode::SUCCESS
}

fn run_table(
    config_path: Option<&PathBuf>,
    preset: &str,
    output_path: Option<&PathBuf>,
    contracts: u32,
    min_days: u32,
    rhythmic_feed: bool,
    split_payment: bool,
) -> ExitCode {
    let strategy = match resolve_strategy(config_path, preset) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let rows = match build_quote_table(&strategy, contracts, min_days, rhythmic_feed, split_payment)
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("quotes.csv"));

    let exporter = CsvExportAdapter::new(output.clone());
    if let Err(e) = exporter.export(&rows, split_payment) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!(
        "Quote table generated {}: {} levels written to {}",
        chrono::Local::now().format("%Y-%m-%d"),
        rows.len(),
        output.display()
    );
    ExitCode::SUCCESS
}
