//! Pricing rule engine.
//!
//! `compute_breakdown` is a pure, total function over the declared input
//! domain: validate every field first, then compute the four additive
//! components and the optional payment schedule. Nothing is cached and
//! nothing is mutated; each call stands alone.

use crate::domain::error::PlanPricerError;
use crate::domain::plan::PlanConfig;
use crate::domain::strategy::{
    BasePricePolicy, ContractTerms, DaysPolicy, DepositPolicy, PricingStrategy,
};

/// Deposit-now / balance-later pair derived from a priced plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSchedule {
    pub deposit: f64,
    pub balance: f64,
}

/// The priced plan: four additive components, their sum, and the optional
/// split-payment schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub contract_addon: f64,
    pub days_adjustment: f64,
    pub feed_surcharge: f64,
    pub total: f64,
    pub payment: Option<PaymentSchedule>,
}

pub fn compute_breakdown(
    config: &PlanConfig,
    strategy: &PricingStrategy,
) -> Result<PriceBreakdown, PlanPricerError> {
    validate_plan(config, strategy)?;

    let base_price = base_price(config.drawdown, &strategy.base_price)?;
    let contract_addon = contract_addon(config.contracts, &strategy.contracts);
    let days_adjustment = days_adjustment(config.min_days, &strategy.days);
    let feed_surcharge = if config.rhythmic_feed {
        strategy.feed_surcharge
    } else {
        0.0
    };

    let total = base_price + contract_addon + days_adjustment + feed_surcharge;

    let payment = if config.split_payment {
        Some(payment_schedule(
            total,
            config.drawdown,
            &strategy.deposit,
        ))
    } else {
        None
    };

    Ok(PriceBreakdown {
        base_price,
        contract_addon,
        days_adjustment,
        feed_surcharge,
        total,
        payment,
    })
}

/// Check every field against the strategy's declared bounds before any
/// arithmetic runs. The UI enforces the same ranges, but the engine does not
/// trust its callers.
fn validate_plan(config: &PlanConfig, strategy: &PricingStrategy) -> Result<(), PlanPricerError> {
    let b = &strategy.bounds;

    if config.drawdown < b.drawdown_min || config.drawdown > b.drawdown_max {
        return Err(PlanPricerError::DomainRange {
            field: "drawdown",
            value: config.drawdown as i64,
            reason: format!("must be between {} and {}", b.drawdown_min, b.drawdown_max),
        });
    }
    if let Some(step) = b.drawdown_step {
        if step > 0 && (config.drawdown - b.drawdown_min) % step != 0 {
            return Err(PlanPricerError::DomainRange {
                field: "drawdown",
                value: config.drawdown as i64,
                reason: format!("must be a multiple of {} from {}", step, b.drawdown_min),
            });
        }
    }
    if config.contracts < b.contracts_min || config.contracts > b.contracts_max {
        return Err(PlanPricerError::DomainRange {
            field: "contracts",
            value: config.contracts as i64,
            reason: format!("must be between {} and {}", b.contracts_min, b.contracts_max),
        });
    }
    if config.min_days < b.days_min || config.min_days > b.days_max {
        return Err(PlanPricerError::DomainRange {
            field: "min_days",
            value: config.min_days as i64,
            reason: format!("must be between {} and {}", b.days_min, b.days_max),
        });
    }

    Ok(())
}

fn base_price(drawdown: u32, policy: &BasePricePolicy) -> Result<f64, PlanPricerError> {
    match policy {
        BasePricePolicy::PiecewiseTiered {
            lower_break,
            upper_break,
            rate,
            intercept,
            upgrade_fee,
            upper_rate,
            upper_intercept,
        } => {
            let d = drawdown as f64;
            if drawdown < *lower_break {
                Ok(rate * d + intercept)
            } else if drawdown < *upper_break {
                // Same line as the lower tier plus a flat upgrade fee, not a
                // new slope.
                Ok(rate * d + intercept + upgrade_fee)
            } else {
                Ok(upper_rate * d + upper_intercept)
            }
        }
        BasePricePolicy::DiscreteTable { entries } => entries
            .iter()
            .find(|(level, _)| *level == drawdown)
            .map(|(_, price)| *price)
            .ok_or_else(|| PlanPricerError::UnsupportedLevel {
                drawdown,
                levels: entries.iter().map(|(level, _)| *level).collect(),
            }),
        BasePricePolicy::LinearInterp {
            floor_drawdown,
            ceil_drawdown,
            floor_price,
            ceil_price,
        } => {
            let span_rate =
                (ceil_price - floor_price) / (*ceil_drawdown as f64 - *floor_drawdown as f64);
            Ok(floor_price + (drawdown as f64 - *floor_drawdown as f64) * span_rate)
        }
    }
}

fn contract_addon(contracts: u32, terms: &ContractTerms) -> f64 {
    let addon = (contracts as f64 - terms.reference as f64) * terms.per_contract;
    if terms.clamp_at_zero && addon < 0.0 {
        0.0
    } else {
        addon
    }
}

fn days_adjustment(min_days: u32, policy: &DaysPolicy) -> f64 {
    match policy {
        DaysPolicy::Alternating {
            baseline,
            increments,
        } => {
            let removed = baseline.saturating_sub(min_days) as usize;
            if increments.is_empty() {
                return 0.0;
            }
            increments.iter().cycle().take(removed).sum()
        }
        DaysPolicy::FlatRate { baseline, per_day } => {
            baseline.saturating_sub(min_days) as f64 * per_day
        }
    }
}

fn payment_schedule(total: f64, drawdown: u32, policy: &DepositPolicy) -> PaymentSchedule {
    match policy {
        // Deposit comes off the drawdown, balance off the total. The two are
        // independent quantities in the source calibration and are not
        // reconciled to sum back to the total.
        DepositPolicy::OnDrawdown { rate } => {
            let deposit = (rate * drawdown as f64).round();
            PaymentSchedule {
                deposit,
                balance: total - deposit,
            }
        }
        DepositPolicy::FractionOfTotal { fraction } => {
            let deposit = total * fraction;
            PaymentSchedule {
                deposit,
                balance: total - deposit,
            }
        }
    }
}
