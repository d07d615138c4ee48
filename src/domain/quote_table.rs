//! Quote table built by sweeping every supported drawdown level.

use crate::domain::error::PlanPricerError;
use crate::domain::plan::PlanConfig;
use crate::domain::pricing::{compute_breakdown, PriceBreakdown};
use crate::domain::strategy::PricingStrategy;

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub drawdown: u32,
    pub breakdown: PriceBreakdown,
}

/// Price the same contract/days/feed selection at every drawdown level the
/// strategy accepts. Pure; any level failing validation is a bug in the
/// strategy's own bounds and surfaces as an error rather than a skipped row.
pub fn build_quote_table(
    strategy: &PricingStrategy,
    contracts: u32,
    min_days: u32,
    rhythmic_feed: bool,
    split_payment: bool,
) -> Result<Vec<QuoteRow>, PlanPricerError> {
    let levels = strategy.supported_levels();
    let mut rows = Vec::with_capacity(levels.len());

    for drawdown in levels {
        let plan = PlanConfig {
            drawdown,
            contracts,
            min_days,
            rhythmic_feed,
            split_payment,
        };
        let breakdown = compute_breakdown(&plan, strategy)?;
        rows.push(QuoteRow {
            drawdown,
            breakdown,
        });
    }

    Ok(rows)
}
