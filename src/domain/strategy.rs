//! Pricing strategy configuration and built-in presets.
//!
//! A strategy is assembled once (from a preset or an INI calibration file) and
//! never mutated afterwards. It bundles the input bounds, the base-price
//! policy, contract terms, the trading-days surcharge policy, the data-feed
//! surcharge and the split-payment deposit policy. Exactly one policy of each
//! kind is active; the engine never falls back between policies.

/// Inclusive input bounds declared by a strategy.
///
/// `drawdown_step` constrains formula-driven strategies to a slider
/// granularity; the discrete-table policy leaves it `None` and constrains
/// drawdown to its exact keys instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanBounds {
    pub drawdown_min: u32,
    pub drawdown_max: u32,
    pub drawdown_step: Option<u32>,
    pub contracts_min: u32,
    pub contracts_max: u32,
    pub days_min: u32,
    pub days_max: u32,
}

/// How `drawdown` maps to a base price.
#[derive(Debug, Clone, PartialEq)]
pub enum BasePricePolicy {
    /// Continuous linear rule with a flat upgrade fee in the middle tier and
    /// a steeper line above the upper breakpoint. The jumps at the
    /// breakpoints are intentional; there is no smoothing between tiers.
    PiecewiseTiered {
        lower_break: u32,
        upper_break: u32,
        rate: f64,
        intercept: f64,
        upgrade_fee: f64,
        upper_rate: f64,
        upper_intercept: f64,
    },
    /// Exact-match lookup keyed by drawdown level, sorted ascending by level.
    ///
    /// Entries need not be monotonic in price (promotional tiers) and are
    /// authoritative: the engine serves them verbatim and never interpolates
    /// between levels or substitutes a nearby one.
    DiscreteTable { entries: Vec<(u32, f64)> },
    /// Straight line between two calibration anchors.
    LinearInterp {
        floor_drawdown: u32,
        ceil_drawdown: u32,
        floor_price: f64,
        ceil_price: f64,
    },
}

/// Per-contract add-on terms.
///
/// The add-on is signed: fewer contracts than the reference yields a discount
/// unless `clamp_at_zero` is set. Clamping is always declared here, never
/// implied by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractTerms {
    pub reference: u32,
    pub per_contract: f64,
    pub clamp_at_zero: bool,
}

/// Surcharge for requiring fewer trading days than the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DaysPolicy {
    /// Each day removed below the baseline adds the next value from a
    /// repeating increment cycle (removing 3 days under a [10, 20] cycle
    /// accumulates 10+20+10).
    Alternating { baseline: u32, increments: Vec<f64> },
    /// Flat per-day rate below the baseline, floored at zero.
    FlatRate { baseline: u32, per_day: f64 },
}

/// How the deposit is derived when split payment is selected.
#[derive(Debug, Clone, PartialEq)]
pub enum DepositPolicy {
    /// `deposit = round(rate * drawdown)`, rounded half-away-from-zero to the
    /// nearest whole currency unit (`f64::round`); `balance = total - deposit`.
    ///
    /// Deposit is drawdown-derived while balance is total-derived, so
    /// `deposit + balance == total` does not generally hold. That mismatch is
    /// observed behaviour of the source calibration and is preserved, not
    /// reconciled.
    OnDrawdown { rate: f64 },
    /// `deposit = total * fraction`; sums back to total by construction.
    FractionOfTotal { fraction: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingStrategy {
    pub name: String,
    pub bounds: PlanBounds,
    pub base_price: BasePricePolicy,
    pub contracts: ContractTerms,
    pub days: DaysPolicy,
    pub feed_surcharge: f64,
    pub deposit: DepositPolicy,
}

impl PricingStrategy {
    /// The plan-builder calibration: piecewise base price with a $75 upgrade
    /// tier, $10 per extra mini over 1, alternating $10/$20 days surcharge,
    /// $20 feed, 6.4%-of-drawdown deposit.
    pub fn builder() -> Self {
        Self {
            name: "Plan Builder".to_string(),
            bounds: PlanBounds {
                drawdown_min: 1000,
                drawdown_max: 6000,
                drawdown_step: Some(250),
                contracts_min: 1,
                contracts_max: 12,
                days_min: 5,
                days_max: 12,
            },
            base_price: BasePricePolicy::PiecewiseTiered {
                lower_break: 2250,
                upper_break: 3000,
                rate: 0.10,
                intercept: 249.0,
                upgrade_fee: 75.0,
                upper_rate: 0.34,
                upper_intercept: -471.0,
            },
            contracts: ContractTerms {
                reference: 1,
                per_contract: 10.0,
                clamp_at_zero: false,
            },
            days: DaysPolicy::Alternating {
                baseline: 12,
                increments: vec![10.0, 20.0],
            },
            feed_surcharge: 20.0,
            deposit: DepositPolicy::OnDrawdown { rate: 0.064 },
        }
    }

    /// The promotional-table calibration: fixed price list keyed by drawdown
    /// level (deliberately non-monotonic around the 5000 promo tier),
    /// contracts 6-12 priced against a reference of 7.
    pub fn promo_table() -> Self {
        Self {
            name: "Promo Table".to_string(),
            bounds: PlanBounds {
                drawdown_min: 1500,
                drawdown_max: 6000,
                drawdown_step: None,
                contracts_min: 6,
                contracts_max: 12,
                days_min: 5,
                days_max: 12,
            },
            base_price: BasePricePolicy::DiscreteTable {
                entries: vec![
                    (1500, 374.0),
                    (2000, 424.0),
                    (2500, 474.0),
                    (3000, 549.0),
                    (3250, 689.0),
                    (4000, 614.0),
                    (5000, 499.0),
                    (6000, 749.0),
                ],
            },
            contracts: ContractTerms {
                reference: 7,
                per_contract: 10.0,
                clamp_at_zero: false,
            },
            days: DaysPolicy::Alternating {
                baseline: 12,
                increments: vec![10.0, 20.0],
            },
            feed_surcharge: 20.0,
            deposit: DepositPolicy::FractionOfTotal { fraction: 0.64 },
        }
    }

    /// The interpolated calibration: base price rises linearly $149 -> $649
    /// as drawdown rises 1000 -> 6000, flat $15/day surcharge, 64%-of-total
    /// deposit.
    pub fn interp() -> Self {
        Self {
            name: "Interpolated".to_string(),
            bounds: PlanBounds {
                drawdown_min: 1000,
                drawdown_max: 6000,
                drawdown_step: Some(250),
                contracts_min: 1,
                contracts_max: 12,
                days_min: 5,
                days_max: 12,
            },
            base_price: BasePricePolicy::LinearInterp {
                floor_drawdown: 1000,
                ceil_drawdown: 6000,
                floor_price: 149.0,
                ceil_price: 649.0,
            },
            contracts: ContractTerms {
                reference: 1,
                per_contract: 10.0,
                clamp_at_zero: false,
            },
            days: DaysPolicy::FlatRate {
                baseline: 12,
                per_day: 15.0,
            },
            feed_surcharge: 20.0,
            deposit: DepositPolicy::FractionOfTotal { fraction: 0.64 },
        }
    }

    /// Look up a preset by name (CLI `--preset`).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "builder" => Some(Self::builder()),
            "promo-table" => Some(Self::promo_table()),
            "interp" => Some(Self::interp()),
            _ => None,
        }
    }

    /// The drawdown levels this strategy accepts, ascending.
    ///
    /// Table keys for the discrete policy, otherwise every step from the
    /// lower bound up (or just the two bounds when no step is declared).
    pub fn supported_levels(&self) -> Vec<u32> {
        if let BasePricePolicy::DiscreteTable { entries } = &self.base_price {
            return entries.iter().map(|(level, _)| *level).collect();
        }
        match self.bounds.drawdown_step {
            Some(step) if step > 0 => (self.bounds.drawdown_min..=self.bounds.drawdown_max)
                .step_by(step as usize)
                .collect(),
            _ => vec![self.bounds.drawdown_min, self.bounds.drawdown_max],
        }
    }
}
