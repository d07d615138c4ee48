//! Plan configuration value type.

/// The five inputs that drive a pricing request.
///
/// Immutable once constructed; the engine never writes back into it. Range
/// enforcement lives with the active [`crate::domain::strategy::PricingStrategy`],
/// since each calibration declares its own bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConfig {
    /// Maximum permitted cumulative loss before the plan is disqualified.
    pub drawdown: u32,
    /// Number of mini contracts (one mini = ten micros).
    pub contracts: u32,
    /// Minimum trading days required before the plan can be completed.
    pub min_days: u32,
    /// Premium market-data feed add-on.
    pub rhythmic_feed: bool,
    /// Deposit-now / balance-later payment arrangement.
    pub split_payment: bool,
}

impl PlanConfig {
    pub fn new(drawdown: u32, contracts: u32, min_days: u32) -> Self {
        Self {
            drawdown,
            contracts,
            min_days,
            rhythmic_feed: false,
            split_payment: false,
        }
    }

    pub fn with_rhythmic_feed(mut self, on: bool) -> Self {
        self.rhythmic_feed = on;
        self
    }

    pub fn with_split_payment(mut self, on: bool) -> Self {
        self.split_payment = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_toggles_off() {
        let plan = PlanConfig::new(3000, 1, 12);
        assert_eq!(plan.drawdown, 3000);
        assert_eq!(plan.contracts, 1);
        assert_eq!(plan.min_days, 12);
        assert!(!plan.rhythmic_feed);
        assert!(!plan.split_payment);
    }

    #[test]
    fn builder_toggles() {
        let plan = PlanConfig::new(3000, 1, 12)
            .with_rhythmic_feed(true)
            .with_split_payment(true);
        assert!(plan.rhythmic_feed);
        assert!(plan.split_payment);
    }
}
