#![allow(dead_code)]

use planpricer::domain::error::PlanPricerError;
use planpricer::domain::plan::PlanConfig;
use planpricer::domain::quote_table::QuoteRow;
use planpricer::ports::export_port::ExportPort;
use std::cell::RefCell;

/// Export port that captures rows in memory instead of touching the
/// filesystem.
pub struct MockExportPort {
    pub captured: RefCell<Vec<QuoteRow>>,
    pub with_schedule: RefCell<Option<bool>>,
    pub fail_with: Option<String>,
}

impl MockExportPort {
    pub fn new() -> Self {
        Self {
            captured: RefCell::new(Vec::new()),
            with_schedule: RefCell::new(None),
            fail_with: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            captured: RefCell::new(Vec::new()),
            with_schedule: RefCell::new(None),
            fail_with: Some(reason.to_string()),
        }
    }
}

impl ExportPort for MockExportPort {
    fn export(&self, rows: &[QuoteRow], include_schedule: bool) -> Result<(), PlanPricerError> {
        if let Some(reason) = &self.fail_with {
            return Err(PlanPricerError::Export {
                reason: reason.clone(),
            });
        }
        *self.captured.borrow_mut() = rows.to_vec();
        *self.with_schedule.borrow_mut() = Some(include_schedule);
        Ok(())
    }
}

pub fn make_plan(drawdown: u32, contracts: u32, min_days: u32) -> PlanConfig {
    PlanConfig::new(drawdown, contracts, min_days)
}

pub const BUILDER_CALIBRATION: &str = r#"
[strategy]
name = Plan Builder
base_policy = piecewise

[bounds]
drawdown_min = 1000
drawdown_max = 6000
drawdown_step = 250
contracts_min = 1
contracts_max = 12
days_min = 5
days_max = 12

[piecewise]
lower_break = 2250
upper_break = 3000
rate = 0.10
intercept = 249
upgrade_fee = 75
upper_rate = 0.34
upper_intercept = -471

[contracts]
reference = 1
per_contract = 10
clamp_at_zero = false

[days]
policy = alternating
baseline = 12
increments = 10, 20

[feed]
surcharge = 20

[payment]
policy = drawdown
rate = 0.064
"#;

pub const PROMO_TABLE_CALIBRATION: &str = r#"
[strategy]
name = Promo Table
base_policy = table

[bounds]
drawdown_min = 1500
drawdown_max = 6000
contracts_min = 6
contracts_max = 12
days_min = 5
days_max = 12

[table]
1500 = 374
2000 = 424
2500 = 474
3000 = 549
3250 = 689
4000 = 614
5000 = 499
6000 = 749

[contracts]
reference = 7
per_contract = 10
clamp_at_zero = false

[days]
policy = alternating
baseline = 12
increments = 10, 20

[feed]
surcharge = 20

[payment]
policy = total
fraction = 0.64
"#;

pub const INTERP_CALIBRATION: &str = r#"
[strategy]
name = Interpolated
base_policy = interp

[bounds]
drawdown_min = 1000
drawdown_max = 6000
drawdown_step = 250
contracts_min = 1
contracts_max = 12
days_min = 5
days_max = 12

[interp]
floor_drawdown = 1000
ceil_drawdown = 6000
floor_price = 149
ceil_price = 649

[contracts]
reference = 1
per_contract = 10
clamp_at_zero = false

[days]
policy = flat
baseline = 12
per_day = 15

[feed]
surcharge = 20

[payment]
policy = total
fraction = 0.64
"#;
