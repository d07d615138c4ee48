//! Calibration file validation.
//!
//! Validates a strategy calibration config before a strategy is built from
//! it, so the CLI can reject a bad file with a precise message instead of
//! failing mid-construction.

use crate::domain::error::PlanPricerError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let policy = validate_base_policy(config)?;
    validate_bounds(config, &policy)?;
    match policy.as_str() {
        "piecewise" => validate_piecewise(config)?,
        "table" => validate_table(config)?,
        "interp" => validate_interp(config)?,
        _ => unreachable!("validate_base_policy admits only known policies"),
    }
    validate_contracts(config)?;
    validate_days(config)?;
    validate_feed(config)?;
    validate_payment(config)?;
    Ok(())
}

fn invalid(key: &str, reason: &str, section: &str) -> PlanPricerError {
    PlanPricerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn missing(section: &str, key: &str) -> PlanPricerError {
    PlanPricerError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn validate_base_policy(config: &dyn ConfigPort) -> Result<String, PlanPricerError> {
    match config.get_string("strategy", "base_policy") {
        Some(p) if matches!(p.as_str(), "piecewise" | "table" | "interp") => Ok(p),
        Some(p) => Err(invalid(
            "base_policy",
            &format!("unknown policy '{}' (expected piecewise, table or interp)", p),
            "strategy",
        )),
        None => Err(missing("strategy", "base_policy")),
    }
}

fn require_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<i64, PlanPricerError> {
    match config.get_string(section, key) {
        None => Err(missing(section, key)),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(key, "must be an integer", section)),
    }
}

fn require_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<f64, PlanPricerError> {
    match config.get_string(section, key) {
        None => Err(missing(section, key)),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(key, "must be a number", section)),
    }
}

fn validate_bounds(config: &dyn ConfigPort, policy: &str) -> Result<(), PlanPricerError> {
    let drawdown_min = require_int(config, "bounds", "drawdown_min")?;
    let drawdown_max = require_int(config, "bounds", "drawdown_max")?;
    if drawdown_min <= 0 {
        return Err(invalid("drawdown_min", "must be positive", "bounds"));
    }
    if drawdown_max < drawdown_min {
        return Err(invalid(
            "drawdown_max",
            "must not be below drawdown_min",
            "bounds",
        ));
    }

    // Formula policies need a slider granularity; table keys carry their own.
    if policy != "table" {
        let step = require_int(config, "bounds", "drawdown_step")?;
        if step <= 0 {
            return Err(invalid("drawdown_step", "must be positive", "bounds"));
        }
    }

    let contracts_min = require_int(config, "bounds", "contracts_min")?;
    let contracts_max = require_int(config, "bounds", "contracts_max")?;
    if contracts_min < 1 {
        return Err(invalid("contracts_min", "must be at least 1", "bounds"));
    }
    if contracts_max < contracts_min {
        return Err(invalid(
            "contracts_max",
            "must not be below contracts_min",
            "bounds",
        ));
    }

    let days_min = require_int(config, "bounds", "days_min")?;
    let days_max = require_int(config, "bounds", "days_max")?;
    if days_min < 1 {
        return Err(invalid("days_min", "must be at least 1", "bounds"));
    }
    if days_max < days_min {
        return Err(invalid("days_max", "must not be below days_min", "bounds"));
    }

    Ok(())
}

fn validate_piecewise(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let lower = require_int(config, "piecewise", "lower_break")?;
    let upper = require_int(config, "piecewise", "upper_break")?;
    if lower >= upper {
        return Err(invalid(
            "lower_break",
            "must be below upper_break",
            "piecewise",
        ));
    }
    require_double(config, "piecewise", "rate")?;
    require_double(config, "piecewise", "intercept")?;
    require_double(config, "piecewise", "upgrade_fee")?;
    require_double(config, "piecewise", "upper_rate")?;
    require_double(config, "piecewise", "upper_intercept")?;
    Ok(())
}

fn validate_table(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let keys = config.section_keys("table");
    if keys.is_empty() {
        return Err(missing("table", "<drawdown> = <price> entries"));
    }
    for key in keys {
        if key.trim().parse::<u32>().is_err() {
            return Err(invalid(
                &key,
                "table keys must be integer drawdown levels",
                "table",
            ));
        }
        let price = require_double(config, "table", &key)?;
        if price < 0.0 {
            return Err(invalid(&key, "price must be non-negative", "table"));
        }
    }
    Ok(())
}

fn validate_interp(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let floor = require_int(config, "interp", "floor_drawdown")?;
    let ceil = require_int(config, "interp", "ceil_drawdown")?;
    if floor >= ceil {
        return Err(invalid(
            "floor_drawdown",
            "must be below ceil_drawdown",
            "interp",
        ));
    }
    require_double(config, "interp", "floor_price")?;
    require_double(config, "interp", "ceil_price")?;
    Ok(())
}

fn validate_contracts(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let reference = require_int(config, "contracts", "reference")?;
    if reference < 1 {
        return Err(invalid("reference", "must be at least 1", "contracts"));
    }
    let per_contract = require_double(config, "contracts", "per_contract")?;
    if per_contract < 0.0 {
        return Err(invalid(
            "per_contract",
            "must be non-negative",
            "contracts",
        ));
    }
    Ok(())
}

fn validate_days(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let policy = match config.get_string("days", "policy") {
        Some(p) => p,
        None => return Err(missing("days", "policy")),
    };

    let baseline = require_int(config, "days", "baseline")?;
    if baseline < 1 {
        return Err(invalid("baseline", "must be at least 1", "days"));
    }

    match policy.as_str() {
        "alternating" => {
            let raw = config
                .get_string("days", "increments")
                .ok_or_else(|| missing("days", "increments"))?;
            let parsed: Result<Vec<f64>, _> =
                raw.split(',').map(|s| s.trim().parse::<f64>()).collect();
            match parsed {
                Ok(values) if !values.is_empty() => Ok(()),
                _ => Err(invalid(
                    "increments",
                    "must be a comma-separated list of numbers",
                    "days",
                )),
            }
        }
        "flat" => {
            let per_day = require_double(config, "days", "per_day")?;
            if per_day < 0.0 {
                return Err(invalid("per_day", "must be non-negative", "days"));
            }
            Ok(())
        }
        other => Err(invalid(
            "policy",
            &format!("unknown policy '{}' (expected alternating or flat)", other),
            "days",
        )),
    }
}

fn validate_feed(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let surcharge = require_double(config, "feed", "surcharge")?;
    if surcharge < 0.0 {
        return Err(invalid("surcharge", "must be non-negative", "feed"));
    }
    Ok(())
}

fn validate_payment(config: &dyn ConfigPort) -> Result<(), PlanPricerError> {
    let policy = match config.get_string("payment", "policy") {
        Some(p) => p,
        None => return Err(missing("payment", "policy")),
    };

    match policy.as_str() {
        "drawdown" => {
            let rate = require_double(config, "payment", "rate")?;
            if rate <= 0.0 || rate >= 1.0 {
                return Err(invalid("rate", "must be between 0 and 1", "payment"));
            }
            Ok(())
        }
        "total" => {
            let fraction = require_double(config, "payment", "fraction")?;
            if fraction <= 0.0 || fraction >= 1.0 {
                return Err(invalid("fraction", "must be between 0 and 1", "payment"));
            }
            Ok(())
        }
        other => Err(invalid(
            "policy",
            &format!("unknown policy '{}' (expected drawdown or total)", other),
            "payment",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID_PIECEWISE: &str = r#"
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

    const VALID_TABLE: &str = r#"
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
3000 = 549
3250 = 689
5000 = 499

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

    #[test]
    fn valid_piecewise_config_passes() {
        assert!(validate_strategy_config(&make_config(VALID_PIECEWISE)).is_ok());
    }

    #[test]
    fn valid_table_config_passes() {
        assert!(validate_strategy_config(&make_config(VALID_TABLE)).is_ok());
    }

    #[test]
    fn missing_base_policy_fails() {
        let config = make_config("[strategy]\nname = X\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigMissing { key, .. } if key == "base_policy"));
    }

    #[test]
    fn unknown_base_policy_fails() {
        let config = make_config("[strategy]\nbase_policy = quadratic\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigInvalid { key, .. } if key == "base_policy"));
    }

    #[test]
    fn drawdown_bounds_inverted_fails() {
        let content = VALID_PIECEWISE.replace("drawdown_max = 6000", "drawdown_max = 500");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigInvalid { key, .. } if key == "drawdown_max"));
    }

    #[test]
    fn missing_step_for_formula_policy_fails() {
        let content = VALID_PIECEWISE.replace("drawdown_step = 250\n", "");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigMissing { key, .. } if key == "drawdown_step"));
    }

    #[test]
    fn table_policy_needs_no_step() {
        // VALID_TABLE declares no drawdown_step and still passes.
        assert!(validate_strategy_config(&make_config(VALID_TABLE)).is_ok());
    }

    #[test]
    fn breakpoints_inverted_fails() {
        let content = VALID_PIECEWISE.replace("upper_break = 3000", "upper_break = 2000");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigInvalid { key, .. } if key == "lower_break"));
    }

    #[test]
    fn empty_table_fails() {
        let content = VALID_TABLE.replace(
            "[table]\n1500 = 374\n3000 = 549\n3250 = 689\n5000 = 499\n",
            "[table]\n",
        );
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigMissing { section, .. } if section == "table"));
    }

    #[test]
    fn non_numeric_table_key_fails() {
        let content = VALID_TABLE.replace("1500 = 374", "low = 374");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigInvalid { key, .. } if key == "low"));
    }

    #[test]
    fn contracts_reference_zero_fails() {
        let content = VALID_PIECEWISE.replace("reference = 1", "reference = 0");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigInvalid { key, .. } if key == "reference"));
    }

    #[test]
    fn unknown_days_policy_fails() {
        let content = VALID_PIECEWISE.replace("policy = alternating", "policy = doubling");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(
            matches!(err, PlanPricerError::ConfigInvalid { section, key, .. } if section == "days" && key == "policy")
        );
    }

    #[test]
    fn malformed_increments_fails() {
        let content = VALID_PIECEWISE.replace("increments = 10, 20", "increments = 10, twenty");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigInvalid { key, .. } if key == "increments"));
    }

    #[test]
    fn negative_feed_surcharge_fails() {
        let content = VALID_PIECEWISE.replace("surcharge = 20", "surcharge = -5");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(matches!(err, PlanPricerError::ConfigInvalid { key, .. } if key == "surcharge"));
    }

    #[test]
    fn deposit_rate_out_of_range_fails() {
        let content = VALID_PIECEWISE.replace("rate = 0.064", "rate = 1.5");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(
            matches!(err, PlanPricerError::ConfigInvalid { section, key, .. } if section == "payment" && key == "rate")
        );
    }

    #[test]
    fn missing_payment_policy_fails() {
        let content = VALID_PIECEWISE.replace("policy = drawdown\nrate = 0.064\n", "");
        let err = validate_strategy_config(&make_config(&content)).unwrap_err();
        assert!(
            matches!(err, PlanPricerError::ConfigMissing { section, key, .. } if section == "payment" && key == "policy")
        );
    }
}
