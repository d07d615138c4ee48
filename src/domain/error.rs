//! Domain error types.

/// Top-level error type for planpricer.
#[derive(Debug, thiserror::Error)]
pub enum PlanPricerError {
    #[error("{field} {value} out of range: {reason}")]
    DomainRange {
        field: &'static str,
        value: i64,
        reason: String,
    },

    #[error("drawdown {drawdown} has no table entry (supported levels: {})", format_levels(.levels))]
    UnsupportedLevel { drawdown: u32, levels: Vec<u32> },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("export error: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_levels(levels: &[u32]) -> String {
    levels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&PlanPricerError> for std::process::ExitCode {
    fn from(err: &PlanPricerError) -> Self {
        let code: u8 = match err {
            PlanPricerError::Io(_) => 1,
            PlanPricerError::ConfigParse { .. }
            | PlanPricerError::ConfigMissing { .. }
            | PlanPricerError::ConfigInvalid { .. } => 2,
            PlanPricerError::DomainRange { .. } | PlanPricerError::UnsupportedLevel { .. } => 3,
            PlanPricerError::Export { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn domain_range_message_names_field_and_value() {
        let err = PlanPricerError::DomainRange {
            field: "drawdown",
            value: 7000,
            reason: "must be between 1000 and 6000".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("drawdown"));
        assert!(msg.contains("7000"));
        assert!(msg.contains("between 1000 and 6000"));
    }

    #[test]
    fn unsupported_level_lists_levels() {
        let err = PlanPricerError::UnsupportedLevel {
            drawdown: 3100,
            levels: vec![3000, 3250, 5000],
        };
        let msg = err.to_string();
        assert!(msg.contains("3100"));
        assert!(msg.contains("3000, 3250, 5000"));
    }

    #[test]
    fn exit_codes_compile_for_each_group() {
        let domain = PlanPricerError::DomainRange {
            field: "contracts",
            value: 0,
            reason: "must be at least 1".to_string(),
        };
        let config = PlanPricerError::ConfigMissing {
            section: "payment".to_string(),
            key: "policy".to_string(),
        };
        let _: ExitCode = (&domain).into();
        let _: ExitCode = (&config).into();
    }
}
