//! CSV quote table export adapter.

use crate::domain::error::PlanPricerError;
use crate::domain::quote_table::QuoteRow;
use crate::ports::export_port::ExportPort;
use std::path::PathBuf;

pub struct CsvExportAdapter {
    path: PathBuf,
}

impl CsvExportAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ExportPort for CsvExportAdapter {
    fn export(&self, rows: &[QuoteRow], include_schedule: bool) -> Result<(), PlanPricerError> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| PlanPricerError::Export {
            reason: format!("failed to open {}: {}", self.path.display(), e),
        })?;

        let mut header = vec![
            "drawdown",
            "base_price",
            "contract_addon",
            "days_adjustment",
            "feed_surcharge",
            "total",
        ];
        if include_schedule {
            header.push("deposit");
            header.push("balance");
        }
        writer.write_record(&header).map_err(write_error)?;

        for row in rows {
            let b = &row.breakdown;
            let mut record = vec![
                row.drawdown.to_string(),
                format!("{:.2}", b.base_price),
                format!("{:.2}", b.contract_addon),
                format!("{:.2}", b.days_adjustment),
                format!("{:.2}", b.feed_surcharge),
                format!("{:.2}", b.total),
            ];
            if include_schedule {
                match &b.payment {
                    Some(schedule) => {
                        record.push(format!("{:.2}", schedule.deposit));
                        record.push(format!("{:.2}", schedule.balance));
                    }
                    None => {
                        record.push(String::new());
                        record.push(String::new());
                    }
                }
            }
            writer.write_record(&record).map_err(write_error)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn write_error(e: csv::Error) -> PlanPricerError {
    PlanPricerError::Export {
        reason: format!("CSV write error: {}", e),
    }
}
