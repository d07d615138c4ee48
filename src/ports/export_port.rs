//! Quote table export port trait.

use crate::domain::error::PlanPricerError;
use crate::domain::quote_table::QuoteRow;

/// Port for writing a swept quote table.
pub trait ExportPort {
    fn export(&self, rows: &[QuoteRow], include_schedule: bool) -> Result<(), PlanPricerError>;
}
