//! CSV export of ledgers

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CalcResult;
use crate::loan::{AmortizationSchedule, YearlySummary};
use crate::rates::round2;

/// Flat yearly line of a loan schedule
#[derive(Debug, Clone, Serialize)]
pub struct YearlyScheduleRow {
    pub year: i32,
    pub opening_balance: f64,
    pub principal: f64,
    pub interest: f64,
    pub total_payment: f64,
    pub closing_balance: f64,
    pub loan_paid_percentage: f64,
}

impl From<&YearlySummary> for YearlyScheduleRow {
    fn from(y: &YearlySummary) -> Self {
        Self {
            year: y.year,
            opening_balance: round2(y.opening_balance),
            principal: round2(y.principal),
            interest: round2(y.interest),
            total_payment: round2(y.total_payment),
            closing_balance: round2(y.balance),
            loan_paid_percentage: round2(y.loan_paid_percentage),
        }
    }
}

/// Write any flat serializable rows with a header taken from the field names
pub fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W) -> CalcResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file<T: Serialize>(rows: &[T], path: &Path) -> CalcResult<()> {
    write_csv(rows, File::create(path)?)
}

/// One line per installment
pub fn write_schedule_csv(schedule: &AmortizationSchedule, path: &Path) -> CalcResult<()> {
    write_csv_file(&schedule.rows, path)
}

/// One line per calendar year
pub fn write_yearly_csv(schedule: &AmortizationSchedule, path: &Path) -> CalcResult<()> {
    let rows: Vec<YearlyScheduleRow> = schedule.yearly().iter().map(YearlyScheduleRow::from).collect();
    write_csv_file(&rows, path)
}
