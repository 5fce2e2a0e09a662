use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use getset::Getters;
use log::info;
use rust_decimal::prelude::*;
use serde::Serialize;

use crate::{
    csv_writer::TableCSVWriter,
    errors::AssistantError,
    models::FinanceRecord,
    repository::Repository,
    traits::{CSVWrite, Record, SnapshotStore},
};

/// Format of the period bounds typed by the user.
pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

pub const REPORT_HEADERS: &[&str] = &[
    "Id",
    "Начальная дата",
    "Конечная дата",
    "Общий доход",
    "Общие расходы",
    "Баланс",
];

fn plain_datetime<S>(x: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&x.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Parses a `dd-mm-yyyy` period bound into midnight of that day.
pub fn parse_report_date(input: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(input.trim(), REPORT_DATE_FORMAT).map_err(|source| {
        AssistantError::DateParse {
            input: input.to_string(),
            source,
        }
    })?;
    Ok(date.and_time(NaiveTime::MIN))
}

/// One detail line. Every line repeats the period totals next to a record id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    id: u32,
    #[serde(serialize_with = "plain_datetime")]
    start: NaiveDateTime,
    #[serde(serialize_with = "plain_datetime")]
    end: NaiveDateTime,
    revenue: Decimal,
    expense: Decimal,
    balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Getters)]
pub struct FinanceReport {
    #[getset(get = "pub")]
    start: NaiveDateTime,
    #[getset(get = "pub")]
    end: NaiveDateTime,
    #[getset(get = "pub")]
    revenue: Decimal,
    /// Sum of non-positive amounts, so never above zero.
    #[getset(get = "pub")]
    expense: Decimal,
    #[getset(get = "pub")]
    balance: Decimal,
    #[getset(get = "pub")]
    included: usize,
}

impl FinanceReport {
    /// Totals the records dated within `[start, end]`, both bounds included.
    pub fn compute(
        records: &[FinanceRecord],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self> {
        let mut revenue = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        let mut included = 0;

        for record in records.iter().filter(|r| (start..=end).contains(r.date())) {
            if record.is_revenue() {
                revenue = revenue
                    .checked_add(*record.amount())
                    .ok_or(AssistantError::ValueOverflow)?;
            } else {
                expense = expense
                    .checked_add(*record.amount())
                    .ok_or(AssistantError::ValueOverflow)?;
            }
            included += 1;
        }

        let balance = revenue
            .checked_add(expense)
            .ok_or(AssistantError::ValueOverflow)?;

        Ok(FinanceReport {
            start,
            end,
            revenue,
            expense,
            balance,
            included,
        })
    }

    pub fn file_name(&self) -> String {
        format!(
            "report_{}_{}.csv",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    /// One row per record of the whole collection, not only the included ones.
    pub fn rows<'a>(
        &'a self,
        records: &'a [FinanceRecord],
    ) -> impl Iterator<Item = ReportRow> + 'a {
        records.iter().map(move |record| ReportRow {
            id: record.id(),
            start: self.start,
            end: self.end,
            revenue: self.revenue,
            expense: self.expense,
            balance: self.balance,
        })
    }

    pub fn write(&self, records: &[FinanceRecord], writer: &mut impl CSVWrite) -> Result<()> {
        writer.write_header(REPORT_HEADERS)?;
        for row in self.rows(records) {
            writer.write_record(&row)?;
        }
        writer.flush()
    }
}

#[derive(Debug)]
pub struct GeneratedReport {
    pub report: FinanceReport,
    pub path: PathBuf,
}

/// Computes the report for a `dd-mm-yyyy` period and writes its detail table
/// into `output_dir`.
///
/// Both bounds resolve to midnight, so a record timed later on the end day
/// falls outside the period.
///
/// A malformed bound fails with `DateParse` before anything is written.
pub fn generate_report<S>(
    repository: &Repository<FinanceRecord, S>,
    start: &str,
    end: &str,
    output_dir: &Path,
) -> Result<GeneratedReport>
where
    S: SnapshotStore,
{
    let start = parse_report_date(start)?;
    let end = parse_report_date(end)?;
    let report = FinanceReport::compute(repository.records(), start, end)?;

    let path = output_dir.join(report.file_name());
    let mut writer = TableCSVWriter::create(&path)?;
    report.write(repository.records(), &mut writer)?;

    info!(
        "event=report_generated included={} revenue={} expense={} path={}",
        report.included,
        report.revenue,
        report.expense,
        path.display()
    );
    Ok(GeneratedReport { report, path })
}
