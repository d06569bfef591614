use std::io::Read;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::Record;
use crate::error::{ChartError, ChartResult};

/// Why a source row did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    MissingName,
    UnparseableValue,
    NegativeValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// 1-based line number in the source text.
    pub line: u64,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedDataset {
    pub records: Vec<Record>,
    pub dropped: Vec<DroppedRow>,
}

impl NormalizedDataset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalizes a CSV table into records.
///
/// The header row is skipped and columns are positional: name, value, and an
/// optional icon reference. Fully blank rows are ignored; rows with a blank
/// name or a value that is not a non-negative number are dropped and listed
/// in `dropped`. Only framing/I-O failures are errors.
pub fn normalize_csv<R: Read>(reader: R) -> ChartResult<NormalizedDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut dataset = NormalizedDataset::default();
    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| ChartError::Source(format!("failed to read csv row: {e}")))?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let line = row
            .position()
            .map_or(row_index as u64 + 2, |position| position.line());
        match normalize_row(row.get(0), row.get(1), row.get(2)) {
            Ok(record) => dataset.records.push(record),
            Err(reason) => {
                trace!(line, ?reason, "dropped source row");
                dataset.dropped.push(DroppedRow { line, reason });
            }
        }
    }

    debug!(
        kept = dataset.records.len(),
        dropped = dataset.dropped.len(),
        "normalized dataset"
    );
    Ok(dataset)
}

fn normalize_row(
    name: Option<&str>,
    value: Option<&str>,
    icon: Option<&str>,
) -> Result<Record, DropReason> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(DropReason::MissingName);
    }

    let value = parse_value(value.unwrap_or_default())?;
    let record = Record::new(name, value).map_err(|_| DropReason::MissingName)?;
    Ok(record.with_icon(icon.unwrap_or_default()))
}

/// Parses a grouped numeric cell (`"12,345"`, `"12.9"`) into a whole value.
///
/// Fractions are truncated toward zero.
pub fn parse_value(text: &str) -> Result<u64, DropReason> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(DropReason::UnparseableValue);
    }

    let number = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| DropReason::UnparseableValue)?;
    if number.is_sign_negative() && !number.trunc().is_zero() {
        return Err(DropReason::NegativeValue);
    }

    number
        .trunc()
        .abs()
        .to_u64()
        .ok_or(DropReason::UnparseableValue)
}
