//! Long-form record builder
//!
//! Turns the wide table into one [`Measurement`] per (parameter row,
//! resolvable column). Columns whose header cannot be resolved are skipped
//! and reported, never fatal; only a table with no resolvable data at all is
//! rejected.

use crate::column::{resolve_column_identity, Condition, Group};
use crate::error::{AnalysisError, Result};
use crate::table::WideTable;

/// A single observed value for one subject under one condition
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub parameter: String,
    pub subject: String,
    pub group: Group,
    pub condition: Condition,
    /// `None` when the source cell was missing
    pub value: Option<f64>,
}

/// Output of the record builder
#[derive(Debug, Clone, Default)]
pub struct LongRecords {
    /// Measurements in row-major order (parameter rows, then columns)
    pub measurements: Vec<Measurement>,

    /// Data column headers that did not match the naming scheme
    pub skipped_columns: Vec<String>,
}

impl LongRecords {
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

/// Convert a wide table into long-form measurements
///
/// Fails with [`AnalysisError::EmptyResult`] if no measurement could be
/// produced, which means the column naming scheme was not recognised.
pub fn build_long_records(table: &WideTable) -> Result<LongRecords> {
    let identities: Vec<_> = table
        .columns
        .iter()
        .map(|name| resolve_column_identity(name))
        .collect();

    let skipped_columns: Vec<String> = table
        .columns
        .iter()
        .zip(&identities)
        .filter(|(_, id)| id.is_none())
        .map(|(name, _)| name.clone())
        .collect();

    for name in &skipped_columns {
        tracing::warn!(column = %name, "unrecognised column name, skipping");
    }

    let mut measurements = Vec::new();
    for row in &table.rows {
        for (col, identity) in identities.iter().enumerate() {
            let Some(identity) = identity else {
                continue;
            };

            measurements.push(Measurement {
                parameter: row.parameter.clone(),
                subject: identity.subject.clone(),
                group: identity.group,
                condition: identity.condition,
                value: row.values.get(col).copied().flatten(),
            });
        }
    }

    if measurements.is_empty() {
        return Err(AnalysisError::EmptyResult {
            columns: table.columns.len(),
        });
    }

    tracing::info!(
        measurements = measurements.len(),
        skipped_columns = skipped_columns.len(),
        "built long-form records"
    );

    Ok(LongRecords {
        measurements,
        skipped_columns,
    })
}
