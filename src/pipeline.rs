//! End-to-end analysis run
//!
//! wide table → long records → paired samples → {batch families, derived
//! tables} → supplementary CSV files. [`analyze`] is pure; [`run`] adds the
//! file system around it.

use crate::batch::{run_batch, BatchResults};
use crate::column::Group;
use crate::config::AnalysisConfig;
use crate::csv_output::{
    locomotion_table, results_table, subject_level_table, within_subject_table, CsvTable,
};
use crate::derived::{locomotion_comparison, subject_table, DerivedRow, LocomotionResult};
use crate::error::Result;
use crate::paired::{build_paired_samples, DuplicateEntry, PairedSampleSet};
use crate::records::{build_long_records, LongRecords};
use crate::table::WideTable;
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const S1_FILE: &str = "Supplementary_Table_S1_EPM_PD.csv";
pub const S2_FILE: &str = "Supplementary_Table_S2_EPM_Control.csv";
pub const S3_FILE: &str = "Supplementary_Table_S3_EPM_SubjectLevel.csv";
pub const S4_FILE: &str = "Supplementary_Table_S4_EPM_LocomotionControl.csv";
pub const S5_FILE: &str = "Supplementary_Table_S5_EPM_WithinSubject.csv";

/// Significance level used for the summary count only
pub const REPORT_ALPHA: f64 = 0.05;

/// Everything computed from one input table
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub records: LongRecords,
    pub samples: PairedSampleSet,
    pub batch: BatchResults,
    pub subject_rows: Vec<DerivedRow>,
    pub locomotion: Vec<LocomotionResult>,
}

/// Run all statistics for a wide table
pub fn analyze(table: &WideTable, config: &AnalysisConfig) -> Result<AnalysisOutput> {
    config.validate()?;

    let records = build_long_records(table)?;
    let samples = build_paired_samples(&records.measurements);
    let batch = run_batch(&samples, &config.group_order);
    let subject_rows = subject_table(&samples, &config.primary_params);
    let locomotion = locomotion_comparison(&samples, &config.locomotion_params)?;

    Ok(AnalysisOutput {
        records,
        samples,
        batch,
        subject_rows,
        locomotion,
    })
}

fn family_file(group: Group) -> &'static str {
    match group {
        Group::Treatment => S1_FILE,
        Group::Control => S2_FILE,
    }
}

fn write_table(out_dir: &Path, name: &str, table: &CsvTable) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(name);
    fs::write(&path, table.to_csv())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.row_count(), "wrote table");
    Ok(path)
}

/// Write the supplementary tables into `out_dir`, creating it if needed
///
/// S1/S2 are written in group order and S4 always; S3/S5 only when a
/// primary parameter had Treatment data.
pub fn write_tables(
    output: &AnalysisOutput,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();

    for family in &output.batch.families {
        written.push(write_table(
            out_dir,
            family_file(family.group),
            &results_table(&family.results),
        )?);
    }

    if !output.subject_rows.is_empty() {
        written.push(write_table(
            out_dir,
            S3_FILE,
            &subject_level_table(&output.subject_rows, &config.condition_order),
        )?);
    }

    written.push(write_table(
        out_dir,
        S4_FILE,
        &locomotion_table(&output.locomotion),
    )?);

    if !output.subject_rows.is_empty() {
        written.push(write_table(
            out_dir,
            S5_FILE,
            &within_subject_table(&output.subject_rows, &config.condition_order),
        )?);
    }

    Ok(written)
}

/// Per-group line of the run summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: Group,
    pub tests: usize,
    pub significant: usize,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub measurements: usize,
    pub parameters: usize,
    pub skipped_columns: Vec<String>,
    pub duplicates: Vec<DuplicateEntry>,
    pub groups: Vec<GroupSummary>,
    pub subject_rows: usize,
    pub locomotion_tests: usize,
    pub files: Vec<PathBuf>,
}

impl AnalysisReport {
    pub fn new(output: &AnalysisOutput, files: Vec<PathBuf>) -> Self {
        Self {
            measurements: output.records.len(),
            parameters: output.samples.parameters().len(),
            skipped_columns: output.records.skipped_columns.clone(),
            duplicates: output.samples.duplicates().to_vec(),
            groups: output
                .batch
                .families
                .iter()
                .map(|f| GroupSummary {
                    group: f.group,
                    tests: f.results.len(),
                    significant: f.significant_count(REPORT_ALPHA),
                })
                .collect(),
            subject_rows: output.subject_rows.len(),
            locomotion_tests: output.locomotion.len(),
            files,
        }
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str("EPM ANALYSIS COMPLETED\n\n");
        report.push_str(&format!(
            "Measurements: {} ({} parameters)\n",
            self.measurements, self.parameters
        ));

        for g in &self.groups {
            report.push_str(&format!(
                "{}: {} tests, {} significant after Holm (p < {})\n",
                g.group, g.tests, g.significant, REPORT_ALPHA
            ));
        }

        report.push_str(&format!("Subject-level rows: {}\n", self.subject_rows));
        report.push_str(&format!("Locomotion controls: {}\n", self.locomotion_tests));

        if !self.skipped_columns.is_empty() {
            report.push_str(&format!(
                "\nSkipped columns ({}):\n",
                self.skipped_columns.len()
            ));
            for name in &self.skipped_columns {
                report.push_str(&format!("  - {}\n", name));
            }
        }

        if !self.duplicates.is_empty() {
            report.push_str(&format!(
                "\nDuplicate entries, last value kept ({}):\n",
                self.duplicates.len()
            ));
            for d in &self.duplicates {
                report.push_str(&format!(
                    "  - {} / {} / {} / {}\n",
                    d.parameter, d.group, d.subject, d.condition
                ));
            }
        }

        if !self.files.is_empty() {
            report.push_str("\nWritten:\n");
            for path in &self.files {
                report.push_str(&format!("  {}\n", path.display()));
            }
        }

        report
    }
}

/// Load the configured input, analyze it and write all tables
pub fn run(config: &AnalysisConfig) -> anyhow::Result<AnalysisReport> {
    let data_path = config
        .data_path
        .as_deref()
        .context("No input table given (set data_path or pass --data)")?;

    let table = WideTable::from_file(data_path)?;
    let output = analyze(&table, config)?;
    let files = write_tables(&output, config, &config.out_dir)?;

    Ok(AnalysisReport::new(&output, files))
}
