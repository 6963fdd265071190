//! CSV output for the supplementary tables
//!
//! S1/S2: per-group test results, S3: subject-level primary parameters,
//! S4: locomotion controls, S5: within-subject change with percent change.

use crate::column::Condition;
use crate::derived::{DerivedRow, LocomotionResult};
use crate::selector::TestResult;

/// Header of the per-group result tables (S1, S2)
pub const RESULTS_HEADER: [&str; 7] = [
    "Parameter",
    "Group",
    "Test",
    "Statistic",
    "p_raw",
    "Cohens_dz",
    "p_holm",
];

/// Header of the locomotion control table (S4)
pub const LOCOMOTION_HEADER: [&str; 4] = ["Parameter", "Statistic", "p_value", "Cohens_dz"];

/// A header row plus data rows, rendered as comma-separated text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Create an empty table with the given header
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(fields: &[String]) -> String {
        fields
            .iter()
            .map(|f| Self::escape_field(f))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Generate CSV output as string; the header row is always present
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&Self::format_row(&self.header));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }
}

/// Render a number; non-finite values appear as `NaN`, `inf`, `-inf`
pub fn format_float(value: f64) -> String {
    value.to_string()
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_default()
}

/// S1/S2: one row per tested parameter of a group
pub fn results_table(results: &[TestResult]) -> CsvTable {
    let mut table = CsvTable::new(&RESULTS_HEADER);

    for r in results {
        table.push_row(vec![
            r.parameter.clone(),
            r.group.label().to_string(),
            r.test.label().to_string(),
            format_float(r.statistic),
            format_float(r.raw_p),
            format_float(r.effect_size),
            format_optional(r.corrected_p),
        ]);
    }

    table
}

fn condition_column(condition: Condition) -> &'static str {
    match condition {
        Condition::Baseline => "Baseline",
        Condition::Intervention => "Intervention",
    }
}

fn condition_value(row: &DerivedRow, condition: Condition) -> f64 {
    match condition {
        Condition::Baseline => row.baseline,
        Condition::Intervention => row.intervention,
    }
}

fn derived_table(rows: &[DerivedRow], condition_order: &[Condition], with_percent: bool) -> CsvTable {
    let mut header = vec!["Subject"];
    header.extend(condition_order.iter().map(|c| condition_column(*c)));
    header.push("Delta");
    if with_percent {
        header.push("Percent_Change");
    }
    header.push("Parameter");

    let mut table = CsvTable::new(header.as_slice());
    for row in rows {
        let mut fields = vec![row.subject.clone()];
        fields.extend(
            condition_order
                .iter()
                .map(|c| format_float(condition_value(row, *c))),
        );
        fields.push(format_float(row.delta));
        if with_percent {
            fields.push(format_float(row.percent_change));
        }
        fields.push(row.parameter.clone());
        table.push_row(fields);
    }

    table
}

/// S3: subject-level values of the primary parameters
pub fn subject_level_table(rows: &[DerivedRow], condition_order: &[Condition]) -> CsvTable {
    derived_table(rows, condition_order, false)
}

/// S5: subject-level values with percent change
pub fn within_subject_table(rows: &[DerivedRow], condition_order: &[Condition]) -> CsvTable {
    derived_table(rows, condition_order, true)
}

/// S4: locomotion control comparisons
pub fn locomotion_table(results: &[LocomotionResult]) -> CsvTable {
    let mut table = CsvTable::new(&LOCOMOTION_HEADER);

    for r in results {
        table.push_row(vec![
            r.parameter.clone(),
            format_float(r.statistic),
            format_float(r.pvalue),
            format_float(r.effect_size),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Group;
    use crate::selector::TestName;

    const ORDER: [Condition; 2] = [Condition::Baseline, Condition::Intervention];

    fn result(parameter: &str, corrected: Option<f64>) -> TestResult {
        TestResult {
            parameter: parameter.to_string(),
            group: Group::Treatment,
            test: TestName::ParametricPaired,
            statistic: 6.0,
            raw_p: 0.004,
            effect_size: 2.5,
            corrected_p: corrected,
            n: 5,
            normality_p: 0.9,
        }
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(CsvTable::escape_field("plain"), "plain");
        assert_eq!(CsvTable::escape_field("a,b"), "\"a,b\"");
        assert_eq!(CsvTable::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_empty_results_table_has_header() {
        let csv = results_table(&[]).to_csv();
        assert_eq!(csv, "Parameter,Group,Test,Statistic,p_raw,Cohens_dz,p_holm\n");
    }

    #[test]
    fn test_results_row() {
        let csv = results_table(&[result("Time_OpenArms", Some(0.008))]).to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "Time_OpenArms,PD,Paired t-test,6,0.004,2.5,0.008");
    }

    #[test]
    fn test_parameter_with_comma_is_quoted() {
        let csv = results_table(&[result("Speed, cm/s", Some(0.008))]).to_csv();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"Speed, cm/s\",PD"));
    }

    #[test]
    fn test_non_finite_values_are_rendered() {
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_optional(None), "");
    }

    #[test]
    fn test_subject_level_columns() {
        let rows = [DerivedRow::new("Time_OpenArms", "PD1", 40.0, 50.0)];
        let csv = subject_level_table(&rows, &ORDER).to_csv();
        assert_eq!(
            csv,
            "Subject,Baseline,Intervention,Delta,Parameter\nPD1,40,50,10,Time_OpenArms\n"
        );
    }

    #[test]
    fn test_within_subject_columns() {
        let rows = [DerivedRow::new("Time_OpenArms", "PD1", 0.0, 5.0)];
        let csv = within_subject_table(&rows, &ORDER).to_csv();
        assert_eq!(
            csv,
            "Subject,Baseline,Intervention,Delta,Percent_Change,Parameter\nPD1,0,5,5,inf,Time_OpenArms\n"
        );
    }

    #[test]
    fn test_condition_order_swaps_columns() {
        let rows = [DerivedRow::new("P", "PD1", 1.0, 2.0)];
        let order = [Condition::Intervention, Condition::Baseline];
        let csv = subject_level_table(&rows, &order).to_csv();
        assert_eq!(csv, "Subject,Intervention,Baseline,Delta,Parameter\nPD1,2,1,1,P\n");
    }

    #[test]
    fn test_locomotion_table() {
        let results = [LocomotionResult {
            parameter: "Entries_ClosedArms".to_string(),
            statistic: -1.5,
            pvalue: 0.2,
            effect_size: -0.6,
            n: 6,
        }];
        let table = locomotion_table(&results);
        assert_eq!(table.header(), &LOCOMOTION_HEADER.map(String::from));
        assert_eq!(table.row_count(), 1);
        assert!(table.to_csv().ends_with("Entries_ClosedArms,-1.5,0.2,-0.6\n"));
    }
}
