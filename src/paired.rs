//! Paired samples per (Parameter, Group)
//!
//! Baseline and intervention values are aligned by subject key, not by
//! position. A subject contributes a pair only when both conditions carry a
//! finite value. Subject order is first appearance in the long records.

use crate::column::{Condition, Group};
use crate::records::Measurement;
use serde::Serialize;
use std::collections::HashMap;

/// Aligned baseline/intervention values for one (Parameter, Group) cell
#[derive(Debug, Clone, PartialEq)]
pub struct PairedSample {
    pub parameter: String,
    pub group: Group,
    /// Subject keys, aligned with `baseline` and `intervention`
    pub subjects: Vec<String>,
    pub baseline: Vec<f64>,
    pub intervention: Vec<f64>,
}

impl PairedSample {
    /// Build a sample directly from aligned slices (subjects are numbered)
    pub fn from_values(
        parameter: impl Into<String>,
        group: Group,
        baseline: &[f64],
        intervention: &[f64],
    ) -> Self {
        Self {
            parameter: parameter.into(),
            group,
            subjects: (1..=baseline.len().min(intervention.len()))
                .map(|i| format!("S{}", i))
                .collect(),
            baseline: baseline.to_vec(),
            intervention: intervention.to_vec(),
        }
    }

    /// Number of complete pairs
    pub fn len(&self) -> usize {
        self.baseline.len().min(self.intervention.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Within-subject differences, intervention − baseline
    pub fn differences(&self) -> Vec<f64> {
        self.intervention
            .iter()
            .zip(&self.baseline)
            .map(|(on, off)| on - off)
            .collect()
    }
}

/// A (Subject, Parameter, Condition) seen more than once within a group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateEntry {
    pub parameter: String,
    pub group: Group,
    pub subject: String,
    pub condition: Condition,
    /// Value that was overwritten
    pub discarded: Option<f64>,
    /// Value that was kept (last occurrence wins)
    pub kept: Option<f64>,
}

/// All paired samples of a run, keyed by (Parameter, Group)
#[derive(Debug, Clone, Default)]
pub struct PairedSampleSet {
    parameters: Vec<String>,
    // One slot per group, indexed by `group_index`
    samples: HashMap<String, [Option<PairedSample>; 2]>,
    duplicates: Vec<DuplicateEntry>,
}

fn group_index(group: Group) -> usize {
    match group {
        Group::Treatment => 0,
        Group::Control => 1,
    }
}

impl PairedSampleSet {
    /// Paired sample for a cell, if any subject had data for it
    pub fn get(&self, parameter: &str, group: Group) -> Option<&PairedSample> {
        self.samples
            .get(parameter)
            .and_then(|slots| slots[group_index(group)].as_ref())
    }

    /// Distinct parameters in first-appearance order
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Duplicate entries detected while pairing
    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }
}

/// Per-cell accumulator: subject order plus both condition slots
#[derive(Default)]
struct CellBuilder {
    subjects: Vec<String>,
    // Outer Option: slot seen; inner Option: value present
    slots: HashMap<String, [Option<Option<f64>>; 2]>,
}

fn slot_index(condition: Condition) -> usize {
    match condition {
        Condition::Baseline => 0,
        Condition::Intervention => 1,
    }
}

/// Group long-form measurements into paired samples
pub fn build_paired_samples(measurements: &[Measurement]) -> PairedSampleSet {
    let mut parameters: Vec<String> = Vec::new();
    let mut cells: HashMap<(String, Group), CellBuilder> = HashMap::new();
    let mut duplicates = Vec::new();

    for m in measurements {
        if !parameters.contains(&m.parameter) {
            parameters.push(m.parameter.clone());
        }

        let cell = cells.entry((m.parameter.clone(), m.group)).or_default();
        if !cell.slots.contains_key(&m.subject) {
            cell.subjects.push(m.subject.clone());
        }
        let slots = cell
            .slots
            .entry(m.subject.clone())
            .or_insert([None, None]);

        let value = m.value.filter(|v| v.is_finite());
        let slot = &mut slots[slot_index(m.condition)];
        if let Some(previous) = *slot {
            tracing::warn!(
                parameter = %m.parameter,
                group = %m.group,
                subject = %m.subject,
                condition = %m.condition,
                "duplicate measurement, keeping the last value"
            );
            duplicates.push(DuplicateEntry {
                parameter: m.parameter.clone(),
                group: m.group,
                subject: m.subject.clone(),
                condition: m.condition,
                discarded: previous,
                kept: value,
            });
        }
        *slot = Some(value);
    }

    let mut samples: HashMap<String, [Option<PairedSample>; 2]> = HashMap::new();
    for ((parameter, group), cell) in cells {
        let mut sample = PairedSample {
            parameter: parameter.clone(),
            group,
            subjects: Vec::new(),
            baseline: Vec::new(),
            intervention: Vec::new(),
        };

        for subject in &cell.subjects {
            if let Some([Some(Some(off)), Some(Some(on))]) = cell.slots.get(subject) {
                sample.subjects.push(subject.clone());
                sample.baseline.push(*off);
                sample.intervention.push(*on);
            }
        }

        samples.entry(parameter).or_default()[group_index(group)] = Some(sample);
    }

    PairedSampleSet {
        parameters,
        samples,
        duplicates,
    }
}
