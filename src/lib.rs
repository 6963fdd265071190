//! plusmaze - Paired statistics for Elevated Plus Maze experiments
//!
//! This library turns a wide EPM export (one row per behavioral parameter,
//! one column per subject and condition) into within-subject No-Stim vs Stim
//! comparisons: normality-driven selection between the paired t-test and the
//! Wilcoxon signed-rank test, Cohen's dz, Holm correction per group, and the
//! derived subject-level and locomotion control tables.

pub mod batch;
pub mod cli;
pub mod column;
pub mod config;
pub mod csv_output;
pub mod derived;
pub mod error;
pub mod paired;
pub mod pipeline;
pub mod records;
pub mod selector;
pub mod statistics;
pub mod table;
