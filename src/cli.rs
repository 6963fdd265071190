//! CLI argument parsing for plusmaze

use crate::config::AnalysisConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "plusmaze")]
#[command(version)]
#[command(
    about = "Paired No-Stim vs Stim statistics for Elevated Plus Maze data",
    long_about = None
)]
pub struct Cli {
    /// Wide input table (CSV): one row per parameter, one column per subject and condition
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Directory for the supplementary tables (default: EPM_Results)
    #[arg(short, long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// TOML configuration file; flags given here take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Primary parameters for the subject-level tables (comma-separated)
    #[arg(long, value_name = "PARAMS", value_delimiter = ',')]
    pub primary: Option<Vec<String>>,

    /// Locomotion control parameters (comma-separated)
    #[arg(long, value_name = "PARAMS", value_delimiter = ',')]
    pub locomotion: Option<Vec<String>>,

    /// Output format of the run summary
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output (to stderr)
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, config: &mut AnalysisConfig) {
        if let Some(data) = &self.data {
            config.data_path = Some(data.clone());
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = out_dir.clone();
        }
        if let Some(primary) = &self.primary {
            config.primary_params = primary.clone();
        }
        if let Some(locomotion) = &self.locomotion {
            config.locomotion_params = locomotion.clone();
        }
    }
}
