//! Command-line entry points
//!
//! Each binary parses its clap arguments and calls the matching `run`
//! function here, so the whole flow is reachable from tests.

pub mod existing_commands;
pub mod transcription_commands;

use std::path::PathBuf;

use clap::Args;

use crate::config::MetadataConfig;
use crate::services::metadata::DatasetSummary;

/// Flags shared by both tools.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Output directory for metadata files
    #[arg(long = "output_dir")]
    pub output_dir: PathBuf,

    /// Language code
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Speaker name for metadata
    #[arg(long = "speaker_name", default_value = "coqui")]
    pub speaker_name: String,

    /// Share of data for evaluation
    #[arg(long = "eval_percentage", default_value_t = 0.15)]
    pub eval_percentage: f64,

    /// Seed for a reproducible train/eval split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn to_config(&self, input_dir: PathBuf) -> MetadataConfig {
        MetadataConfig {
            input_dir,
            output_dir: self.output_dir.clone(),
            language: self.language.clone(),
            speaker_name: self.speaker_name.clone(),
            eval_percentage: self.eval_percentage,
            seed: self.seed,
            ..Default::default()
        }
    }
}

/// Человекочитаемый отчёт о результате.
pub fn render_summary(input_dir: Option<&std::path::Path>, summary: &DatasetSummary) -> String {
    let mut out = String::from("\nMetadata generation completed!\n");
    if let Some(dir) = input_dir {
        out.push_str(&format!("Input directory: {}\n", dir.display()));
    }
    let output_dir = summary
        .paths
        .train_csv
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    out.push_str(&format!("Output directory: {}\n", output_dir));
    out.push_str(&format!(
        "Total audio duration: {:.2} seconds\n",
        summary.total_duration_secs
    ));
    out.push_str(&format!("Train metadata: {}\n", summary.paths.train_csv.display()));
    out.push_str(&format!("Eval metadata: {}\n", summary.paths.eval_csv.display()));
    out.push_str(&format!("Train samples: {}\n", summary.train_count));
    out.push_str(&format!("Eval samples: {}\n", summary.eval_count));
    if summary.skipped > 0 {
        out.push_str(&format!("Skipped audio files: {}\n", summary.skipped));
    }
    out.push_str(&format!("Train JSON: {}\n", summary.paths.train_json.display()));
    out.push_str(&format!("Eval JSON: {}\n", summary.paths.eval_json.display()));
    out
}
