//! Построение манифестов для дообучения XTTS.
//!
//! The crate maps audio files and their transcriptions (read from sibling
//! files or produced by a Whisper endpoint) into `metadata_train.csv` /
//! `metadata_eval.csv` plus their JSON twins.

pub mod commands;
pub mod config;
pub mod errors;
pub mod services;
pub mod utils;

pub use config::{AsrConfig, MetadataConfig};
pub use errors::{AppError, AppResult};
pub use services::metadata::{DatasetSummary, ManifestPaths, MetadataSample};
