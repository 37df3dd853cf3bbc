//! # Metadata formatter
//!
//! Сопоставляет аудиофайлы с транскрипциями и пишет манифесты train/eval.
//!
//! Two entry points share the split and writer:
//!
//! - [`format_existing_dataset`] pairs each audio file with a sibling
//!   transcript file;
//! - [`format_audio_metadata_only`] asks a [`Transcriber`] for the text.
//!
//! Audio files are never modified; the manifests reference them by absolute path.

pub mod split;
pub mod transcript;
pub mod writer;

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

use crate::config::MetadataConfig;
use crate::errors::{AppError, AppResult};
use crate::services::audio::{audio_duration, list_audios};
use crate::services::transcription::{Transcriber, TranscriptionProgress};
use crate::utils::common::normalize_text;

pub use split::split_samples;
pub use transcript::{read_transcript, transcript_path_for};
pub use writer::{json_path_for, read_csv, write_manifests};

/// One manifest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSample {
    pub audio_file: String,
    pub text: String,
    pub speaker_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
    pub train_csv: PathBuf,
    pub eval_csv: PathBuf,
    pub train_json: PathBuf,
    pub eval_json: PathBuf,
    pub lang_file: PathBuf,
}

/// Result of one formatter run.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub paths: ManifestPaths,
    pub total_duration_secs: f64,
    pub train_count: usize,
    pub eval_count: usize,
    /// Audio files left out (no transcript, empty text, unreadable audio)
    pub skipped: usize,
}

fn absolute(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Accumulates samples and their duration before the split.
struct SampleCollector<'a> {
    config: &'a MetadataConfig,
    samples: Vec<MetadataSample>,
    total_duration: f64,
    skipped: usize,
}

impl<'a> SampleCollector<'a> {
    fn new(config: &'a MetadataConfig) -> Self {
        Self {
            config,
            samples: Vec::new(),
            total_duration: 0.0,
            skipped: 0,
        }
    }

    fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Adds a sample; an unreadable audio file is skipped instead.
    fn push(&mut self, audio: &Path, text: String) {
        let duration = match audio_duration(audio) {
            Ok(d) => d,
            Err(e) => {
                warn!("Skipping {}: {}", audio.display(), e);
                self.skipped += 1;
                return;
            }
        };

        debug!("{} ({:.2}s): {}", audio.display(), duration, text);
        self.total_duration += duration;
        self.samples.push(MetadataSample {
            audio_file: absolute(audio),
            text,
            speaker_name: self.config.speaker_name.clone(),
        });
    }

    fn finish(self) -> AppResult<DatasetSummary> {
        if self.samples.is_empty() {
            return Err(AppError::NoSamples(self.config.input_dir.display().to_string()));
        }

        let (train, eval) = split_samples(
            self.samples,
            self.config.eval_percentage,
            self.config.seed,
        );
        let paths = write_manifests(&self.config.output_dir, &train, &eval, &self.config.language)?;

        Ok(DatasetSummary {
            paths,
            total_duration_secs: self.total_duration,
            train_count: train.len(),
            eval_count: eval.len(),
            skipped: self.skipped,
        })
    }
}

/// Builds manifests from audio files paired with sibling transcript files.
pub fn format_existing_dataset(config: &MetadataConfig) -> AppResult<DatasetSummary> {
    let audio_files = list_audios(&config.input_dir, None)?;
    info!("Found {} audio files in {}", audio_files.len(), config.input_dir.display());

    let mut collector = SampleCollector::new(config);
    for audio in &audio_files {
        let transcript_path = transcript_path_for(audio, &config.transcript_extension);
        match read_transcript(&transcript_path) {
            Ok(Some(text)) => collector.push(audio, text),
            Ok(None) => {
                warn!("Empty transcript: {}", transcript_path.display());
                collector.skip();
            }
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No transcript for {} (expected {})", audio.display(), transcript_path.display());
                collector.skip();
            }
            // Нечитаемая транскрипция пропускается, как и остальные ошибки по файлу
            Err(e) => {
                warn!("Skipping {}: cannot read {}: {}", audio.display(), transcript_path.display(), e);
                collector.skip();
            }
        }
    }

    collector.finish()
}

/// Builds manifests by transcribing every file with `transcriber`.
///
/// Files are processed one at a time. A failed transcription is logged and
/// the file skipped; the run only fails when no sample is left.
pub async fn format_audio_metadata_only<T>(
    audio_files: &[PathBuf],
    transcriber: &T,
    config: &MetadataConfig,
    progress_sender: Option<Sender<TranscriptionProgress>>,
) -> AppResult<DatasetSummary>
where
    T: Transcriber + ?Sized,
{
    let total = audio_files.len();
    let mut collector = SampleCollector::new(config);

    for (index, audio) in audio_files.iter().enumerate() {
        if let Some(sender) = &progress_sender {
            sender
                .send(TranscriptionProgress {
                    current: index + 1,
                    total,
                    file: audio.clone(),
                })
                .await?;
        }

        let text = match transcriber.transcribe(audio, &config.language).await {
            Ok(raw) => normalize_text(&raw),
            Err(e) => {
                warn!("Transcription failed for {}: {}", audio.display(), e);
                collector.skip();
                continue;
            }
        };

        if text.is_empty() {
            warn!("Empty transcription for {}", audio.display());
            collector.skip();
            continue;
        }

        collector.push(audio, text);
    }

    collector.finish()
}
