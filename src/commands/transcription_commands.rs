use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use tokio::sync::mpsc;

use super::CommonArgs;
use crate::config::{AsrConfig, OPENAI_API_BASE};
use crate::errors::{AppError, AppResult};
use crate::services::audio::list_audios;
use crate::services::metadata::{format_audio_metadata_only, DatasetSummary};
use crate::services::transcription::{
    CachedTranscriber, Transcriber, TranscriptionProgress, WhisperApiTranscriber,
};

/// Create metadata-only dataset for XTTS training
#[derive(Debug, Clone, Parser)]
#[command(name = "create-metadata-only", version, about, long_about = None)]
pub struct MetadataOnlyArgs {
    /// Directory containing pre-processed audio files
    #[arg(long = "input_dir")]
    pub input_dir: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Whisper model name understood by the transcription server
    #[arg(long = "whisper_model", default_value = "whisper-1")]
    pub whisper_model: String,

    /// Base URL of an OpenAI-compatible transcription API
    #[arg(long = "api_base", default_value = OPENAI_API_BASE)]
    pub api_base: String,

    /// API key for the transcription server
    #[arg(long = "api_key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "request_timeout", default_value_t = 300)]
    pub request_timeout: u64,

    /// Directory caching one transcript per audio file between runs
    #[arg(long = "transcripts_dir")]
    pub transcripts_dir: Option<PathBuf>,
}

impl MetadataOnlyArgs {
    pub fn asr_config(&self) -> AsrConfig {
        AsrConfig {
            whisper_model: self.whisper_model.clone(),
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            request_timeout_secs: self.request_timeout,
            transcripts_dir: self.transcripts_dir.clone(),
        }
    }
}

/// Runs the ASR flow with the Whisper API backend.
pub async fn create_metadata_only(args: &MetadataOnlyArgs) -> AppResult<DatasetSummary> {
    let asr = args.asr_config();
    info!("Loading Whisper backend: {}", asr.whisper_model);
    let transcriber = CachedTranscriber::new(
        WhisperApiTranscriber::new(&asr)?,
        asr.transcripts_dir.clone(),
    )
    .with_root(args.input_dir.clone());
    create_metadata_with(args, &transcriber).await
}

/// Runs the ASR flow with any transcriber.
pub async fn create_metadata_with<T>(
    args: &MetadataOnlyArgs,
    transcriber: &T,
) -> AppResult<DatasetSummary>
where
    T: Transcriber + ?Sized,
{
    let mut config = args.common.to_config(args.input_dir.clone());
    config.validate()?;

    std::fs::create_dir_all(&config.output_dir)?;

    info!("Scanning for audio files in: {}", config.input_dir.display());
    let audio_files = list_audios(&config.input_dir, None)?;
    if audio_files.is_empty() {
        return Err(AppError::NoAudioFiles(config.input_dir.display().to_string()));
    }
    info!("Found {} audio files", audio_files.len());

    let (tx, mut rx) = mpsc::channel::<TranscriptionProgress>(16);
    let progress_logger = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            info!(
                "[{}/{}] Transcribing {}",
                progress.current,
                progress.total,
                progress.file.display()
            );
        }
    });

    info!("Generating metadata files...");
    let result = format_audio_metadata_only(&audio_files, transcriber, &config, Some(tx)).await;
    if let Err(e) = progress_logger.await {
        warn!("Progress reporting task failed: {}", e);
    }
    result
}
