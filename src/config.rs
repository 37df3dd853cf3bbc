//! Конфигурация запуска
//!
//! Run configuration for both metadata tools. The CLI builds these structs
//! from its arguments; library users can construct them directly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// OpenAI transcription endpoint, used when no other server is configured.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Settings shared by both metadata tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Directory scanned (recursively) for audio files
    pub input_dir: PathBuf,
    /// Directory receiving the CSV/JSON manifests and `lang.txt`
    pub output_dir: PathBuf,
    /// Language code written to `lang.txt` and passed to ASR
    pub language: String,
    /// Value of the `speaker_name` column
    pub speaker_name: String,
    /// Share of samples put into the eval split, in `[0.0, 1.0)`
    pub eval_percentage: f64,
    /// Seed for a reproducible train/eval split
    pub seed: Option<u64>,
    /// Extension of the transcript files paired with the audio
    pub transcript_extension: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            language: "en".to_string(),
            speaker_name: "coqui".to_string(),
            eval_percentage: 0.15,
            seed: None,
            transcript_extension: ".txt".to_string(),
        }
    }
}

impl MetadataConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Checks the settings and normalises the transcript extension.
    pub fn validate(&mut self) -> AppResult<()> {
        if !self.input_dir.is_dir() {
            return Err(AppError::Configuration(format!(
                "Input directory '{}' does not exist!",
                self.input_dir.display()
            )));
        }

        if !self.eval_percentage.is_finite()
            || self.eval_percentage < 0.0
            || self.eval_percentage >= 1.0
        {
            return Err(AppError::Configuration(format!(
                "eval_percentage must be within [0.0, 1.0), got {}",
                self.eval_percentage
            )));
        }

        self.language = self.language.trim().to_string();
        if self.language.is_empty() {
            return Err(AppError::Configuration("language must not be empty".to_string()));
        }

        self.speaker_name = self.speaker_name.trim().to_string();
        if self.speaker_name.is_empty() {
            return Err(AppError::Configuration("speaker_name must not be empty".to_string()));
        }
        if self.speaker_name.contains('|') {
            return Err(AppError::Configuration(
                "speaker_name must not contain the '|' delimiter".to_string(),
            ));
        }

        let ext = self.transcript_extension.trim();
        if ext.is_empty() || ext == "." {
            return Err(AppError::Configuration(
                "transcript_extension must not be empty".to_string(),
            ));
        }
        self.transcript_extension = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{}", ext)
        };

        Ok(())
    }
}

/// Settings of the Whisper transcription backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrConfig {
    /// Model name sent with every request
    pub whisper_model: String,
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
    /// Bearer token; optional for self-hosted servers
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    /// Cache of `<stem>.txt` transcripts reused between runs
    pub transcripts_dir: Option<PathBuf>,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            whisper_model: "whisper-1".to_string(),
            api_base: OPENAI_API_BASE.to_string(),
            api_key: None,
            request_timeout_secs: 300,
            transcripts_dir: None,
        }
    }
}

impl AsrConfig {
    pub fn is_openai(&self) -> bool {
        self.api_base.trim_end_matches('/') == OPENAI_API_BASE
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.whisper_model.trim().is_empty() {
            return Err(AppError::Configuration("whisper_model must not be empty".to_string()));
        }

        let has_key = self
            .api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false);
        if self.is_openai() && !has_key {
            return Err(AppError::Configuration(
                "OpenAI API key is required for transcription (set --api_key or OPENAI_API_KEY)"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of the transcription endpoint.
    pub fn transcriptions_url(&self) -> String {
        format!("{}/audio/transcriptions", self.api_base.trim_end_matches('/'))
    }
}
