// Error handling module
// Contains the error type shared by the formatter, audio and transcription services

use thiserror::Error;
use tokio::sync::mpsc::error::SendError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No audio files found in {0}")]
    NoAudioFiles(String),

    #[error("No usable samples found in {0}")]
    NoSamples(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Api(err.to_string())
    }
}

impl From<hound::Error> for AppError {
    fn from(err: hound::Error) -> Self {
        AppError::AudioProcessing(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for AppError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AppError::AudioProcessing(err.to_string())
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::Io(err.into())
    }
}

impl<T> From<SendError<T>> for AppError {
    fn from(err: SendError<T>) -> Self {
        AppError::Other(anyhow::anyhow!("Failed to send progress: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
