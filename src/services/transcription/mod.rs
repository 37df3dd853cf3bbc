//! Транскрибация аудио через Whisper
//!
//! `Transcriber` is the seam between the metadata formatter and the ASR
//! backend. `WhisperApiTranscriber` talks to any OpenAI-compatible
//! `/audio/transcriptions` endpoint; `CachedTranscriber` keeps per-file
//! results on disk so an interrupted run can be resumed.

mod cache;
mod whisper_api;

pub use cache::CachedTranscriber;
pub use whisper_api::WhisperApiTranscriber;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionProgress {
    /// 1-based index of the file being transcribed
    pub current: usize,
    pub total: usize,
    pub file: PathBuf,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Returns the raw transcription of `audio` in `language`.
    async fn transcribe(&self, audio: &Path, language: &str) -> AppResult<String>;
}

