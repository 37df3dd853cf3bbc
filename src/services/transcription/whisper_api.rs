use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::Transcriber;
use crate::config::AsrConfig;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper behind an OpenAI-compatible HTTP API.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl WhisperApiTranscriber {
    pub fn new(config: &AsrConfig) -> AppResult<Self> {
        config.validate()?;

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs));
        // Локальный сервер не должен идти через системный прокси
        if is_loopback(&config.transcriptions_url()) {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        info!(
            "Using Whisper model '{}' at {}",
            config.whisper_model,
            config.transcriptions_url()
        );

        Ok(Self {
            client,
            url: config.transcriptions_url(),
            model: config.whisper_model.clone(),
            api_key: config
                .api_key
                .as_ref()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        })
    }
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|host| {
            host == "localhost"
                || host
                    .trim_matches(|c| c == '[' || c == ']')
                    .parse::<std::net::IpAddr>()
                    .map(|ip| ip.is_loopback())
                    .unwrap_or(false)
        })
        .unwrap_or(false)
}

fn mime_for(audio: &Path) -> &'static str {
    match crate::utils::common::extension_lowercase(audio).as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Parses the `json` response format: `{"text": "..."}`.
fn parse_response(body: &str) -> AppResult<String> {
    let parsed: TranscriptionResponse = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        AppError::Transcription(format!("Unexpected response ({}): {}", e, preview))
    })?;
    Ok(parsed.text)
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, audio: &Path, language: &str) -> AppResult<String> {
        let file_content = tokio::fs::read(audio).await?;
        let filename = audio
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::Transcription(format!("Invalid audio path: {}", audio.display())))?;

        debug!("Uploading {} ({} bytes)", filename, file_content.len());

        let part = Part::bytes(file_content)
            .file_name(filename)
            .mime_str(mime_for(audio))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "json")
            .text("language", language.to_string());

        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to connect to transcription API: {}", e);
            AppError::Api(format!("Failed to connect to transcription API: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Transcription API error: HTTP {}", status);
            return Err(AppError::Api(format!(
                "API request failed (HTTP {}): {}",
                status, body
            )));
        }

        parse_response(&body)
    }
}
