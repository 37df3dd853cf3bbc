//! # Audio discovery and duration
//!
//! Поиск аудиофайлов в каталоге и вычисление их длительности.
//! WAV headers are read with `hound`; every other container is opened with
//! Symphonia, decoding the stream only when it does not declare a frame count.

use std::fs::File;
use std::path::{Path, PathBuf};

use hound::WavReader;
use log::{debug, warn};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use walkdir::WalkDir;

use crate::errors::{AppError, AppResult};
use crate::utils::common::extension_lowercase;

/// Extensions recognised as audio, lowercase.
pub const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "mp3", "flac", "ogg", "m4a"];

pub fn is_audio_file(path: &Path) -> bool {
    extension_lowercase(path)
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Recursively lists audio files under `dir`, sorted by path.
///
/// Hidden files and directories are skipped. When `contains` is set only
/// files whose name contains that substring are returned.
pub fn list_audios(dir: &Path, contains: Option<&str>) -> AppResult<Vec<PathBuf>> {
    let mut audios = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !is_audio_file(path) {
            continue;
        }

        if let Some(needle) = contains {
            if !entry.file_name().to_string_lossy().contains(needle) {
                continue;
            }
        }

        audios.push(path.to_path_buf());
    }

    audios.sort();
    debug!("Found {} audio files in {}", audios.len(), dir.display());
    Ok(audios)
}

/// Длительность аудиофайла в секундах.
pub fn audio_duration(path: &Path) -> AppResult<f64> {
    if extension_lowercase(path).as_deref() == Some("wav") {
        match wav_duration(path) {
            Ok(duration) => return Ok(duration),
            // hound не поддерживает часть WAV-вариантов, пробуем Symphonia
            Err(e) => debug!("hound could not read {}: {}, falling back to symphonia", path.display(), e),
        }
    }
    symphonia_duration(path)
}

fn wav_duration(path: &Path) -> AppResult<f64> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(AppError::AudioProcessing(format!(
            "Zero sample rate in {}",
            path.display()
        )));
    }
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

fn symphonia_duration(path: &Path) -> AppResult<f64> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension_lowercase(path) {
        hint.with_extension(&ext);
    }

    let format_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };
    let opened = symphonia::default::get_probe().format(
        &hint,
        mss,
        &format_opts,
        &MetadataOptions::default(),
    )?;

    let mut format = opened.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AppError::AudioProcessing(format!("No audio track found in {}", path.display()))
        })?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params.sample_rate.ok_or_else(|| {
        AppError::AudioProcessing(format!("Unknown sample rate in {}", path.display()))
    })?;
    if sample_rate == 0 {
        return Err(AppError::AudioProcessing(format!(
            "Zero sample rate in {}",
            path.display()
        )));
    }

    if let Some(n_frames) = codec_params.n_frames {
        return Ok(n_frames as f64 / sample_rate as f64);
    }

    // Контейнер не сообщает длину, считаем фреймы декодированием
    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())?;

    let mut frames: u64 = 0;
    while let Ok(packet) = format.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => frames += decoded.frames() as u64,
            Err(e) => {
                warn!("Skipping undecodable packet in {}: {}", path.display(), e);
                continue;
            }
        }
    }

    Ok(frames as f64 / sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..frames * channels as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("a.wav")));
        assert!(is_audio_file(Path::new("a.MP3")));
        assert!(is_audio_file(Path::new("dir/a.flac")));
        assert!(!is_audio_file(Path::new("a.txt")));
        assert!(!is_audio_file(Path::new("wav")));
    }

    #[test]
    fn test_list_audios_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join("b.wav"), b"").unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"").unwrap();
        std::fs::write(dir.path().join("sub/c.flac"), b"").unwrap();
        std::fs::write(dir.path().join(".hidden/d.wav"), b"").unwrap();
        std::fs::write(dir.path().join(".e.wav"), b"").unwrap();

        let audios = list_audios(dir.path(), None).unwrap();
        let names: Vec<_> = audios
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.wav", "sub/c.flac"]);

        let filtered = list_audios(dir.path(), Some("b")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].ends_with("b.wav"));
    }

    #[test]
    fn test_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.wav");
        write_wav(&path, 16000, 1, 24000);
        let duration = audio_duration(&path).unwrap();
        assert!((duration - 1.5).abs() < 1e-9);

        let stereo = dir.path().join("stereo.wav");
        write_wav(&stereo, 22050, 2, 22050);
        let duration = audio_duration(&stereo).unwrap();
        assert!((duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symphonia_duration_matches_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 8000, 1, 4000);
        let duration = symphonia_duration(&path).unwrap();
        assert!((duration - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_audio_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"not audio at all").unwrap();
        assert!(audio_duration(&path).is_err());
    }
}
