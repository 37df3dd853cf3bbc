use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info, warn};

use super::Transcriber;
use crate::errors::AppResult;
use crate::utils::common::check_file_exists_and_valid;

/// Reuses a stored transcript when present, otherwise asks the inner
/// transcriber and stores its answer.
///
/// Transcripts mirror the audio layout: `<root>/alice/take1.wav` is cached as
/// `<dir>/alice/take1.wav.txt`, so files sharing a name in different
/// directories (or differing only by extension) never share an entry.
pub struct CachedTranscriber<T> {
    inner: T,
    dir: Option<PathBuf>,
    root: Option<PathBuf>,
}

impl<T: Transcriber> CachedTranscriber<T> {
    pub fn new(inner: T, dir: Option<PathBuf>) -> Self {
        Self {
            inner,
            dir,
            root: None,
        }
    }

    /// Directory the audio paths are made relative to, usually the input dir.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn relative_key(&self, audio: &Path) -> PathBuf {
        let relative = self
            .root
            .as_deref()
            .and_then(|root| audio.strip_prefix(root).ok())
            .unwrap_or(audio);

        // Вне корня: полный путь без корневых/родительских компонентов
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect()
    }

    fn cache_path(&self, dir: &Path, audio: &Path) -> PathBuf {
        let key = self.relative_key(audio);
        let file_name = key
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        dir.join(&key).with_file_name(format!("{}.txt", file_name))
    }
}

#[async_trait]
impl<T: Transcriber> Transcriber for CachedTranscriber<T> {
    async fn transcribe(&self, audio: &Path, language: &str) -> AppResult<String> {
        let Some(dir) = &self.dir else {
            return self.inner.transcribe(audio, language).await;
        };

        let cache_path = self.cache_path(dir, audio);
        if check_file_exists_and_valid(&cache_path).await {
            info!("Found existing transcription: {}", cache_path.display());
            return Ok(tokio::fs::read_to_string(&cache_path).await?);
        }

        let text = self.inner.transcribe(audio, language).await?;

        // Ошибка кэша не должна терять уже полученную транскрипцию
        if let Err(e) = store(&cache_path, &text).await {
            warn!("Failed to cache transcription at {}: {}", cache_path.display(), e);
        } else {
            debug!("Saved transcription to {}", cache_path.display());
        }
        Ok(text)
    }
}

async fn store(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTranscriber {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transcriber for CountingTranscriber {
        async fn transcribe(&self, audio: &Path, _language: &str) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let parent = audio
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            Ok(format!(
                "{} by {}",
                audio.file_stem().unwrap().to_string_lossy(),
                parent
            ))
        }
    }

    fn counting() -> CountingTranscriber {
        CountingTranscriber {
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_backend() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("transcripts");
        let cached = CachedTranscriber::new(counting(), Some(cache_dir.clone())).with_root("/data");

        let audio = Path::new("/data/clip01.wav");
        assert_eq!(cached.transcribe(audio, "en").await.unwrap(), "clip01 by data");
        assert_eq!(cached.transcribe(audio, "en").await.unwrap(), "clip01 by data");
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            std::fs::read_to_string(cache_dir.join("clip01.wav.txt")).unwrap(),
            "clip01 by data"
        );
    }

    #[tokio::test]
    async fn test_same_stem_in_different_dirs_kept_apart() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("transcripts");
        let cached = CachedTranscriber::new(counting(), Some(cache_dir.clone())).with_root("/data");

        let alice = Path::new("/data/alice/take1.wav");
        let bob = Path::new("/data/bob/take1.wav");
        assert_eq!(cached.transcribe(alice, "en").await.unwrap(), "take1 by alice");
        assert_eq!(cached.transcribe(bob, "en").await.unwrap(), "take1 by bob");
        assert_eq!(cached.transcribe(bob, "en").await.unwrap(), "take1 by bob");
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);

        assert!(cache_dir.join("alice/take1.wav.txt").is_file());
        assert!(cache_dir.join("bob/take1.wav.txt").is_file());
    }

    #[tokio::test]
    async fn test_same_stem_different_extension_kept_apart() {
        let dir = tempfile::tempdir().unwrap();
        let cached = CachedTranscriber::new(counting(), Some(dir.path().to_path_buf()));

        cached.transcribe(Path::new("/data/a.wav"), "en").await.unwrap();
        cached.transcribe(Path::new("/data/a.mp3"), "en").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        // без корня ключом служит полный путь
        assert!(dir.path().join("data/a.wav.txt").is_file());
        assert!(dir.path().join("data/a.mp3.txt").is_file());
    }

    #[tokio::test]
    async fn test_cache_write_failure_keeps_text() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("transcripts");
        std::fs::write(&not_a_dir, "regular file").unwrap();

        let cached = CachedTranscriber::new(counting(), Some(not_a_dir.clone())).with_root("/data");
        let text = cached
            .transcribe(Path::new("/data/clip03.wav"), "en")
            .await
            .unwrap();
        assert_eq!(text, "clip03 by data");
        assert!(not_a_dir.is_file());
    }

    #[tokio::test]
    async fn test_without_dir_always_calls_backend() {
        let cached = CachedTranscriber::new(counting(), None);
        let audio = Path::new("/data/clip02.wav");
        cached.transcribe(audio, "en").await.unwrap();
        cached.transcribe(audio, "en").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }
}
