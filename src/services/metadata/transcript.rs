//! Pairing audio files with sibling transcript files.

use std::path::{Path, PathBuf};

use crate::errors::AppResult;
use crate::utils::common::normalize_text;

/// Sibling transcript path: `clip01.wav` + `.txt` → `clip01.txt`.
pub fn transcript_path_for(audio: &Path, extension: &str) -> PathBuf {
    let stem = audio
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    audio.with_file_name(format!("{}{}", stem, extension))
}

/// Reads and normalises a transcript. `None` when the file holds no text.
pub fn read_transcript(path: &Path) -> AppResult<Option<String>> {
    let bytes = std::fs::read(path)?;
    let text = normalize_text(&String::from_utf8_lossy(&bytes));
    Ok(if text.is_empty() { None } else { Some(text) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_path_for() {
        assert_eq!(
            transcript_path_for(Path::new("/data/clip01.wav"), ".txt"),
            PathBuf::from("/data/clip01.txt")
        );
        assert_eq!(
            transcript_path_for(Path::new("/data/take.2.flac"), ".lab"),
            PathBuf::from("/data/take.2.lab")
        );
    }

    #[test]
    fn test_read_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let full = dir.path().join("full.txt");
        let blank = dir.path().join("blank.txt");
        std::fs::write(&full, "\u{feff}Hello,\n  world!\n").unwrap();
        std::fs::write(&blank, "\n \n").unwrap();

        assert_eq!(read_transcript(&full).unwrap(), Some("Hello, world!".to_string()));
        assert_eq!(read_transcript(&blank).unwrap(), None);
        assert!(read_transcript(&dir.path().join("missing.txt")).is_err());
    }
}
