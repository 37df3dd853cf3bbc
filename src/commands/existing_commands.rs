use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{render_summary, CommonArgs};
use crate::errors::AppResult;
use crate::services::metadata::{format_existing_dataset, DatasetSummary};

/// Create metadata from existing processed audio + transcription files
#[derive(Debug, Clone, Parser)]
#[command(name = "create-metadata-from-existing", version, about, long_about = None)]
pub struct ExistingArgs {
    /// Directory containing processed audio files and their transcription files
    #[arg(long = "input_dir")]
    pub input_dir: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Extension of the transcript files that pair with the audio
    #[arg(long = "transcript_extension", default_value = ".txt")]
    pub transcript_extension: String,
}

pub fn create_metadata_from_existing(args: &ExistingArgs) -> AppResult<DatasetSummary> {
    let mut config = args.common.to_config(args.input_dir.clone());
    config.transcript_extension = args.transcript_extension.clone();
    config.validate()?;

    std::fs::create_dir_all(&config.output_dir)?;

    info!("Scanning for audio files in: {}", config.input_dir.display());
    info!("Generating metadata files from existing dataset...");
    format_existing_dataset(&config)
}

/// Текст для stdout после успешного запуска.
pub fn report(args: &ExistingArgs, summary: &DatasetSummary) -> String {
    let mut out = render_summary(Some(args.input_dir.as_path()), summary);
    out.push_str(&format!(
        "\nExpected file structure in {}:\n",
        args.input_dir.display()
    ));
    let ext = args.transcript_extension.trim();
    let ext = if ext.starts_with('.') { ext.to_string() } else { format!(".{}", ext) };
    out.push_str("   audio1.wav\n");
    out.push_str(&format!("   audio1{}  (contains transcription)\n", ext));
    out.push_str("   audio2.wav\n");
    out.push_str(&format!("   audio2{}  (contains transcription)\n", ext));
    out.push_str("   ...\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_defaults() {
        let args = ExistingArgs::try_parse_from([
            "create-metadata-from-existing",
            "--input_dir",
            "/data/in",
            "--output_dir",
            "/data/out",
        ])
        .unwrap();

        assert_eq!(args.input_dir, PathBuf::from("/data/in"));
        assert_eq!(args.common.output_dir, PathBuf::from("/data/out"));
        assert_eq!(args.common.language, "en");
        assert_eq!(args.common.speaker_name, "coqui");
        assert_eq!(args.common.eval_percentage, 0.15);
        assert_eq!(args.transcript_extension, ".txt");
    }

    #[test]
    fn test_parse_args_requires_dirs() {
        assert!(ExistingArgs::try_parse_from(["create-metadata-from-existing"]).is_err());
        assert!(
            ExistingArgs::try_parse_from(["create-metadata-from-existing", "--input_dir", "x"])
                .is_err()
        );
    }

    #[test]
    fn test_missing_input_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExistingArgs::try_parse_from([
            "create-metadata-from-existing",
            "--input_dir",
            "/no/such/dir",
            "--output_dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();

        let err = create_metadata_from_existing(&args).unwrap_err();
        assert!(err.to_string().contains("Input directory '/no/such/dir' does not exist!"));
    }
}
