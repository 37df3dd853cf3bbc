//! Metadata-only dataset creation for XTTS training.
//!
//! Transcribes pre-processed audio with a Whisper endpoint and writes the
//! manifests without touching the audio files.

use std::process::ExitCode;

use clap::Parser;

use xtts_metadata::commands::render_summary;
use xtts_metadata::commands::transcription_commands::{create_metadata_only, MetadataOnlyArgs};
use xtts_metadata::utils::logger::init_logger;

#[tokio::main]
async fn main() -> ExitCode {
    let args = MetadataOnlyArgs::parse();
    init_logger(args.common.verbose);

    match create_metadata_only(&args).await {
        Ok(summary) => {
            println!("{}", render_summary(Some(args.input_dir.as_path()), &summary));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error during processing: {}", e);
            ExitCode::FAILURE
        }
    }
}
