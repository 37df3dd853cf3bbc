//! Simple metadata generator for existing processed audio datasets.
//!
//! Maps audio files and their sibling transcription files to XTTS manifests.
//! No audio processing or transcription.

use std::process::ExitCode;

use clap::Parser;

use xtts_metadata::commands::existing_commands::{create_metadata_from_existing, report, ExistingArgs};
use xtts_metadata::utils::logger::init_logger;

fn main() -> ExitCode {
    let args = ExistingArgs::parse();
    init_logger(args.common.verbose);

    match create_metadata_from_existing(&args) {
        Ok(summary) => {
            println!("{}", report(&args, &summary));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error during processing: {}", e);
            ExitCode::FAILURE
        }
    }
}
