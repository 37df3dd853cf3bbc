pub mod audio;
pub mod metadata;
pub mod transcription;
