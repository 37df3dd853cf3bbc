//! Запись манифестов: CSV с разделителем `|`, JSON-копии и `lang.txt`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::{ManifestPaths, MetadataSample};
use crate::errors::AppResult;

pub const TRAIN_CSV: &str = "metadata_train.csv";
pub const EVAL_CSV: &str = "metadata_eval.csv";
pub const LANG_FILE: &str = "lang.txt";
pub const DELIMITER: u8 = b'|';

/// JSON twin of a CSV manifest: same stem, `.json` extension.
pub fn json_path_for(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("json")
}

/// Writes the train/eval manifests and `lang.txt` into `out_dir`.
pub fn write_manifests(
    out_dir: &Path,
    train: &[MetadataSample],
    eval: &[MetadataSample],
    language: &str,
) -> AppResult<ManifestPaths> {
    std::fs::create_dir_all(out_dir)?;

    let train_csv = out_dir.join(TRAIN_CSV);
    let eval_csv = out_dir.join(EVAL_CSV);

    write_csv(&train_csv, train)?;
    write_csv(&eval_csv, eval)?;

    let train_json = json_path_for(&train_csv);
    let eval_json = json_path_for(&eval_csv);
    write_json(&train_json, train)?;
    write_json(&eval_json, eval)?;

    let lang_file = out_dir.join(LANG_FILE);
    std::fs::write(&lang_file, format!("{}\n", language))?;

    info!(
        "Wrote {} train / {} eval samples to {}",
        train.len(),
        eval.len(),
        out_dir.display()
    );

    Ok(ManifestPaths {
        train_csv,
        eval_csv,
        train_json,
        eval_json,
        lang_file,
    })
}

fn write_csv(path: &Path, samples: &[MetadataSample]) -> AppResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_path(path)?;

    // Заголовок пишется явно, чтобы пустой сплит тоже его получил
    writer.write_record(["audio_file", "text", "speaker_name"])?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, samples: &[MetadataSample]) -> AppResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, samples)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads a manifest back; used for the run summary and by tests.
pub fn read_csv(path: &Path) -> AppResult<Vec<MetadataSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_path(path)?;

    let mut samples = Vec::new();
    for record in reader.deserialize() {
        samples.push(record?);
    }
    Ok(samples)
}
