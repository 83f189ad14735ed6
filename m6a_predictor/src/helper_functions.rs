use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

/// Read a feature table from a headered CSV file.
///
/// Categorical and sequence columns are read as strings; the pipeline casts
/// numeric columns itself, so integer/float inference does not matter.
pub fn read_feature_csv<P: AsRef<Path>>(path: P) -> PolarsResult<DataFrame> {
    let path = path.as_ref();
    info!("Reading features from {}", path.display());
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

/// Write a scored table to CSV, creating parent directories as needed.
pub fn write_predictions_csv<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> PolarsResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;

    info!("Predictions saved to {}", path.display());
    Ok(())
}
