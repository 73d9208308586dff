//! CSV persistence of a completed results table.

use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use tracing::{info, instrument};

use crate::{error::SinkError, model::ModelId, table::ResultsTable};

/// File name used for a model's results, `Modelo_<id>.csv`.
///
/// # Examples
/// ```
/// use grafsim_core::{ModelId, output_file_name};
///
/// assert_eq!(output_file_name(ModelId::WsP05), "Modelo_WS_P05.csv");
/// ```
#[must_use]
pub fn output_file_name(model: ModelId) -> String {
    format!("Modelo_{model}.csv")
}

/// Writes `table` as CSV: a header row, then one record per trial key. Undefined
/// cells are written as `NaN`.
///
/// # Errors
/// Returns [`SinkError::Csv`] when a record cannot be written or flushed.
pub fn write_csv<W: io::Write>(table: &ResultsTable, writer: W) -> Result<(), SinkError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.header())?;
    for record in table.records() {
        csv.write_record(&record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes `table` to `dir/Modelo_<model>.csv`, creating `dir` if needed, and
/// returns the path written.
///
/// # Errors
/// Returns [`SinkError::Io`] when the directory or file cannot be created and
/// [`SinkError::Csv`] when writing fails.
#[instrument(name = "core.persist", err, skip(table), fields(rows = table.len()))]
pub fn persist(table: &ResultsTable, dir: &Path, model: ModelId) -> Result<PathBuf, SinkError> {
    fs::create_dir_all(dir).map_err(|source| SinkError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(output_file_name(model));
    let file = File::create(&path).map_err(|source| SinkError::Io {
        path: path.clone(),
        source,
    })?;
    write_csv(table, BufWriter::new(file))?;
    info!(path = %path.display(), rows = table.len(), "results written");
    Ok(path)
}
