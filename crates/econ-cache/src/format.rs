//! Frame encode/decode for the supported cache formats.
//!
//! One [`CacheFormat`] is chosen per series at configuration time and used
//! for every read and write of that series afterwards.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use econ_core::{CacheFormat, DataError, Result};

/// Writes `frame` to `path` in the given format.
///
/// The caller owns path hygiene; this function encodes to exactly the path
/// it is given (the atomic store points it at a temporary file).
pub fn write_frame(frame: &mut DataFrame, path: &Path, format: CacheFormat) -> Result<()> {
    let file = File::create(path)
        .map_err(|err| DataError::Storage(format!("creating {}: {err}", path.display())))?;

    let encoded = match format {
        CacheFormat::Parquet => ParquetWriter::new(file).finish(frame).map(|_| ()),
        CacheFormat::Feather => IpcWriter::new(file).finish(frame),
        CacheFormat::Csv => CsvWriter::new(file).finish(frame),
    };
    encoded.map_err(|err| DataError::Format(format!("encoding {}: {err}", path.display())))
}

/// Reads a frame back from `path` in the given format.
pub fn read_frame(path: &Path, format: CacheFormat) -> Result<DataFrame> {
    let decoded = match format {
        CacheFormat::Parquet => {
            let file = open(path)?;
            ParquetReader::new(file).finish()
        }
        CacheFormat::Feather => {
            let file = open(path)?;
            IpcReader::new(file).finish()
        }
        CacheFormat::Csv => CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish()),
    };
    decoded.map_err(|err| DataError::Format(format!("decoding {}: {err}", path.display())))
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|err| DataError::Storage(format!("opening {}: {err}", path.display())))
}
