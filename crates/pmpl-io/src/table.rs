//! Comma-delimited numeric tables.
//!
//! Values are written with 17 significant digits so that every `f64`
//! survives a write/read cycle unchanged. On read, blank lines and lines
//! starting with `#` are skipped; every remaining line must carry the same
//! number of columns.

use crate::layout::display;
use ndarray::Array2;
use pmpl_types::error::{PmplError, PmplResult};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// One parsed line with its 1-based line number in the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record {
    pub line: usize,
    pub values: Vec<f64>,
}

pub(crate) fn parse_records(text: &str, source: &str) -> PmplResult<Vec<Record>> {
    let mut records: Vec<Record> = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let values = trimmed
            .split(',')
            .map(|field| {
                let field = field.trim();
                field.parse::<f64>().map_err(|e| PmplError::Parse {
                    path: source.to_string(),
                    line,
                    message: format!("'{field}': {e}"),
                })
            })
            .collect::<PmplResult<Vec<f64>>>()?;
        if let Some(first) = records.first() {
            if first.values.len() != values.len() {
                return Err(PmplError::Parse {
                    path: source.to_string(),
                    line,
                    message: format!(
                        "expected {} columns, found {}",
                        first.values.len(),
                        values.len()
                    ),
                });
            }
        }
        records.push(Record { line, values });
    }
    Ok(records)
}

/// Parse table text. A table without records is `0 × 0`.
pub fn parse_table(text: &str, source: &str) -> PmplResult<Array2<f64>> {
    let records = parse_records(text, source)?;
    let rows = records.len();
    let cols = records.first().map_or(0, |r| r.values.len());
    let flat: Vec<f64> = records.into_iter().flat_map(|r| r.values).collect();
    Array2::from_shape_vec((rows, cols), flat)
        .map_err(|e| PmplError::InvalidInput(format!("{source}: table shape: {e}")))
}

pub fn read_table(path: impl AsRef<Path>) -> PmplResult<Array2<f64>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let table = parse_table(&text, &display(path))?;
    debug!(path = %path.display(), rows = table.nrows(), cols = table.ncols(), "read table");
    Ok(table)
}

/// Write one comma-separated record.
pub fn format_row<W: Write>(out: &mut W, values: &[f64]) -> io::Result<()> {
    for (k, v) in values.iter().enumerate() {
        if k > 0 {
            out.write_all(b",")?;
        }
        write!(out, "{v:.16e}")?;
    }
    out.write_all(b"\n")
}

pub fn write_table<P, R>(path: P, rows: &[R]) -> PmplResult<()>
where
    P: AsRef<Path>,
    R: AsRef<[f64]>,
{
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    for row in rows {
        format_row(&mut out, row.as_ref())?;
    }
    out.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}
