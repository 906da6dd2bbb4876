//! `omega,steps` tables produced by the relaxation sweep.

use crate::layout::display;
use crate::table::{parse_records, write_table};
use pmpl_math::optimum::RelaxationSample;
use pmpl_types::error::{PmplError, PmplResult};
use std::fs;
use std::path::Path;

/// Parse `omega,steps` rows. Steps must be non-negative integers.
pub fn parse_relaxation_table(text: &str, source: &str) -> PmplResult<Vec<RelaxationSample>> {
    let records = parse_records(text, source)?;
    records
        .into_iter()
        .map(|record| {
            let parse_error = |message: String| PmplError::Parse {
                path: source.to_string(),
                line: record.line,
                message,
            };
            if record.values.len() < 2 {
                return Err(parse_error(format!(
                    "expected omega,steps, found {} column(s)",
                    record.values.len()
                )));
            }
            let (omega, steps) = (record.values[0], record.values[1]);
            if !omega.is_finite() {
                return Err(parse_error(format!("omega must be finite, got {omega}")));
            }
            if !steps.is_finite() || steps < 0.0 || steps.fract() != 0.0 || steps > u64::MAX as f64
            {
                return Err(parse_error(format!(
                    "steps must be a non-negative integer, got {steps}"
                )));
            }
            Ok(RelaxationSample::new(omega, steps as u64))
        })
        .collect()
}

pub fn read_relaxation_table(path: impl AsRef<Path>) -> PmplResult<Vec<RelaxationSample>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    parse_relaxation_table(&text, &display(path))
}

pub fn write_relaxation_table(
    path: impl AsRef<Path>,
    samples: &[RelaxationSample],
) -> PmplResult<()> {
    let rows: Vec<[f64; 2]> = samples
        .iter()
        .map(|s| [s.omega, s.steps as f64])
        .collect();
    write_table(path, &rows)
}
