//! JSON snapshot of a solved SOR field: `{"phi": [[..]], "x": [..], "y": [..]}`.

use crate::layout::display;
use ndarray::Array2;
use pmpl_types::error::{PmplError, PmplResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// `phi[j][i]` is the value at `(x[i], y[j])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SorSnapshot {
    pub phi: Vec<Vec<f64>>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SorSnapshot {
    pub fn from_field(phi: &Array2<f64>, x: Vec<f64>, y: Vec<f64>) -> PmplResult<Self> {
        let (ny, nx) = phi.dim();
        if x.len() != nx || y.len() != ny {
            return Err(PmplError::InvalidInput(format!(
                "snapshot axes ({}, {}) do not match field shape ({ny}, {nx})",
                x.len(),
                y.len()
            )));
        }
        Ok(SorSnapshot {
            phi: phi.outer_iter().map(|row| row.to_vec()).collect(),
            x,
            y,
        })
    }

    /// Field as `[ny, nx]`.
    pub fn to_array(&self) -> PmplResult<Array2<f64>> {
        let ny = self.phi.len();
        let nx = self.phi.first().map_or(0, Vec::len);
        if ny != self.y.len() || nx != self.x.len() {
            return Err(PmplError::InvalidInput(format!(
                "snapshot field ({ny}, {nx}) does not match axes ({}, {})",
                self.y.len(),
                self.x.len()
            )));
        }
        if let Some(j) = self.phi.iter().position(|row| row.len() != nx) {
            return Err(PmplError::InvalidInput(format!(
                "snapshot row {j} has {} values, expected {nx}",
                self.phi[j].len()
            )));
        }
        let flat: Vec<f64> = self.phi.iter().flatten().copied().collect();
        Array2::from_shape_vec((ny, nx), flat)
            .map_err(|e| PmplError::InvalidInput(format!("snapshot shape: {e}")))
    }
}

pub fn write_sor_snapshot(path: impl AsRef<Path>, snapshot: &SorSnapshot) -> PmplResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, snapshot)?;
    out.flush()?;
    Ok(())
}

pub fn read_sor_snapshot(path: impl AsRef<Path>) -> PmplResult<SorSnapshot> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let snapshot: SorSnapshot = serde_json::from_reader(reader)?;
    snapshot.to_array().map_err(|e| match e {
        PmplError::InvalidInput(msg) => PmplError::InvalidInput(format!("{}: {msg}", display(path))),
        other => other,
    })?;
    Ok(snapshot)
}
