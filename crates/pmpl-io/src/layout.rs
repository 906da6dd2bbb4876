//! File names of every dataset and image, rooted at two directories.

use pmpl_types::error::PmplResult;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        DataLayout::new("data", "images")
    }
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        DataLayout {
            data_dir: data_dir.into(),
            images_dir: images_dir.into(),
        }
    }

    /// Create both directories if missing.
    pub fn ensure_dirs(&self) -> PmplResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.images_dir)?;
        Ok(())
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn image(&self, name: &str) -> PathBuf {
        self.images_dir.join(name)
    }

    /// `{prefix}_trajectories.csv`, e.g. `boris_relativistic_trajectories.csv`.
    pub fn trajectories(&self, prefix: &str) -> PathBuf {
        self.data_file(&format!("{prefix}_trajectories.csv"))
    }

    /// `{prefix}_energy.csv`: rows of `t, (E - E0)/E`.
    pub fn energy(&self, prefix: &str) -> PathBuf {
        self.data_file(&format!("{prefix}_energy.csv"))
    }

    /// `{prefix}_side_speeds.csv`: rows of `vx, vy, vz`.
    pub fn side_speeds(&self, prefix: &str) -> PathBuf {
        self.data_file(&format!("{prefix}_side_speeds.csv"))
    }

    pub fn sor_optimization(&self) -> PathBuf {
        self.data_file("sor_optimization.csv")
    }

    pub fn sor_time(&self) -> PathBuf {
        self.data_file("sor_time.csv")
    }

    pub fn sor_snapshot(&self) -> PathBuf {
        self.data_file("sor.json")
    }

    pub fn carlo_time(&self) -> PathBuf {
        self.data_file("carlo.csv")
    }

    pub fn carlo_precision(&self) -> PathBuf {
        self.data_file("carlo_precision.csv")
    }

    pub fn porous(&self) -> PathBuf {
        self.data_file("porous.csv")
    }
}

pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}
