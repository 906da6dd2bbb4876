// ─────────────────────────────────────────────────────────────────────
// PMPL — Dataset I/O
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reading and writing the datasets exchanged between simulators and reports.
//!
//! Tables are plain comma-delimited numeric text, one record per line.
//! The SOR field snapshot is JSON.

pub mod layout;
pub mod relaxation;
pub mod snapshot;
pub mod table;
pub mod trajectory;

pub use layout::DataLayout;
pub use relaxation::{read_relaxation_table, write_relaxation_table};
pub use snapshot::{read_sor_snapshot, write_sor_snapshot, SorSnapshot};
pub use table::{read_table, write_table};
pub use trajectory::{write_trajectories, TrajectoryTable};
