//! Mathematical primitives for PMPL.

pub mod analytic;
pub mod optimum;
pub mod percolation;
pub mod random_walk;
pub mod rng;
pub mod sor;
pub mod stats;
