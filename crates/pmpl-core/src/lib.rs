//! Particle dynamics and simulation drivers.
//!
//! Pushers and collision operators work on slices of `Particle`;
//! `scenarios` wires them to configuration sections and dataset files.

pub mod boris;
pub mod collisions;
pub mod particles;
pub mod sampler;
pub mod scenarios;
pub mod timing;
