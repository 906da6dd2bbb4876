// ─────────────────────────────────────────────────────────────────────
// PMPL — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Boltzmann constant (J/K), CODATA 2014 value used by the gas datasets.
pub const K_BOLTZMANN: f64 = 1.380_648_52e-23;

/// Speed of light in vacuum (m/s)
pub const C_LIGHT: f64 = 299_792_458.0;

/// Electron rest mass (kg)
pub const M_ELECTRON: f64 = 9.109_383_56e-31;

/// Elementary charge (C)
pub const Q_ELECTRON: f64 = 1.602_176_62e-19;

/// Argon atom mass (kg), the default background gas.
pub const M_ARGON: f64 = 6.633_520_88e-26;

/// Gravitational constant in km³ kg⁻¹ s⁻² (solar system runs use kilometres).
pub const G_KM: f64 = 6.674e-20;

/// Sun mass (kg)
pub const M_SUN: f64 = 1_988_500e24;

/// Earth mass (kg)
pub const M_EARTH: f64 = 5.9726e24;

/// Moon mass (kg)
pub const M_MOON: f64 = 0.07342e24;

/// Earth perihelion distance (km)
pub const EARTH_PERIHELION_KM: f64 = 147.09e6;

/// Earth speed at perihelion (km/s)
pub const EARTH_PERIHELION_SPEED_KM_S: f64 = 30.29;

/// Moon perigee distance from Earth (km)
pub const MOON_PERIGEE_KM: f64 = 0.3633e6;

/// Moon speed at perigee relative to Earth (km/s)
pub const MOON_PERIGEE_SPEED_KM_S: f64 = 1.076;

/// Electron temperature of the gas runs (K), roughly 1 eV.
pub const T_ONE_EV: f64 = 11_600.0;

/// Seconds in a (non-leap) year.
pub const YEAR_S: f64 = 365.0 * 24.0 * 60.0 * 60.0;
