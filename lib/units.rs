#![allow(non_upper_case_globals)]

//! Convenience functions and constructs to handle conversion to and from
//! harmonic oscillator units, in which the GP equation is solved.
//!
//! Concrete physical constants are taken from NIST.

use std::f64::consts::PI;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// Boltzmann's constant (J K^-1)
pub const kB: f64 = 1.380649e-23;
//              +/- 0 (exact)

/// unified atomic mass unit (kg)
pub const mu: f64 = 1.66053906660e-27;
//              +/- 0.00000000050e-27

/// Bohr radius (m)
pub const a0: f64 = 5.29177210903e-11;
//              +/- 0.00000000080e-11

/// A collection of oscillator unit scaling factors relative to
/// meters/kilograms/seconds.
///
/// For a trap of angular frequency *ω* and a particle of mass *m*, lengths are
/// measured in units of √(*ħ*/*m* *ω*), energies in units of *ħ* *ω*, and times
/// in units of 1/*ω*. In these units the GP equation takes the form used
/// throughout this crate (see [`docs`][crate::docs#units]).
#[derive(Copy, Clone, Debug)]
pub struct OscillatorUnits {
    /// Particle mass.
    pub m: f64,
    /// Trap angular frequency.
    pub omega: f64,
    /// Oscillator length.
    pub a: f64,
    /// Associated energy scale.
    pub e: f64,
    /// Associated time scale.
    pub t: f64,
}

impl OscillatorUnits {
    /// Construct from a particle mass (kg) and trap angular frequency (s⁻¹).
    pub fn from_trap(mass: f64, omega: f64) -> Self {
        let a = (hbar / mass / omega).sqrt();
        Self { m: mass, omega, a, e: hbar * omega, t: omega.recip() }
    }

    /// Construct from a mass given in atomic mass units and a trap frequency
    /// given in Hz (not angular).
    pub fn from_amu_hz(mass_amu: f64, freq: f64) -> Self {
        Self::from_trap(mass_amu * mu, 2.0 * PI * freq)
    }

    /// Convert a scattering length given in Bohr radii to oscillator units.
    pub fn scattering_length_bohr(&self, a_s: f64) -> f64 {
        self.to_nat_length(a_s * a0)
    }

    /// Convert a quantity with dimensions of length in meters to oscillator
    /// units.
    pub fn to_nat_length<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.a.recip()
    }

    /// Convert a dimensionless length to meters.
    pub fn from_nat_length<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.a
    }

    /// Convert a quantity with dimensions of energy in joules to oscillator
    /// units.
    pub fn to_nat_energy<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.e.recip()
    }

    /// Convert a dimensionless energy to joules.
    pub fn from_nat_energy<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.e
    }

    /// Convert a quantity with dimensions of time in seconds to oscillator
    /// units.
    pub fn to_nat_time<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.t.recip()
    }

    /// Convert a dimensionless time to seconds.
    pub fn from_nat_time<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.t
    }

    /// Temperature (K) corresponding to one oscillator energy quantum.
    pub fn temperature(&self) -> f64 { self.e / kB }
}
