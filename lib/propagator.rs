//! Single-step integrators for the time-dependent GP equation,
//! ```text
//! i ∂ψ/∂t = [ −½∇² + V + g|ψ|² ] ψ
//! ```
//! in real or imaginary time.
//!
//! Both methods treat the kinetic term exactly in k-space and differ in how
//! they handle the potential and nonlinear terms:
//! - [`Method::SSFM`]: symmetric (Strang) splitting, second order in `dt`.
//! - [`Method::RK4IP`]: classical RK4 in the interaction picture of the
//!   kinetic operator, fourth order in `dt` with four nonlinear evaluations per
//!   step.
//!
//! See [`docs`][crate::docs#time-dependence] for details.

use std::{ fmt, str::FromStr };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::ConfigError,
    grid::GridModel,
    potential::PotentialField,
    spectral::SpectralOps,
    utils::array_step,
};

/// Choice of integrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum Method {
    /// Split-step Fourier method.
    SSFM,
    /// Fourth-order Runge-Kutta in the interaction picture.
    RK4IP,
}

impl Method {
    /// Order of accuracy in `dt`.
    pub fn order(&self) -> u32 {
        match self {
            Self::SSFM => 2,
            Self::RK4IP => 4,
        }
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SSFM" => Ok(Self::SSFM),
            "RK4IP" => Ok(Self::RK4IP),
            other => Err(ConfigError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SSFM => write!(f, "SSFM"),
            Self::RK4IP => write!(f, "RK4IP"),
        }
    }
}

/// Direction of time evolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeAxis {
    /// Unitary evolution, `t → t + dt`.
    #[default]
    Real,
    /// Dissipative evolution, `t → t − i dt`, used to relax toward the ground
    /// state.
    Imaginary,
}

impl TimeAxis {
    /// Factor `c` such that one step evolves by `exp(−c H dt)`.
    pub fn coeff(&self) -> C64 {
        match self {
            Self::Real => C64::i(),
            Self::Imaginary => C64::from(1.0),
        }
    }
}

/// Steps wavefunctions on a fixed grid under a fixed potential.
///
/// Holds only read-only state, so one `Propagator` can step any number of
/// independent wavefunctions.
#[derive(Clone, Debug)]
pub struct Propagator<'a> {
    method: Method,
    axis: TimeAxis,
    ops: SpectralOps,
    potential: &'a PotentialField,
    g: f64,
}

impl<'a> Propagator<'a> {
    /// Set up a propagator, checking that `potential` belongs to `grid`.
    pub fn new(
        grid: &GridModel,
        potential: &'a PotentialField,
        method: Method,
        axis: TimeAxis,
    ) -> Result<Self, ConfigError>
    {
        crate::error::ShapeError::check(&grid.shape(), potential.values())?;
        Ok(Self {
            method,
            axis,
            ops: SpectralOps::new(grid),
            potential,
            g: grid.nonlinearity(),
        })
    }

    pub fn method(&self) -> Method { self.method }

    pub fn axis(&self) -> TimeAxis { self.axis }

    /// Order of accuracy of the underlying method.
    pub fn order(&self) -> u32 { self.method.order() }

    pub fn ops(&self) -> &SpectralOps { &self.ops }

    /// Return an error if `psi` does not live on this propagator's grid.
    pub fn check_shape<S>(&self, psi: &nd::ArrayBase<S, nd::IxDyn>)
        -> Result<(), ConfigError>
    where S: nd::Data<Elem = C64>
    {
        self.ops.check_shape(psi)
    }

    /// Advance `psi` by one step of size `dt` in place.
    ///
    /// No renormalization is performed. `psi` is left untouched if it does not
    /// live on this propagator's grid.
    pub fn step<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>, dt: f64)
        -> Result<(), ConfigError>
    where S: nd::DataMut<Elem = C64>
    {
        self.check_shape(psi)?;
        self.advance(psi, dt);
        Ok(())
    }

    // shape must already have been checked
    pub(crate) fn advance<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>, dt: f64)
    where S: nd::DataMut<Elem = C64>
    {
        match self.method {
            Method::SSFM => self.ssfm_step(psi, dt),
            Method::RK4IP => self.rk4ip_step(psi, dt),
        }
    }

    // multiply by exp(−c (V + g|ψ|²) dt), pointwise
    fn apply_nonlinear<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>, dt: f64)
    where S: nd::DataMut<Elem = C64>
    {
        let c = self.axis.coeff();
        let g = self.g;
        nd::Zip::from(psi).and(self.potential.values())
            .for_each(|qk, vk| {
                let phase = (-c * (vk + g * qk.norm_sqr()) * dt).exp();
                *qk *= phase;
            });
    }

    // dt N(ψ) = −c (V + g|ψ|²) ψ dt
    fn rhs<S>(&self, psi: &nd::ArrayBase<S, nd::IxDyn>, dt: f64) -> nd::ArrayD<C64>
    where S: nd::Data<Elem = C64>
    {
        let cdt = -self.axis.coeff() * dt;
        let g = self.g;
        nd::Zip::from(psi).and(self.potential.values())
            .map_collect(|qk, vk| cdt * (vk + g * qk.norm_sqr()) * qk)
    }

    // kinetic half step, full potential/nonlinear step, kinetic half step
    fn ssfm_step<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>, dt: f64)
    where S: nd::DataMut<Elem = C64>
    {
        let tau = self.axis.coeff() * (dt / 2.0);
        self.ops.propagate_kinetic(psi, tau);
        self.apply_nonlinear(psi, dt);
        self.ops.propagate_kinetic(psi, tau);
    }

    // the kinetic propagator over dt/2 maps between the lab frame and the
    // interaction frame anchored at the midpoint of the step
    fn rk4ip_step<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>, dt: f64)
    where S: nd::DataMut<Elem = C64>
    {
        let tau = self.axis.coeff() * (dt / 2.0);

        let mut psi_i = psi.to_owned();
        self.ops.propagate_kinetic(&mut psi_i, tau);

        let mut k1 = self.rhs(psi, dt);
        self.ops.propagate_kinetic(&mut k1, tau);
        let k2 = self.rhs(&array_step(&psi_i, 0.5, &k1), dt);
        let k3 = self.rhs(&array_step(&psi_i, 0.5, &k2), dt);
        let mut q = array_step(&psi_i, 1.0, &k3);
        self.ops.propagate_kinetic(&mut q, tau);
        let k4 = self.rhs(&q, dt);

        nd::Zip::from(&mut psi_i).and(&k1).and(&k2).and(&k3)
            .for_each(|qk, k1k, k2k, k3k| {
                *qk += k1k / 6.0 + (k2k + k3k) / 3.0;
            });
        self.ops.propagate_kinetic(&mut psi_i, tau);
        nd::Zip::from(&mut psi_i).and(&k4)
            .for_each(|qk, k4k| { *qk += k4k / 6.0; });
        psi.assign(&psi_i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names() {
        assert_eq!("SSFM".parse::<Method>().unwrap(), Method::SSFM);
        assert_eq!("RK4IP".parse::<Method>().unwrap(), Method::RK4IP);
        assert!(matches!(
            "rk4".parse::<Method>(),
            Err(ConfigError::UnknownMethod(name)) if name == "rk4"
        ));
        assert_eq!(Method::RK4IP.to_string(), "RK4IP");
        assert_eq!(Method::SSFM.order(), 2);
        assert_eq!(Method::RK4IP.order(), 4);
    }

    #[test]
    fn potential_must_match_grid() {
        let small = GridModel::new_1d(16, 0.1, 0.0).unwrap();
        let large = GridModel::new_1d(32, 0.1, 0.0).unwrap();
        let v = PotentialField::sample(&crate::potential::Free, &small).unwrap();
        assert!(Propagator::new(&large, &v, Method::SSFM, TimeAxis::Real).is_err());
    }

    #[test]
    fn wavefunction_must_match_grid() {
        let grid = GridModel::new_1d(32, 0.1, 0.0).unwrap();
        let v = PotentialField::sample(&crate::potential::Free, &grid).unwrap();
        let short: nd::ArrayD<C64> = nd::ArrayD::ones(nd::IxDyn(&[16]));
        for method in [Method::SSFM, Method::RK4IP] {
            let prop = Propagator::new(&grid, &v, method, TimeAxis::Real).unwrap();
            let mut psi = short.clone();
            assert!(matches!(prop.step(&mut psi, 1e-3), Err(ConfigError::Shape(_))));
            assert_eq!(psi, short);
        }
    }
}
