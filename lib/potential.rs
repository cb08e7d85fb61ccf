//! External trapping potentials.
//!
//! Anything implementing [`Potential`] can be sampled onto a grid as a
//! [`PotentialField`], which is what the propagators consume. Closures taking a
//! point's coordinates implement [`Potential`] automatically:
//! ```
//! use gpspace::{ grid::GridModel, potential::PotentialField };
//!
//! let grid = GridModel::new_1d(64, 0.1, 0.0).unwrap();
//! let quartic = |x: &[f64]| x[0].powi(4);
//! let v = PotentialField::sample(&quartic, &grid).unwrap();
//! assert_eq!(v.values().shape(), &[64]);
//! ```

use ndarray as nd;
use crate::{
    error::{ ConfigError, ShapeError },
    grid::GridModel,
};

/// A deterministic, side-effect-free external potential.
pub trait Potential {
    /// Sample the potential at every point of `grid`.
    ///
    /// The returned array must have shape [`GridModel::shape`].
    fn evaluate(&self, grid: &GridModel) -> nd::ArrayD<f64>;
}

impl<F> Potential for F
where F: Fn(&[f64]) -> f64
{
    fn evaluate(&self, grid: &GridModel) -> nd::ArrayD<f64> {
        grid.sample(self)
    }
}

/// Zero potential.
#[derive(Copy, Clone, Debug, Default)]
pub struct Free;

impl Potential for Free {
    fn evaluate(&self, grid: &GridModel) -> nd::ArrayD<f64> {
        nd::ArrayD::zeros(nd::IxDyn(&grid.shape()))
    }
}

/// Harmonic trap `V = ½ ∑ ωᵢ² (xᵢ − cᵢ)²`.
///
/// Frequencies are relative to the frequency defining the oscillator units;
/// in one dimension only the first components are used.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Harmonic {
    /// Trap frequency along each axis.
    pub omega: [f64; 2],
    /// Trap center along each axis.
    pub center: [f64; 2],
}

impl Harmonic {
    /// Isotropic trap centered on the origin.
    pub fn symmetric(omega: f64) -> Self {
        Self { omega: [omega; 2], center: [0.0; 2] }
    }

    /// Elongated ("cigar") trap with distinct frequencies along the two axes.
    pub fn cigar(omega_x: f64, omega_y: f64) -> Self {
        Self { omega: [omega_x, omega_y], center: [0.0; 2] }
    }

    /// Return a copy with the trap center moved to `center`.
    pub fn shifted(mut self, center: [f64; 2]) -> Self {
        self.center = center;
        self
    }
}

impl Potential for Harmonic {
    fn evaluate(&self, grid: &GridModel) -> nd::ArrayD<f64> {
        grid.sample(|x| {
            x.iter().zip(&self.omega).zip(&self.center)
                .map(|((xi, wi), ci)| 0.5 * (wi * (xi - ci)).powi(2))
                .sum()
        })
    }
}

/// A potential sampled onto a particular grid.
///
/// Produced once per simulation setup and consumed read-only by every step.
#[derive(Clone, Debug)]
pub struct PotentialField {
    v: nd::ArrayD<f64>,
}

impl PotentialField {
    /// Sample `potential` onto `grid`, checking the shape of the result.
    pub fn sample<P>(potential: &P, grid: &GridModel) -> Result<Self, ConfigError>
    where P: Potential + ?Sized
    {
        Self::from_array(potential.evaluate(grid), grid)
    }

    /// Wrap pre-computed values, checking that they match `grid`.
    pub fn from_array(v: nd::ArrayD<f64>, grid: &GridModel)
        -> Result<Self, ConfigError>
    {
        ShapeError::check(&grid.shape(), &v)?;
        v.iter().all(|vk| vk.is_finite()).then_some(())
            .ok_or(ConfigError::BadGridParam(
                "potential", v.iter().copied().find(|vk| !vk.is_finite())
                    .unwrap_or(f64::NAN)))?;
        Ok(Self { v })
    }

    pub fn values(&self) -> &nd::ArrayD<f64> { &self.v }

    pub fn into_values(self) -> nd::ArrayD<f64> { self.v }
}
