//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;
use crate::ground::GroundState;

/// Returned when an array's shape does not match the shape of the grid it is
/// used with.
#[derive(Debug, Error)]
#[error("encountered array with incompatible shape; expected {0:?} but got {1:?}")]
pub struct ShapeError(pub Vec<usize>, pub Vec<usize>);

impl ShapeError {
    pub(crate) fn check<S, A>(
        expected: &[usize],
        a: &nd::ArrayBase<S, nd::IxDyn>,
    ) -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        (a.shape() == expected).then_some(())
            .ok_or_else(|| Self(expected.to_vec(), a.shape().to_vec()))
    }
}

/// Returned when a grid, solver, or driver is set up with unusable parameters.
///
/// These are fatal and never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the requested dimensionality is not 1 or 2.
    #[error("grid dimensionality must be 1 or 2; got {0}")]
    BadDimension(usize),

    /// Returned when the number of grid points per axis is too small to
    /// transform.
    #[error("grid must have at least 2 points per axis; got {0}")]
    BadPointCount(usize),

    /// Returned when a grid spacing is non-positive or non-finite.
    #[error("grid spacing must be positive and finite; got {0}")]
    BadSpacing(f64),

    /// Returned when a physical grid parameter (scattering length, atom number,
    /// transverse length) is unusable.
    #[error("bad grid parameter `{0}`: {1}")]
    BadGridParam(&'static str, f64),

    /// Returned when a time step is non-positive or non-finite.
    #[error("time steps must be positive and finite; got {0}")]
    BadStepSize(f64),

    /// Returned when a tolerance is non-positive or non-finite.
    #[error("tolerances must be greater than 0; got {0}")]
    BadTolerance(f64),

    /// Returned when a minimum step size exceeds the requested step size.
    #[error("minimum step size {0} exceeds the step size {1}")]
    BadStepFloor(f64, f64),

    /// Returned when a zero iteration budget is given.
    #[error("maxiters must be greater than 0")]
    BadMaxiters,

    /// Returned when zero steps are requested.
    #[error("num_steps must be greater than 0")]
    BadNumSteps,

    /// Returned when zero snapshots are requested.
    #[error("snapshot_count must be greater than 0")]
    BadSnapshotCount,

    /// Returned when a propagation method name is not recognized.
    #[error("unknown propagation method {0:?}; expected one of \"SSFM\", \"RK4IP\"")]
    UnknownMethod(String),

    /// Returned when a wavefunction with zero (or non-finite) norm is given
    /// where a normalizable one is required.
    #[error("wavefunction cannot be normalized; norm is {0}")]
    ZeroNorm(f64),

    /// [`ShapeError`]
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),
}

impl ConfigError {
    pub(crate) fn check_step(dt: f64) -> Result<(), Self> {
        (dt > 0.0 && dt.is_finite()).then_some(()).ok_or(Self::BadStepSize(dt))
    }

    pub(crate) fn check_tolerance(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0 && epsilon.is_finite()).then_some(())
            .ok_or(Self::BadTolerance(epsilon))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters)
    }
}

/// Returned from all propagation, driver, and solver functions.
#[derive(Debug, Error)]
pub enum GPError {
    /// [`ConfigError`]
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Returned when a wavefunction acquires NaN or infinite values after a
    /// step.
    #[error("numerical instability: non-finite wavefunction values after step {step} (t = {time})")]
    NumericalInstability {
        /// Index of the offending step (1-based).
        step: usize,
        /// Simulated time after the offending step.
        time: f64,
    },

    /// Returned when the adaptive step controller cannot satisfy its tolerance
    /// without going below the minimum step size.
    #[error("step size underflow at t = {time}: dt = {dt:e} fell below dt_min = {dt_min:e} (error estimate {error:e})")]
    StepSizeUnderflow {
        /// Simulated time at which the step was attempted.
        time: f64,
        /// The step size that would have been tried next.
        dt: f64,
        /// Caller-supplied floor.
        dt_min: f64,
        /// Last error estimate.
        error: f64,
    },

    /// Returned when the ground state solver exhausts its iteration budget.
    ///
    /// The best state found so far is carried for inspection.
    #[error("ground state did not converge after {iters} iterations; last change {delta:e}")]
    NonConvergence {
        /// Number of iterations performed.
        iters: usize,
        /// Last wavefunction change.
        delta: f64,
        /// Best-so-far state.
        best: Box<GroundState>,
    },
}

pub type GPResult<T> = Result<T, GPError>;
