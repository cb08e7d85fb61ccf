//! Step-size control for a [`Propagator`].
//!
//! In adaptive mode, the local truncation error is estimated by step doubling:
//! from the same starting state, one step of size `dt` and two steps of size
//! `dt / 2` are taken. For a method of order *p*, the difference between the
//! two results is (2ᵖ − 1) times the error of the two-half-step result, so
//! ```text
//! err = ‖ψ_half − ψ_full‖ / ‖ψ_half‖ / (2ᵖ − 1)
//! ```
//! When several wavefunctions are stepped in lockstep, the largest estimate
//! among them is used so that they all share one time axis.
//!
//! A step is accepted (keeping the more accurate two-half-step result) if
//! `err` is at most the tolerance; otherwise `dt` is halved and the step is
//! retried from the same state. After an accepted step, the next step size may
//! grow by up to a factor of 4, but never above the configured maximum.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ ConfigError, GPError, GPResult },
    propagator::Propagator,
    utils::rel_l2_distance,
};

// safety numbers for step growth
const SAFE1: f64 = 0.9;
const SAFE2: f64 = 4.0;

/// Bookkeeping for one evolution run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepState {
    /// Current position along the (real or imaginary) time axis.
    pub time: f64,
    /// Size of the next step to attempt.
    pub dt: f64,
    /// Whether the most recent attempt was accepted.
    pub accepted: bool,
    /// Error estimate for the most recent attempt; `None` for fixed steps.
    pub error: Option<f64>,
    /// Number of accepted steps.
    pub steps: usize,
    /// Number of rejected attempts.
    pub rejected: usize,
}

impl StepState {
    /// Start a run at `time = 0` with initial step size `dt`.
    pub fn new(dt: f64) -> Self {
        Self { time: 0.0, dt, accepted: false, error: None, steps: 0, rejected: 0 }
    }
}

/// Takes steps through a [`Propagator`], optionally adapting the step size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AdaptiveStepController {
    adaptive: bool,
    lower_bound: f64,
    dt_min: f64,
    dt_max: f64,
}

impl AdaptiveStepController {
    /// A controller that always takes steps of the size recorded in the
    /// [`StepState`] and performs no error estimation.
    pub fn fixed() -> Self {
        Self {
            adaptive: false,
            lower_bound: f64::INFINITY,
            dt_min: 0.0,
            dt_max: f64::INFINITY,
        }
    }

    /// A step-doubling controller with tolerance `lower_bound`, accepting step
    /// sizes in `[dt_min, dt_max]`.
    pub fn adaptive(lower_bound: f64, dt_min: f64, dt_max: f64)
        -> Result<Self, ConfigError>
    {
        ConfigError::check_tolerance(lower_bound)?;
        ConfigError::check_step(dt_min)?;
        ConfigError::check_step(dt_max)?;
        (dt_min <= dt_max).then_some(())
            .ok_or(ConfigError::BadStepFloor(dt_min, dt_max))?;
        Ok(Self { adaptive: true, lower_bound, dt_min, dt_max })
    }

    pub fn is_adaptive(&self) -> bool { self.adaptive }

    pub fn lower_bound(&self) -> f64 { self.lower_bound }

    pub fn dt_min(&self) -> f64 { self.dt_min }

    pub fn dt_max(&self) -> f64 { self.dt_max }

    /// Take one accepted step of every wavefunction in `psis`, updating
    /// `state`.
    ///
    /// On success, `state.time` has advanced by the size of the accepted step
    /// and `state.dt` holds the size to attempt next. On error, `psis` are left
    /// as they were before the call.
    pub fn step(
        &self,
        prop: &Propagator,
        psis: &mut [nd::ArrayD<C64>],
        state: &mut StepState,
    ) -> GPResult<()>
    {
        psis.iter().try_for_each(|psi| prop.check_shape(psi))?;
        if !self.adaptive {
            psis.iter_mut().for_each(|psi| prop.advance(psi, state.dt));
            state.time += state.dt;
            state.accepted = true;
            state.error = None;
            state.steps += 1;
            return Ok(());
        }

        let p = prop.order() as i32;
        let richardson = 2.0_f64.powi(p) - 1.0;
        loop {
            let dt = state.dt;
            let mut halves: Vec<nd::ArrayD<C64>> = Vec::with_capacity(psis.len());
            let mut err: f64 = 0.0;
            for psi in psis.iter() {
                let mut full = psi.clone();
                prop.advance(&mut full, dt);
                let mut half = psi.clone();
                prop.advance(&mut half, dt / 2.0);
                prop.advance(&mut half, dt / 2.0);
                let e = rel_l2_distance(&half, &full) / richardson;
                err = if e.is_nan() || e > err { e } else { err };
                halves.push(half);
            }
            state.error = Some(err);

            if !err.is_finite() {
                log::warn!("non-finite error estimate at t = {}, dt = {:e}", state.time, dt);
                return Err(GPError::NumericalInstability {
                    step: state.steps + 1,
                    time: state.time,
                });
            }

            if err <= self.lower_bound {
                psis.iter_mut().zip(halves)
                    .for_each(|(psi, half)| { *psi = half; });
                state.time += dt;
                state.accepted = true;
                state.steps += 1;
                let grow
                    = if err == 0.0 {
                        SAFE2
                    } else {
                        let exp = (p as f64 + 1.0).recip();
                        (SAFE1 * (self.lower_bound / err).powf(exp)).clamp(1.0, SAFE2)
                    };
                state.dt = (dt * grow).min(self.dt_max);
                if state.dt != dt {
                    log::trace!("step size {:e} -> {:e} at t = {}", dt, state.dt, state.time);
                }
                return Ok(());
            }

            state.accepted = false;
            state.rejected += 1;
            let dt_next = dt / 2.0;
            log::trace!(
                "rejected step at t = {}: error {:e} > {:e}; dt {:e} -> {:e}",
                state.time, err, self.lower_bound, dt, dt_next,
            );
            if dt_next < self.dt_min {
                log::warn!(
                    "step size underflow at t = {}: dt = {:e} < dt_min = {:e}",
                    state.time, dt_next, self.dt_min,
                );
                return Err(GPError::StepSizeUnderflow {
                    time: state.time,
                    dt: dt_next,
                    dt_min: self.dt_min,
                    error: err,
                });
            }
            state.dt = dt_next;
        }
    }
}

impl Default for AdaptiveStepController {
    fn default() -> Self { Self::fixed() }
}
