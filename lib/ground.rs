//! Ground states via imaginary-time propagation.
//!
//! Expanding a trial state in eigenstates of the (linearized) Hamiltonian,
//! evolution in imaginary time multiplies each component by `exp(−Eₙ τ)`, so
//! every excited component decays faster than the ground state. Renormalizing
//! after every step then drives any trial state with nonzero ground-state
//! overlap toward the lowest-energy stationary state.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    DEF_MAXITERS,
    adaptive::{ AdaptiveStepController, StepState },
    error::{ ConfigError, GPError, GPResult },
    grid::GridModel,
    observables,
    potential::PotentialField,
    propagator::{ Method, Propagator, TimeAxis },
    utils::{ is_finite, l2_distance, wf_renormalize },
    wavefunction::normalized,
};

// how often to report progress
const LOG_EVERY: usize = 1000;

/// Result of a ground state calculation.
#[derive(Clone, Debug)]
pub struct GroundState {
    /// Normalized wavefunction.
    pub psi: nd::ArrayD<C64>,
    /// Energy per particle.
    pub energy: f64,
    /// Chemical potential.
    pub chemical_potential: f64,
    /// Number of imaginary-time steps taken.
    pub iters: usize,
    /// L2 change of the wavefunction over the last step, per unit imaginary
    /// time.
    pub delta: f64,
    /// Total imaginary time elapsed.
    pub time: f64,
}

/// Drives normalized imaginary-time steps of a [`Propagator`] to convergence.
#[derive(Clone, Debug)]
pub struct GroundStateSolver<'a> {
    grid: &'a GridModel,
    potential: &'a PotentialField,
    method: Method,
    maxiters: usize,
    dt_min: Option<f64>,
}

impl<'a> GroundStateSolver<'a> {
    pub fn new(grid: &'a GridModel, potential: &'a PotentialField, method: Method)
        -> Self
    {
        Self { grid, potential, method, maxiters: DEF_MAXITERS, dt_min: None }
    }

    /// Set the iteration budget.
    pub fn with_maxiters(mut self, maxiters: usize) -> Self {
        self.maxiters = maxiters;
        self
    }

    /// Use adaptive steps no smaller than `dt_min`, with the convergence
    /// threshold doubling as the local error tolerance.
    ///
    /// [`Self::solve`] fails with [`ConfigError::BadStepFloor`] if `dt_min`
    /// exceeds the step size it is given.
    pub fn with_adaptive(mut self, dt_min: f64) -> Self {
        self.dt_min = Some(dt_min);
        self
    }

    /// Relax `initial_guess` toward the ground state with imaginary-time steps
    /// of size `dt`, stopping once the L2 change of the normalized wavefunction
    /// over one step, divided by the step size, falls below `lower_bound`.
    ///
    /// Near convergence this rate is ‖(H − μ)ψ‖, so the stopping point does not
    /// depend on `dt`; it bounds the residual excited-state content by roughly
    /// `lower_bound` over the gap to the first excited state.
    ///
    /// Returns [`GPError::NonConvergence`] carrying the last state if the
    /// iteration budget runs out first.
    pub fn solve<S>(
        &self,
        initial_guess: &nd::ArrayBase<S, nd::IxDyn>,
        dt: f64,
        lower_bound: f64,
    ) -> GPResult<GroundState>
    where S: nd::Data<Elem = C64>
    {
        ConfigError::check_step(dt)?;
        ConfigError::check_tolerance(lower_bound)?;
        ConfigError::check_maxiters(self.maxiters)?;
        let prop = Propagator::new(
            self.grid, self.potential, self.method, TimeAxis::Imaginary)?;
        prop.check_shape(initial_guess)?;
        let controller
            = match self.dt_min {
                Some(dt_min) => {
                    ConfigError::check_step(dt_min)?;
                    (dt_min <= dt).then_some(())
                        .ok_or(ConfigError::BadStepFloor(dt_min, dt))?;
                    AdaptiveStepController::adaptive(lower_bound, dt_min, dt)?
                },
                None => AdaptiveStepController::fixed(),
            };
        let dv = self.grid.cell_volume();

        let mut psi = [normalized(initial_guess, self.grid)?];
        let mut state = StepState::new(dt);
        let mut delta = f64::INFINITY;
        log::debug!(
            "ground state: method = {}, dt = {:e}, lower_bound = {:e}, maxiters = {}",
            self.method, dt, lower_bound, self.maxiters,
        );
        for iter in 1..=self.maxiters {
            let prev = psi[0].clone();
            let t_prev = state.time;
            controller.step(&prop, &mut psi, &mut state)?;
            if !is_finite(&psi[0]) {
                log::warn!("ground state: non-finite wavefunction at iteration {}", iter);
                return Err(GPError::NumericalInstability { step: iter, time: state.time });
            }
            wf_renormalize(&mut psi[0], dv);
            delta = l2_distance(&psi[0], &prev, dv) / (state.time - t_prev);
            if iter % LOG_EVERY == 0 {
                log::debug!("ground state: iteration {}, delta = {:e}", iter, delta);
            }
            if delta < lower_bound {
                let [psi] = psi;
                let gs = self.finish(psi, iter, delta, state.time, &prop)?;
                log::info!(
                    "ground state converged after {} iterations: E = {}, mu = {}",
                    iter, gs.energy, gs.chemical_potential,
                );
                return Ok(gs);
            }
        }
        log::warn!(
            "ground state: no convergence after {} iterations (delta = {:e})",
            self.maxiters, delta,
        );
        let [psi] = psi;
        let best = self.finish(psi, self.maxiters, delta, state.time, &prop)?;
        Err(GPError::NonConvergence {
            iters: self.maxiters,
            delta,
            best: Box::new(best),
        })
    }

    fn finish(
        &self,
        psi: nd::ArrayD<C64>,
        iters: usize,
        delta: f64,
        time: f64,
        prop: &Propagator,
    ) -> Result<GroundState, ConfigError>
    {
        let energy = observables::energy(self.grid, prop.ops(), self.potential, &psi)?;
        let chemical_potential = observables::chemical_potential(
            self.grid, prop.ops(), self.potential, &psi)?;
        Ok(GroundState { psi, energy, chemical_potential, iters, delta, time })
    }
}
