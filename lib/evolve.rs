//! Time evolution of one or two wavefunctions with snapshot collection.
//!
//! Snapshots are independent copies of the evolving state, so the memory held
//! by a finished run is `snapshot_count` × (number of wavefunctions) ×
//! (grid points) complex values; choose `snapshot_count` accordingly.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    DEF_DT,
    DEF_EPSILON,
    adaptive::{ AdaptiveStepController, StepState },
    error::{ ConfigError, GPError, GPResult },
    grid::GridModel,
    potential::PotentialField,
    propagator::{ Method, Propagator, TimeAxis },
    utils::{ is_finite, wf_renormalize },
};

/// Parameters for a [`TimeEvolutionDriver`] run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolveParams {
    /// Integrator.
    pub method: Method,
    /// Real or imaginary time.
    pub axis: TimeAxis,
    /// Step size; the maximum step size if `adaptive_step` is set.
    pub dt: f64,
    /// Number of (accepted) steps to take.
    pub num_steps: usize,
    /// Number of snapshots to record, evenly spaced in step index and always
    /// including the final state.
    pub snapshot_count: usize,
    /// Whether to control the step size by local error estimation.
    pub adaptive_step: bool,
    /// Smallest step size the adaptive controller may use.
    pub dt_min: f64,
    /// Local error tolerance for the adaptive controller.
    pub lower_bound: f64,
}

impl Default for EvolveParams {
    fn default() -> Self {
        Self {
            method: Method::SSFM,
            axis: TimeAxis::Real,
            dt: DEF_DT,
            num_steps: 1000,
            snapshot_count: 100,
            adaptive_step: false,
            dt_min: DEF_DT * 1e-6,
            lower_bound: DEF_EPSILON,
        }
    }
}

impl EvolveParams {
    pub fn with_method(mut self, method: Method) -> Self { self.method = method; self }

    pub fn with_axis(mut self, axis: TimeAxis) -> Self { self.axis = axis; self }

    pub fn with_dt(mut self, dt: f64) -> Self { self.dt = dt; self }

    pub fn with_num_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    pub fn with_snapshot_count(mut self, snapshot_count: usize) -> Self {
        self.snapshot_count = snapshot_count;
        self
    }

    /// Enable adaptive stepping with step sizes in `[dt_min, dt]` and local
    /// error tolerance `lower_bound`.
    pub fn with_adaptive(mut self, dt_min: f64, lower_bound: f64) -> Self {
        self.adaptive_step = true;
        self.dt_min = dt_min;
        self.lower_bound = lower_bound;
        self
    }

    /// Check that the parameters describe a usable run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_step(self.dt)?;
        (self.num_steps > 0).then_some(())
            .ok_or(ConfigError::BadNumSteps)?;
        (self.snapshot_count > 0).then_some(())
            .ok_or(ConfigError::BadSnapshotCount)?;
        if self.adaptive_step {
            ConfigError::check_step(self.dt_min)?;
            ConfigError::check_tolerance(self.lower_bound)?;
            (self.dt_min <= self.dt).then_some(())
                .ok_or(ConfigError::BadStepFloor(self.dt_min, self.dt))?;
        }
        Ok(())
    }

    fn controller(&self) -> Result<AdaptiveStepController, ConfigError> {
        if self.adaptive_step {
            AdaptiveStepController::adaptive(self.lower_bound, self.dt_min, self.dt)
        } else {
            Ok(AdaptiveStepController::fixed())
        }
    }
}

/// A recorded copy of a wavefunction.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Number of steps taken when the snapshot was recorded.
    pub step: usize,
    /// Position on the time axis when the snapshot was recorded.
    pub time: f64,
    /// The wavefunction.
    pub psi: nd::ArrayD<C64>,
}

/// Step indices (1-based) after which snapshots are recorded:
/// `ceil(k num_steps / c)` for `k = 1, ..., c` with
/// `c = min(snapshot_count, num_steps)`.
pub fn snapshot_steps(num_steps: usize, snapshot_count: usize) -> Vec<usize> {
    let c = snapshot_count.min(num_steps);
    (1..=c).map(|k| (k * num_steps + c - 1) / c).collect()
}

/// Evolves wavefunctions on a fixed grid under a fixed potential.
#[derive(Copy, Clone, Debug)]
pub struct TimeEvolutionDriver<'a> {
    grid: &'a GridModel,
    potential: &'a PotentialField,
}

impl<'a> TimeEvolutionDriver<'a> {
    pub fn new(grid: &'a GridModel, potential: &'a PotentialField) -> Self {
        Self { grid, potential }
    }

    /// Evolve a single wavefunction, returning its snapshots in order.
    pub fn evolve<S>(&self, psi: &nd::ArrayBase<S, nd::IxDyn>, params: &EvolveParams)
        -> GPResult<Vec<Snapshot>>
    where S: nd::Data<Elem = C64>
    {
        let mut trajectories = self.run(vec![psi.to_owned()], params)?;
        Ok(trajectories.pop().unwrap_or_default())
    }

    /// Evolve two wavefunctions in lockstep (shared time axis and step sizes,
    /// independent normalization), returning a trajectory for each.
    ///
    /// The two are never combined; interference patterns are for the caller to
    /// compute from the returned trajectories.
    pub fn evolve_pair<S, T>(
        &self,
        psi_a: &nd::ArrayBase<S, nd::IxDyn>,
        psi_b: &nd::ArrayBase<T, nd::IxDyn>,
        params: &EvolveParams,
    ) -> GPResult<(Vec<Snapshot>, Vec<Snapshot>)>
    where
        S: nd::Data<Elem = C64>,
        T: nd::Data<Elem = C64>,
    {
        let mut trajectories
            = self.run(vec![psi_a.to_owned(), psi_b.to_owned()], params)?;
        let b = trajectories.pop().unwrap_or_default();
        let a = trajectories.pop().unwrap_or_default();
        Ok((a, b))
    }

    /// Evolve any number of wavefunctions in lockstep.
    pub fn evolve_many(&self, psis: &[nd::ArrayD<C64>], params: &EvolveParams)
        -> GPResult<Vec<Vec<Snapshot>>>
    {
        self.run(psis.to_vec(), params)
    }

    fn run(&self, mut psis: Vec<nd::ArrayD<C64>>, params: &EvolveParams)
        -> GPResult<Vec<Vec<Snapshot>>>
    {
        params.validate()?;
        let prop = Propagator::new(
            self.grid, self.potential, params.method, params.axis)?;
        psis.iter().try_for_each(|psi| prop.check_shape(psi))?;
        let controller = params.controller()?;
        let dv = self.grid.cell_volume();

        let marks = snapshot_steps(params.num_steps, params.snapshot_count);
        let mut next_mark = marks.iter().copied().peekable();
        let mut trajectories: Vec<Vec<Snapshot>>
            = psis.iter().map(|_| Vec::with_capacity(marks.len())).collect();
        let mut state = StepState::new(params.dt);
        log::debug!(
            "evolve: {} wavefunction(s), method = {}, axis = {:?}, dt = {:e}, \
            num_steps = {}, snapshots = {}, adaptive = {}",
            psis.len(), params.method, params.axis, params.dt,
            params.num_steps, marks.len(), params.adaptive_step,
        );

        for step in 1..=params.num_steps {
            controller.step(&prop, &mut psis, &mut state)?;
            if psis.iter().any(|psi| !is_finite(psi)) {
                log::warn!("evolve: non-finite wavefunction after step {}", step);
                return Err(GPError::NumericalInstability { step, time: state.time });
            }
            if params.axis == TimeAxis::Imaginary {
                psis.iter_mut().for_each(|psi| { wf_renormalize(psi, dv); });
            }
            if next_mark.next_if_eq(&step).is_some() {
                trajectories.iter_mut().zip(&psis)
                    .for_each(|(traj, psi)| {
                        traj.push(Snapshot { step, time: state.time, psi: psi.clone() });
                    });
            }
        }
        log::debug!(
            "evolve: finished at t = {} ({} rejected steps)",
            state.time, state.rejected,
        );
        Ok(trajectories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_cadence() {
        assert_eq!(snapshot_steps(10, 3), vec![4, 7, 10]);
        assert_eq!(snapshot_steps(250, 5), vec![50, 100, 150, 200, 250]);
        assert_eq!(snapshot_steps(3, 10), vec![1, 2, 3]);
        assert_eq!(snapshot_steps(7, 1), vec![7]);
    }

    #[test]
    fn params_are_validated() {
        assert!(EvolveParams::default().validate().is_ok());
        assert!(matches!(
            EvolveParams::default().with_num_steps(0).validate(),
            Err(ConfigError::BadNumSteps)
        ));
        assert!(matches!(
            EvolveParams::default().with_snapshot_count(0).validate(),
            Err(ConfigError::BadSnapshotCount)
        ));
        assert!(matches!(
            EvolveParams::default().with_dt(-1.0).validate(),
            Err(ConfigError::BadStepSize(_))
        ));
        assert!(matches!(
            EvolveParams::default().with_dt(1e-3).with_adaptive(1e-2, 1e-6).validate(),
            Err(ConfigError::BadStepFloor(..))
        ));
    }
}
