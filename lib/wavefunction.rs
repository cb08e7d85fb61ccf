//! Wavefunction values and a few standard initial states.
//!
//! A wavefunction is a plain complex array shaped like its grid. Everything in
//! this crate takes and returns them by value (or borrows them for the duration
//! of a call); nothing keeps a "current" wavefunction around between calls.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::ConfigError,
    grid::GridModel,
    utils::{ wf_norm, wf_renormalize },
};

pub use crate::utils::{
    is_finite,
    l2_distance,
    wf_norm as norm,
    wf_renormalize as renormalize,
};

/// Complex probability amplitude sampled on a [`GridModel`].
pub type WaveFunction = nd::ArrayD<C64>;

/// A normalized Gaussian `exp(−|x − c|² / 2σ²)` centered on `center` with
/// width `sigma`.
///
/// Missing components of `center` are taken to be zero.
pub fn gaussian(grid: &GridModel, center: &[f64], sigma: f64) -> WaveFunction {
    let mut psi: WaveFunction
        = grid.sample(|x| {
            let r2: f64
                = x.iter().enumerate()
                .map(|(i, xi)| (xi - center.get(i).copied().unwrap_or(0.0)).powi(2))
                .sum();
            C64::from((-r2 / (2.0 * sigma.powi(2))).exp())
        });
    wf_renormalize(&mut psi, grid.cell_volume());
    psi
}

/// A normalized plane wave occupying a single grid mode.
///
/// `modes[i]` is the (integer) number of wavelengths across the box along axis
/// `i`, so the wavevector is `2π modes / extent`.
pub fn plane_wave(grid: &GridModel, modes: &[i64]) -> WaveFunction {
    let dk = std::f64::consts::TAU / grid.extent();
    let amp = grid.len() as f64 * grid.cell_volume();
    grid.sample(|x| {
        let phase: f64
            = x.iter().enumerate()
            .map(|(i, xi)| dk * modes.get(i).copied().unwrap_or(0) as f64 * xi)
            .sum();
        C64::cis(phase) / amp.sqrt()
    })
}

/// Return a copy of `psi` periodically shifted by `shift` grid points along
/// `axis`, so that `out[j] = psi[j − shift]`.
///
/// *Panics if `axis` is out of range.*
pub fn roll<S>(psi: &nd::ArrayBase<S, nd::IxDyn>, axis: usize, shift: isize)
    -> WaveFunction
where S: nd::Data<Elem = C64>
{
    let n = psi.len_of(nd::Axis(axis)) as isize;
    let mut out = psi.to_owned();
    if n == 0 { return out; }
    let s = shift.rem_euclid(n) as usize;
    let n = n as usize;
    for (j, mut lane) in out.axis_iter_mut(nd::Axis(axis)).enumerate() {
        lane.assign(&psi.index_axis(nd::Axis(axis), (j + n - s) % n));
    }
    out
}

/// Return `psi` rescaled to unit norm, or an error if it has no norm to rescale.
pub fn normalized<S>(psi: &nd::ArrayBase<S, nd::IxDyn>, grid: &GridModel)
    -> Result<WaveFunction, ConfigError>
where S: nd::Data<Elem = C64>
{
    let norm = wf_norm(psi, grid.cell_volume());
    (norm > 0.0 && norm.is_finite()).then_some(())
        .ok_or(ConfigError::ZeroNorm(norm))?;
    let mut out = psi.to_owned();
    wf_renormalize(&mut out, grid.cell_volume());
    Ok(out)
}
