//! Pseudo-spectral differential operators.
//!
//! All operators work by transforming to k-space, where derivatives become
//! multiplications, and transforming back. FFT plans are made once per grid and
//! reused for every application.

use std::sync::Arc;
use ndarray as nd;
use num_complex::Complex64 as C64;
use rustfft::{ Fft, FftPlanner };
use crate::{
    error::{ ConfigError, ShapeError },
    grid::GridModel,
    utils::fft_all_axes,
};

/// Kinetic-energy operator and friends for a fixed grid.
#[derive(Clone)]
pub struct SpectralOps {
    shape: Vec<usize>,
    n: usize,
    dim: usize,
    fwd: Arc<dyn Fft<f64>>,
    inv: Arc<dyn Fft<f64>>,
    // k² / 2 over the full grid, in FFT order
    t: nd::ArrayD<f64>,
    // wavenumbers broadcast along each axis
    k: Vec<nd::ArrayD<f64>>,
}

impl std::fmt::Debug for SpectralOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralOps")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl SpectralOps {
    /// Plan transforms and precompute the kinetic multiplier for `grid`.
    pub fn new(grid: &GridModel) -> Self {
        let mut planner = FftPlanner::new();
        let n = grid.n();
        let fwd = planner.plan_fft_forward(n);
        let inv = planner.plan_fft_inverse(n);
        let t = grid.sample_k(|k| 0.5 * k.iter().map(|ki| ki * ki).sum::<f64>());
        let k: Vec<nd::ArrayD<f64>>
            = (0..grid.dim())
            .map(|axis| grid.sample_k(|k| k[axis]))
            .collect();
        Self { shape: grid.shape(), n, dim: grid.dim(), fwd, inv, t, k }
    }

    /// Return an error if `psi` does not live on this operator's grid.
    pub fn check_shape<S>(&self, psi: &nd::ArrayBase<S, nd::IxDyn>)
        -> Result<(), ConfigError>
    where S: nd::Data<Elem = C64>
    {
        Ok(ShapeError::check(&self.shape, psi)?)
    }

    /// Forward transform along all axes, in place.
    pub fn forward<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>)
        -> Result<(), ConfigError>
    where S: nd::DataMut<Elem = C64>
    {
        self.check_shape(psi)?;
        fft_all_axes(psi, &self.fwd);
        Ok(())
    }

    /// Inverse transform along all axes, in place, including the `1/n` factor
    /// per axis.
    pub fn inverse<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>)
        -> Result<(), ConfigError>
    where S: nd::DataMut<Elem = C64>
    {
        self.check_shape(psi)?;
        self.inverse_inplace(psi);
        Ok(())
    }

    fn inverse_inplace<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>)
    where S: nd::DataMut<Elem = C64>
    {
        fft_all_axes(psi, &self.inv);
        let scale = (self.n as f64).powi(self.dim as i32).recip();
        psi.map_inplace(|qk| { *qk *= scale; });
    }

    /// Apply the kinetic propagator `exp(−τ k²/2)` in place.
    ///
    /// For real-time evolution over `dt`, pass `τ = i dt` to get
    /// `exp(−i k² dt / 2)`; for imaginary time pass `τ = dt` to get
    /// `exp(−k² dt / 2)`.
    pub fn apply_kinetic<S>(&self, psi: &mut nd::ArrayBase<S, nd::IxDyn>, tau: C64)
        -> Result<(), ConfigError>
    where S: nd::DataMut<Elem = C64>
    {
        self.check_shape(psi)?;
        self.propagate_kinetic(psi, tau);
        Ok(())
    }

    // shape must already have been checked
    pub(crate) fn propagate_kinetic<S>(
        &self,
        psi: &mut nd::ArrayBase<S, nd::IxDyn>,
        tau: C64,
    )
    where S: nd::DataMut<Elem = C64>
    {
        fft_all_axes(psi, &self.fwd);
        nd::Zip::from(&mut *psi).and(&self.t)
            .for_each(|qk, tk| { *qk *= (-tau * *tk).exp(); });
        self.inverse_inplace(psi);
    }

    /// Compute `T psi = F⁻¹[k²/2 F psi]`.
    pub fn kinetic<S>(&self, psi: &nd::ArrayBase<S, nd::IxDyn>)
        -> Result<nd::ArrayD<C64>, ConfigError>
    where S: nd::Data<Elem = C64>
    {
        self.check_shape(psi)?;
        let mut tpsi = psi.to_owned();
        fft_all_axes(&mut tpsi, &self.fwd);
        nd::Zip::from(&mut tpsi).and(&self.t)
            .for_each(|qk, tk| { *qk *= *tk; });
        self.inverse_inplace(&mut tpsi);
        Ok(tpsi)
    }

    /// Compute the spectral derivative ∂psi/∂x along `axis`.
    ///
    /// *Panics if `axis` is out of range.*
    pub fn gradient<S>(&self, psi: &nd::ArrayBase<S, nd::IxDyn>, axis: usize)
        -> Result<nd::ArrayD<C64>, ConfigError>
    where S: nd::Data<Elem = C64>
    {
        self.check_shape(psi)?;
        let mut dpsi = psi.to_owned();
        fft_all_axes(&mut dpsi, &self.fwd);
        nd::Zip::from(&mut dpsi).and(&self.k[axis])
            .for_each(|qk, kk| { *qk *= C64::new(0.0, *kk); });
        self.inverse_inplace(&mut dpsi);
        Ok(dpsi)
    }
}
