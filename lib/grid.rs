//! Discretization of the simulation domain.
//!
//! A [`GridModel`] is immutable: all derived quantities (coordinates,
//! wavenumbers, and the nonlinearity coefficient) are computed once in the
//! constructor, so they can never disagree with the parameters they came from.
//! Changing a parameter means constructing a new grid.

use std::f64::consts::{ PI, TAU };
use ndarray as nd;
use crate::{ error::ConfigError, utils::fft_freq };

/// Raw discretization and interaction parameters for a [`GridModel`].
///
/// All quantities are in oscillator units (see [`units`][crate::units]).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridParams {
    /// Number of spatial dimensions (1 or 2).
    pub dim: usize,
    /// Number of grid points along each axis.
    pub n: usize,
    /// Grid spacing along each axis.
    pub dx: f64,
    /// s-wave scattering length.
    pub scattering_length: f64,
    /// Number of condensed atoms.
    pub atom_number: f64,
    /// Oscillator length of the tightly confined (integrated-out) directions.
    pub transverse_length: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            dim: 1,
            n: 256,
            dx: 0.05,
            scattering_length: 0.0,
            atom_number: 1.0,
            transverse_length: 1.0,
        }
    }
}

impl GridParams {
    pub fn with_dim(mut self, dim: usize) -> Self { self.dim = dim; self }

    pub fn with_n(mut self, n: usize) -> Self { self.n = n; self }

    pub fn with_dx(mut self, dx: f64) -> Self { self.dx = dx; self }

    pub fn with_scattering_length(mut self, a_s: f64) -> Self {
        self.scattering_length = a_s;
        self
    }

    pub fn with_atom_number(mut self, atom_number: f64) -> Self {
        self.atom_number = atom_number;
        self
    }

    pub fn with_transverse_length(mut self, l: f64) -> Self {
        self.transverse_length = l;
        self
    }

    /// Check that the parameters describe a usable grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        (1..=2).contains(&self.dim).then_some(())
            .ok_or(ConfigError::BadDimension(self.dim))?;
        (self.n >= 2).then_some(())
            .ok_or(ConfigError::BadPointCount(self.n))?;
        (self.dx > 0.0 && self.dx.is_finite()).then_some(())
            .ok_or(ConfigError::BadSpacing(self.dx))?;
        self.scattering_length.is_finite().then_some(())
            .ok_or(ConfigError::BadGridParam(
                "scattering_length", self.scattering_length))?;
        (self.atom_number > 0.0 && self.atom_number.is_finite()).then_some(())
            .ok_or(ConfigError::BadGridParam(
                "atom_number", self.atom_number))?;
        (self.transverse_length > 0.0 && self.transverse_length.is_finite())
            .then_some(())
            .ok_or(ConfigError::BadGridParam(
                "transverse_length", self.transverse_length))?;
        Ok(())
    }

    // reduced-dimension coupling constant for the given geometry
    fn nonlinearity(&self) -> f64 {
        let a_n = self.scattering_length * self.atom_number;
        match self.dim {
            1 => 2.0 * a_n / self.transverse_length.powi(2),
            _ => (8.0 * PI).sqrt() * a_n / self.transverse_length,
        }
    }
}

/// A uniform, periodic grid in one or two dimensions with its Fourier-conjugate
/// grid and nonlinearity coefficient.
///
/// Every axis has the same number of points and spacing. Real-space
/// coordinates are centered on the origin, `x[j] = (j - n/2) dx`, and
/// wavenumbers follow the ordering of [`fft_freq`], scaled by 2π.
#[derive(Clone, Debug)]
pub struct GridModel {
    params: GridParams,
    x: nd::Array1<f64>,
    k: nd::Array1<f64>,
    g: f64,
}

impl GridModel {
    /// Construct from a full set of parameters.
    pub fn new(params: GridParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let GridParams { n, dx, .. } = params;
        let x: nd::Array1<f64>
            = (0..n).map(|j| (j as f64 - (n / 2) as f64) * dx).collect();
        let k: nd::Array1<f64> = fft_freq(n, dx) * TAU;
        let g = params.nonlinearity();
        Ok(Self { params, x, k, g })
    }

    /// Construct a one-dimensional grid with default atom number and
    /// transverse length.
    pub fn new_1d(n: usize, dx: f64, scattering_length: f64)
        -> Result<Self, ConfigError>
    {
        Self::new(
            GridParams::default()
                .with_dim(1)
                .with_n(n)
                .with_dx(dx)
                .with_scattering_length(scattering_length)
        )
    }

    /// Construct a two-dimensional grid with default atom number and
    /// transverse length.
    pub fn new_2d(n: usize, dx: f64, scattering_length: f64)
        -> Result<Self, ConfigError>
    {
        Self::new(
            GridParams::default()
                .with_dim(2)
                .with_n(n)
                .with_dx(dx)
                .with_scattering_length(scattering_length)
        )
    }

    pub fn params(&self) -> &GridParams { &self.params }

    pub fn dim(&self) -> usize { self.params.dim }

    pub fn n(&self) -> usize { self.params.n }

    pub fn dx(&self) -> f64 { self.params.dx }

    pub fn scattering_length(&self) -> f64 { self.params.scattering_length }

    /// Nonlinearity coefficient *g* appearing in front of |ψ|² in the GP
    /// equation.
    pub fn nonlinearity(&self) -> f64 { self.g }

    /// Length of the periodic box along each axis.
    pub fn extent(&self) -> f64 { self.params.n as f64 * self.params.dx }

    /// Volume element `dx^dim`.
    pub fn cell_volume(&self) -> f64 { self.params.dx.powi(self.params.dim as i32) }

    /// Shape of every array living on this grid.
    pub fn shape(&self) -> Vec<usize> { vec![self.params.n; self.params.dim] }

    /// Total number of grid points.
    pub fn len(&self) -> usize { self.params.n.pow(self.params.dim as u32) }

    /// Real-space coordinates along `axis`.
    ///
    /// Every axis shares the same `n` and `dx`, so this is the same array for
    /// every valid `axis`; `axis` is only checked against the dimensionality.
    ///
    /// *Panics if `axis` is not less than the grid dimensionality.*
    pub fn coords(&self, axis: usize) -> nd::ArrayView1<f64> {
        assert!(axis < self.params.dim, "GridModel::coords: axis out of range");
        self.x.view()
    }

    /// Angular wavenumbers along `axis`, in FFT order.
    ///
    /// As with [`coords`][Self::coords], all axes share one array.
    ///
    /// *Panics if `axis` is not less than the grid dimensionality.*
    pub fn wavenumbers(&self, axis: usize) -> nd::ArrayView1<f64> {
        assert!(axis < self.params.dim, "GridModel::wavenumbers: axis out of range");
        self.k.view()
    }

    /// Build an array on this grid by evaluating `f` at every point's
    /// coordinates.
    pub fn sample<F, A>(&self, mut f: F) -> nd::ArrayD<A>
    where F: FnMut(&[f64]) -> A
    {
        let mut pos: Vec<f64> = vec![0.0; self.params.dim];
        nd::ArrayD::from_shape_fn(nd::IxDyn(&self.shape()), |ix| {
            pos.iter_mut().enumerate()
                .for_each(|(i, p)| { *p = self.x[ix[i]]; });
            f(&pos)
        })
    }

    /// Like [`Self::sample`], but over the wavenumber grid.
    pub fn sample_k<F, A>(&self, mut f: F) -> nd::ArrayD<A>
    where F: FnMut(&[f64]) -> A
    {
        let mut kpos: Vec<f64> = vec![0.0; self.params.dim];
        nd::ArrayD::from_shape_fn(nd::IxDyn(&self.shape()), |ix| {
            kpos.iter_mut().enumerate()
                .for_each(|(i, p)| { *p = self.k[ix[i]]; });
            f(&kpos)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn k_grid_follows_fft_order() {
        let grid = GridModel::new_1d(4, 0.25, 0.0).unwrap();
        let k: Vec<f64> = grid.wavenumbers(0).iter().map(|kj| kj / TAU).collect();
        assert_eq!(k, vec![0.0, 1.0, -2.0, -1.0]);
    }

    #[test]
    fn coords_are_centered() {
        let grid = GridModel::new_1d(256, 0.05, 0.006).unwrap();
        let x = grid.coords(0);
        assert_abs_diff_eq!(x[128], 0.0);
        assert_abs_diff_eq!(x[0], -6.4, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.extent(), 12.8, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.nonlinearity(), 0.012, epsilon = 1e-15);
    }

    #[test]
    fn two_dimensional_shape() {
        let grid = GridModel::new_2d(16, 0.5, 0.01).unwrap();
        assert_eq!(grid.shape(), vec![16, 16]);
        assert_eq!(grid.len(), 256);
        assert_abs_diff_eq!(grid.cell_volume(), 0.25);
        let r2 = grid.sample(|p| p[0].powi(2) + p[1].powi(2));
        assert_eq!(r2.shape(), &[16, 16]);
        assert_abs_diff_eq!(r2[[8, 8]], 0.0);
        assert_abs_diff_eq!(r2[[0, 8]], 16.0);
        assert_abs_diff_eq!(
            grid.nonlinearity(), (8.0 * PI).sqrt() * 0.01, epsilon = 1e-15);
        assert_eq!(grid.coords(0), grid.coords(1));
        assert_eq!(grid.wavenumbers(0), grid.wavenumbers(1));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            GridModel::new(GridParams::default().with_dim(3)),
            Err(ConfigError::BadDimension(3))
        ));
        assert!(matches!(
            GridModel::new(GridParams::default().with_dim(0)),
            Err(ConfigError::BadDimension(0))
        ));
        assert!(matches!(
            GridModel::new_1d(0, 0.1, 0.0),
            Err(ConfigError::BadPointCount(0))
        ));
        assert!(matches!(
            GridModel::new_1d(64, -0.1, 0.0),
            Err(ConfigError::BadSpacing(_))
        ));
        assert!(matches!(
            GridModel::new(GridParams::default().with_atom_number(0.0)),
            Err(ConfigError::BadGridParam("atom_number", _))
        ));
    }
}
