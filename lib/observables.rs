//! Expectation values of a wavefunction on its grid.
//!
//! All quantities are divided by the norm of the wavefunction, so they can be
//! evaluated on unnormalized states. Arrays that do not match the grid give
//! [`ConfigError::Shape`].

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ ConfigError, ShapeError },
    grid::GridModel,
    potential::PotentialField,
    spectral::SpectralOps,
    utils::{ wf_dot, wf_norm },
};

/// Norm ∑|ψ|² dV.
pub fn norm<S>(grid: &GridModel, psi: &nd::ArrayBase<S, nd::IxDyn>) -> f64
where S: nd::Data<Elem = C64>
{
    wf_norm(psi, grid.cell_volume())
}

/// Probability density |ψ|².
pub fn density<S>(psi: &nd::ArrayBase<S, nd::IxDyn>) -> nd::ArrayD<f64>
where S: nd::Data<Elem = C64>
{
    psi.mapv(|qk| qk.norm_sqr())
}

// per-particle expectation of T + V + a g |ψ|²
fn hamiltonian_expectation<S>(
    grid: &GridModel,
    ops: &SpectralOps,
    potential: &PotentialField,
    psi: &nd::ArrayBase<S, nd::IxDyn>,
    a: f64,
) -> Result<f64, ConfigError>
where S: nd::Data<Elem = C64>
{
    ShapeError::check(&grid.shape(), psi)?;
    ShapeError::check(&grid.shape(), potential.values())?;
    let g = grid.nonlinearity();
    let tpsi = ops.kinetic(psi)?;
    let mut acc: f64 = 0.0;
    nd::Zip::from(psi).and(&tpsi).and(potential.values())
        .for_each(|qk, tk, vk| {
            let rho = qk.norm_sqr();
            acc += (qk.conj() * tk).re + (vk + a * g * rho) * rho;
        });
    Ok(acc * grid.cell_volume() / norm(grid, psi))
}

/// Mean-field energy per particle,
/// ```text
/// E = ∫ [ ψ* T ψ + V |ψ|² + ½ g |ψ|⁴ ] dV / N
/// ```
pub fn energy<S>(
    grid: &GridModel,
    ops: &SpectralOps,
    potential: &PotentialField,
    psi: &nd::ArrayBase<S, nd::IxDyn>,
) -> Result<f64, ConfigError>
where S: nd::Data<Elem = C64>
{
    hamiltonian_expectation(grid, ops, potential, psi, 0.5)
}

/// Chemical potential,
/// ```text
/// μ = ∫ [ ψ* T ψ + V |ψ|² + g |ψ|⁴ ] dV / N
/// ```
pub fn chemical_potential<S>(
    grid: &GridModel,
    ops: &SpectralOps,
    potential: &PotentialField,
    psi: &nd::ArrayBase<S, nd::IxDyn>,
) -> Result<f64, ConfigError>
where S: nd::Data<Elem = C64>
{
    hamiltonian_expectation(grid, ops, potential, psi, 1.0)
}

/// Expectation value of the position along `axis`.
///
/// Positions are taken in the centered box; a state wrapping across the
/// periodic boundary will not give a meaningful result.
pub fn mean_position<S>(
    grid: &GridModel,
    psi: &nd::ArrayBase<S, nd::IxDyn>,
    axis: usize,
) -> Result<f64, ConfigError>
where S: nd::Data<Elem = C64>
{
    ShapeError::check(&grid.shape(), psi)?;
    let x = grid.coords(axis);
    let mut acc: f64 = 0.0;
    for (j, lane) in psi.axis_iter(nd::Axis(axis)).enumerate() {
        acc += x[j] * lane.iter().map(|qk| qk.norm_sqr()).sum::<f64>();
    }
    Ok(acc * grid.cell_volume() / norm(grid, psi))
}

/// Normalized overlap ⟨a|b⟩ / (‖a‖ ‖b‖) of two wavefunctions.
pub fn overlap<S, T>(
    grid: &GridModel,
    a: &nd::ArrayBase<S, nd::IxDyn>,
    b: &nd::ArrayBase<T, nd::IxDyn>,
) -> Result<C64, ConfigError>
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    ShapeError::check(&grid.shape(), a)?;
    ShapeError::check(&grid.shape(), b)?;
    let dv = grid.cell_volume();
    Ok(wf_dot(a, b, dv) / (wf_norm(a, dv) * wf_norm(b, dv)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::{ potential::Harmonic, wavefunction::{ gaussian, plane_wave } };

    #[test]
    fn harmonic_ground_state_energy() {
        let grid = GridModel::new_1d(256, 0.05, 0.0).unwrap();
        let ops = SpectralOps::new(&grid);
        let v = PotentialField::sample(&Harmonic::symmetric(1.0), &grid).unwrap();
        let psi = gaussian(&grid, &[0.0], 1.0);
        assert_abs_diff_eq!(energy(&grid, &ops, &v, &psi).unwrap(), 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(
            chemical_potential(&grid, &ops, &v, &psi).unwrap(), 0.5, epsilon = 1e-10);
    }

    #[test]
    fn position_of_displaced_packet() {
        let grid = GridModel::new_2d(64, 0.2, 0.0).unwrap();
        let psi = gaussian(&grid, &[1.0, -2.0], 0.8);
        assert_abs_diff_eq!(mean_position(&grid, &psi, 0).unwrap(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mean_position(&grid, &psi, 1).unwrap(), -2.0, epsilon = 1e-9);
    }

    #[test]
    fn overlaps() {
        let grid = GridModel::new_1d(64, 0.1, 0.0).unwrap();
        let a = plane_wave(&grid, &[2]);
        let b = plane_wave(&grid, &[3]);
        assert_abs_diff_eq!(overlap(&grid, &a, &b).unwrap().norm(), 0.0, epsilon = 1e-12);
        // scale-invariant
        let a2 = a.mapv(|qk| qk * 3.0);
        let s = overlap(&grid, &a, &a2).unwrap();
        assert_abs_diff_eq!(s.re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_shapes() {
        let grid = GridModel::new_1d(32, 0.1, 0.0).unwrap();
        let ops = SpectralOps::new(&grid);
        let v = PotentialField::sample(&Harmonic::symmetric(1.0), &grid).unwrap();
        let short: nd::ArrayD<C64> = nd::ArrayD::ones(nd::IxDyn(&[16]));
        let psi = gaussian(&grid, &[0.0], 1.0);
        assert!(matches!(energy(&grid, &ops, &v, &short), Err(ConfigError::Shape(_))));
        assert!(matches!(mean_position(&grid, &short, 0), Err(ConfigError::Shape(_))));
        assert!(matches!(overlap(&grid, &psi, &short), Err(ConfigError::Shape(_))));
    }
}
