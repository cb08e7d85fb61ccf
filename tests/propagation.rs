use std::f64::consts::TAU;
use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use gpspace::{
    grid::GridModel,
    observables,
    potential::{ Free, Harmonic, PotentialField },
    propagator::{ Method, Propagator, TimeAxis },
    utils::rel_l2_distance,
    wavefunction,
};

// harmonic trap with g = 1
fn trapped() -> (GridModel, PotentialField) {
    let grid = GridModel::new_1d(128, 0.1, 0.5).unwrap();
    let v = PotentialField::sample(&Harmonic::symmetric(1.0), &grid).unwrap();
    (grid, v)
}

fn run(prop: &Propagator, psi0: &nd::ArrayD<C64>, dt: f64, steps: usize)
    -> nd::ArrayD<C64>
{
    let mut psi = psi0.clone();
    (0..steps).for_each(|_| prop.step(&mut psi, dt).unwrap());
    psi
}

#[test]
fn real_time_conserves_norm() {
    let (grid, v) = trapped();
    let psi0 = wavefunction::gaussian(&grid, &[1.0], 0.8);
    for (method, tol) in [(Method::SSFM, 1e-10), (Method::RK4IP, 1e-8)] {
        let prop = Propagator::new(&grid, &v, method, TimeAxis::Real).unwrap();
        let psi = run(&prop, &psi0, 1e-3, 200);
        assert_abs_diff_eq!(observables::norm(&grid, &psi), 1.0, epsilon = tol);
    }
}

#[test]
fn free_plane_wave_picks_up_exact_phase() {
    let grid = GridModel::new_1d(64, 0.1, 0.0).unwrap();
    let v = PotentialField::sample(&Free, &grid).unwrap();
    let psi0 = wavefunction::plane_wave(&grid, &[3]);
    let k0 = TAU * 3.0 / grid.extent();
    let dt = 0.01;
    let phase = C64::cis(-0.5 * k0 * k0 * dt);
    for method in [Method::SSFM, Method::RK4IP] {
        let prop = Propagator::new(&grid, &v, method, TimeAxis::Real).unwrap();
        let psi = run(&prop, &psi0, dt, 1);
        nd::Zip::from(&psi).and(&psi0)
            .for_each(|q, q0| {
                assert_abs_diff_eq!((q - phase * q0).norm(), 0.0, epsilon = 1e-12);
            });
    }
}

#[test]
fn free_plane_wave_decays_exactly_in_imaginary_time() {
    let grid = GridModel::new_1d(64, 0.1, 0.0).unwrap();
    let v = PotentialField::sample(&Free, &grid).unwrap();
    let psi0 = wavefunction::plane_wave(&grid, &[3]);
    let k0 = TAU * 3.0 / grid.extent();
    let dt = 0.01;
    let decay = C64::from((-0.5 * k0 * k0 * dt).exp());
    for method in [Method::SSFM, Method::RK4IP] {
        let prop = Propagator::new(&grid, &v, method, TimeAxis::Imaginary).unwrap();
        let psi = run(&prop, &psi0, dt, 1);
        nd::Zip::from(&psi).and(&psi0)
            .for_each(|q, q0| {
                assert_abs_diff_eq!((q - decay * q0).norm(), 0.0, epsilon = 1e-12);
            });
    }
}

#[test]
fn imaginary_time_damps_norm() {
    let (grid, v) = trapped();
    let psi0 = wavefunction::gaussian(&grid, &[0.0], 1.0);
    let prop = Propagator::new(&grid, &v, Method::SSFM, TimeAxis::Imaginary).unwrap();
    let psi = run(&prop, &psi0, 1e-2, 10);
    // E ≥ 1/2, so the norm decays at least as fast as exp(−2 E t)
    assert!(observables::norm(&grid, &psi) < (-0.1_f64).exp());
}

fn convergence_ratio(method: Method, dt: f64) -> f64 {
    const T: f64 = 0.4;
    let (grid, v) = trapped();
    let psi0 = wavefunction::gaussian(&grid, &[1.0], 1.0);
    let reference = {
        let prop = Propagator::new(&grid, &v, Method::RK4IP, TimeAxis::Real).unwrap();
        run(&prop, &psi0, 1e-3, (T / 1e-3).round() as usize)
    };
    let prop = Propagator::new(&grid, &v, method, TimeAxis::Real).unwrap();
    let coarse = run(&prop, &psi0, dt, (T / dt).round() as usize);
    let fine = run(&prop, &psi0, dt / 2.0, (2.0 * T / dt).round() as usize);
    rel_l2_distance(&reference, &coarse) / rel_l2_distance(&reference, &fine)
}

#[test]
fn ssfm_is_second_order() {
    let ratio = convergence_ratio(Method::SSFM, 0.02);
    assert!((3.2..4.8).contains(&ratio), "ratio = {}", ratio);
}

#[test]
fn rk4ip_is_fourth_order() {
    let ratio = convergence_ratio(Method::RK4IP, 0.02);
    assert!((10.0..22.0).contains(&ratio), "ratio = {}", ratio);
}

#[test]
fn two_dimensional_step() {
    let grid = GridModel::new_2d(32, 0.3, 0.01).unwrap();
    let v = PotentialField::sample(&Harmonic::cigar(1.0, 2.0), &grid).unwrap();
    let psi0 = wavefunction::gaussian(&grid, &[0.5, 0.0], 1.0);
    for method in [Method::SSFM, Method::RK4IP] {
        let prop = Propagator::new(&grid, &v, method, TimeAxis::Real).unwrap();
        let psi = run(&prop, &psi0, 1e-3, 50);
        assert_eq!(psi.shape(), &[32, 32]);
        assert_abs_diff_eq!(observables::norm(&grid, &psi), 1.0, epsilon = 1e-8);
        // released from x = 0.5 toward the trap center
        assert!(observables::mean_position(&grid, &psi, 0).unwrap() < 0.5);
        assert_abs_diff_eq!(
            observables::mean_position(&grid, &psi, 1).unwrap(), 0.0, epsilon = 1e-10);
    }
}
