use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use gpspace::{
    ConfigError,
    GPError,
    grid::GridModel,
    ground::GroundStateSolver,
    observables,
    potential::{ Harmonic, PotentialField },
    propagator::{ Method, Propagator, TimeAxis },
    utils::{ l2_distance, wf_renormalize },
    wavefunction,
};

const N: usize = 256;
const DX: f64 = 0.05;
const A_S: f64 = 0.006;

fn setup() -> (GridModel, PotentialField) {
    let grid = GridModel::new_1d(N, DX, A_S).unwrap();
    let v = PotentialField::sample(&Harmonic::symmetric(1.0), &grid).unwrap();
    (grid, v)
}

#[test]
fn weakly_interacting_ground_state() {
    let (grid, v) = setup();
    let guess = wavefunction::gaussian(&grid, &[0.0], 1.5);
    let dt = DX.powi(2) / 10.0;
    let gs = GroundStateSolver::new(&grid, &v, Method::SSFM)
        .solve(&guess, dt, 1e-5)
        .unwrap();

    assert!(gs.delta < 1e-5);
    assert!(gs.iters > 1);
    assert_abs_diff_eq!(gs.time, gs.iters as f64 * dt, epsilon = 1e-9);
    assert_abs_diff_eq!(observables::norm(&grid, &gs.psi), 1.0, epsilon = 1e-10);

    // repulsion raises the energy slightly above the oscillator value, and the
    // chemical potential counts the interaction twice
    assert!(gs.energy > 0.5 && gs.energy < 0.51);
    assert!(gs.chemical_potential > gs.energy);

    // symmetric, peaked at the trap center
    assert_abs_diff_eq!(observables::mean_position(&grid, &gs.psi, 0).unwrap(), 0.0, epsilon = 1e-6);
    let rho = observables::density(&gs.psi);
    let peak
        = rho.iter().enumerate()
        .fold((0, 0.0), |acc, (i, &r)| if r > acc.1 { (i, r) } else { acc });
    assert_eq!(peak.0, N / 2);

    // stationary: one more step changes it by less than the threshold times dt
    let prop = Propagator::new(&grid, &v, Method::SSFM, TimeAxis::Imaginary).unwrap();
    let mut next = gs.psi.clone();
    prop.step(&mut next, dt).unwrap();
    wf_renormalize(&mut next, grid.cell_volume());
    assert!(l2_distance(&next, &gs.psi, grid.cell_volume()) < 1e-5 * dt);

    // agrees with a much tighter solve at a coarser step
    let reference = GroundStateSolver::new(&grid, &v, Method::SSFM)
        .solve(&guess, 2e-3, 1e-9)
        .unwrap();
    assert!(l2_distance(&gs.psi, &reference.psi, grid.cell_volume()) < 1e-3);
    assert_abs_diff_eq!(gs.energy, reference.energy, epsilon = 1e-6);
    assert_abs_diff_eq!(
        gs.chemical_potential, reference.chemical_potential, epsilon = 1e-5);
}

#[test]
fn stopping_point_does_not_depend_on_step_size() {
    let (grid, v) = setup();
    let guess = wavefunction::gaussian(&grid, &[0.0], 1.5);
    let solver = GroundStateSolver::new(&grid, &v, Method::RK4IP);
    let coarse = solver.solve(&guess, 1e-2, 1e-6).unwrap();
    let fine = solver.solve(&guess, 1e-3, 1e-6).unwrap();
    assert!(fine.iters > coarse.iters);
    assert_abs_diff_eq!(coarse.energy, fine.energy, epsilon = 1e-8);
    assert!(l2_distance(&coarse.psi, &fine.psi, grid.cell_volume()) < 1e-5);
}

#[test]
fn ground_state_is_deterministic() {
    let (grid, v) = setup();
    let guess = wavefunction::gaussian(&grid, &[0.3], 1.2);
    let solver = GroundStateSolver::new(&grid, &v, Method::RK4IP);
    let a = solver.solve(&guess, 1e-3, 1e-5).unwrap();
    let b = solver.solve(&guess, 1e-3, 1e-5).unwrap();
    assert_eq!(a.iters, b.iters);
    assert_eq!(a.psi, b.psi);
    assert_eq!(a.energy, b.energy);
}

#[test]
fn methods_agree() {
    let (grid, v) = setup();
    let guess = wavefunction::gaussian(&grid, &[0.0], 1.2);
    let ssfm = GroundStateSolver::new(&grid, &v, Method::SSFM)
        .solve(&guess, 1e-3, 1e-6)
        .unwrap();
    let rk4ip = GroundStateSolver::new(&grid, &v, Method::RK4IP)
        .solve(&guess, 1e-3, 1e-6)
        .unwrap();
    assert_abs_diff_eq!(ssfm.energy, rk4ip.energy, epsilon = 1e-5);
    assert!(l2_distance(&ssfm.psi, &rk4ip.psi, grid.cell_volume()) < 1e-2);
}

#[test]
fn adaptive_ground_state() {
    let (grid, v) = setup();
    let guess = wavefunction::gaussian(&grid, &[0.0], 1.5);
    let gs = GroundStateSolver::new(&grid, &v, Method::SSFM)
        .with_adaptive(1e-6)
        .solve(&guess, 1e-2, 1e-5)
        .unwrap();
    assert!(gs.delta < 1e-5);
    assert_abs_diff_eq!(gs.energy, 0.5, epsilon = 1e-2);
    assert_abs_diff_eq!(observables::norm(&grid, &gs.psi), 1.0, epsilon = 1e-10);
}

#[test]
fn iteration_budget_is_enforced() {
    let (grid, v) = setup();
    let guess = wavefunction::gaussian(&grid, &[0.0], 1.5);
    let res = GroundStateSolver::new(&grid, &v, Method::SSFM)
        .with_maxiters(5)
        .solve(&guess, 2.5e-4, 1e-12);
    match res {
        Err(GPError::NonConvergence { iters, delta, best }) => {
            assert_eq!(iters, 5);
            assert!(delta >= 1e-12);
            assert_eq!(best.iters, 5);
            assert_abs_diff_eq!(
                observables::norm(&grid, &best.psi), 1.0, epsilon = 1e-10);
        },
        other => panic!("expected non-convergence, got {:?}", other),
    }
}

#[test]
fn bad_inputs_are_configuration_errors() {
    let (grid, v) = setup();
    let solver = GroundStateSolver::new(&grid, &v, Method::SSFM);

    let zero: nd::ArrayD<C64> = nd::ArrayD::zeros(nd::IxDyn(&[N]));
    assert!(matches!(
        solver.solve(&zero, 1e-3, 1e-5),
        Err(GPError::Config(ConfigError::ZeroNorm(_)))
    ));

    let nan: nd::ArrayD<C64> = nd::ArrayD::from_elem(nd::IxDyn(&[N]), C64::new(f64::NAN, 0.0));
    assert!(matches!(
        solver.solve(&nan, 1e-3, 1e-5),
        Err(GPError::Config(ConfigError::ZeroNorm(_)))
    ));

    let wrong: nd::ArrayD<C64> = nd::ArrayD::ones(nd::IxDyn(&[N / 2]));
    assert!(matches!(
        solver.solve(&wrong, 1e-3, 1e-5),
        Err(GPError::Config(ConfigError::Shape(_)))
    ));

    let guess = wavefunction::gaussian(&grid, &[0.0], 1.0);
    assert!(matches!(
        solver.clone().with_adaptive(1e-1).solve(&guess, 1e-3, 1e-5),
        Err(GPError::Config(ConfigError::BadStepFloor(..)))
    ));
    assert!(matches!(
        solver.solve(&guess, 0.0, 1e-5),
        Err(GPError::Config(ConfigError::BadStepSize(_)))
    ));
    assert!(matches!(
        solver.solve(&guess, 1e-3, -1.0),
        Err(GPError::Config(ConfigError::BadTolerance(_)))
    ));
    assert!(matches!(
        solver.clone().with_maxiters(0).solve(&guess, 1e-3, 1e-5),
        Err(GPError::Config(ConfigError::BadMaxiters))
    ));
}
