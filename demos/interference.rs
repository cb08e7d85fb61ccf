use std::error::Error;
use gpspace::{
    evolve::{ EvolveParams, TimeEvolutionDriver },
    grid::GridModel,
    ground::GroundStateSolver,
    observables,
    potential::{ Harmonic, PotentialField },
    propagator::Method,
    units::OscillatorUnits,
    wavefunction,
};

// prepare the ground state of a weakly interacting condensate in a harmonic
// trap, split it into two displaced copies, and watch them overlap

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    const N: usize = 256; // grid points
    const DX: f64 = 0.05; // grid spacing; oscillator lengths
    const A_S: f64 = 0.006; // scattering length; oscillator lengths
    const SHIFT: isize = 7; // displacement of each copy; grid points

    // ⁸⁷Rb in a 100 Hz trap
    let uu = OscillatorUnits::from_amu_hz(86.909, 100.0);
    println!("oscillator length: {:.3e} m", uu.a);
    println!("scattering length: {:.3e} m", uu.from_nat_length(A_S));

    let grid = GridModel::new_1d(N, DX, A_S)?;
    let v = PotentialField::sample(&Harmonic::symmetric(1.0), &grid)?;

    // relax a wide Gaussian in imaginary time
    let guess = wavefunction::gaussian(&grid, &[0.0], 1.5);
    let gs = GroundStateSolver::new(&grid, &v, Method::SSFM)
        .solve(&guess, DX.powi(2) / 10.0, 1e-5)?;
    println!(
        "ground state: E = {:.6}, mu = {:.6} after {} iterations",
        gs.energy, gs.chemical_potential, gs.iters,
    );

    // evolve both displaced copies in lockstep
    let left = wavefunction::roll(&gs.psi, 0, -SHIFT);
    let right = wavefunction::roll(&gs.psi, 0, SHIFT);
    let params = EvolveParams::default()
        .with_method(Method::RK4IP)
        .with_dt(DX.powi(2) / 35.0)
        .with_num_steps(250)
        .with_snapshot_count(5);
    let (traj_l, traj_r)
        = TimeEvolutionDriver::new(&grid, &v).evolve_pair(&left, &right, &params)?;

    println!("{:>6} {:>10} {:>10} {:>10} {:>10}", "step", "t", "<x>_L", "<x>_R", "contrast");
    for (snap_l, snap_r) in traj_l.iter().zip(&traj_r) {
        // density of the equal superposition, normalized to its peak
        let rho: Vec<f64>
            = snap_l.psi.iter().zip(snap_r.psi.iter())
            .map(|(l, r)| 0.5 * (l + r).norm_sqr())
            .collect();
        let max = rho.iter().copied().fold(0.0, f64::max);
        let min
            = rho[N / 2 - SHIFT as usize..N / 2 + SHIFT as usize].iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        println!(
            "{:>6} {:>10.5} {:>10.5} {:>10.5} {:>10.5}",
            snap_l.step,
            snap_l.time,
            observables::mean_position(&grid, &snap_l.psi, 0)?,
            observables::mean_position(&grid, &snap_r.psi, 0)?,
            (max - min) / (max + min),
        );
    }
    Ok(())
}
