#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for the numerical solution of
//! the Gross-Pitaevskii (GP) equation for one- and two-dimensional
//! Bose-Einstein condensates on uniform, periodic grids via pseudo-spectral
//! methods.
//!
//! Provides implementations for the following numerical routines:
//! - Time-dependent (real or imaginary time):
//!     - Pseudo-spectral split-step Fourier method (SSFM)
//!     - Fourth-order Runge-Kutta in the interaction picture (RK4IP)
//!     - Step-doubling adaptive stepsize control for either of the above
//! - Stationary:
//!     - Ground states via normalized imaginary-time propagation
//!
//! ```
//! use gpspace::{
//!     evolve::{ EvolveParams, TimeEvolutionDriver },
//!     grid::GridModel,
//!     ground::GroundStateSolver,
//!     potential::{ Harmonic, PotentialField },
//!     propagator::Method,
//!     wavefunction,
//! };
//!
//! let grid = GridModel::new_1d(128, 0.1, 0.006).unwrap();
//! let v = PotentialField::sample(&Harmonic::symmetric(1.0), &grid).unwrap();
//! let guess = wavefunction::gaussian(&grid, &[0.0], 1.5);
//! let gs = GroundStateSolver::new(&grid, &v, Method::SSFM)
//!     .solve(&guess, 1e-2, 1e-6)
//!     .unwrap();
//! assert!((gs.energy - 0.5).abs() < 1e-2);
//!
//! let moved = wavefunction::roll(&gs.psi, 0, 5);
//! let params = EvolveParams::default()
//!     .with_method(Method::RK4IP)
//!     .with_dt(1e-3)
//!     .with_num_steps(100)
//!     .with_snapshot_count(4);
//! let snapshots = TimeEvolutionDriver::new(&grid, &v)
//!     .evolve(&moved, &params)
//!     .unwrap();
//! assert_eq!(snapshots.len(), 4);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod units;
pub mod utils;
pub mod grid;
pub mod potential;
pub mod spectral;
pub mod wavefunction;
pub mod observables;
pub mod propagator;
pub mod adaptive;
pub mod ground;
pub mod evolve;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-6;
pub(crate) const DEF_MAXITERS: usize = 100_000;
pub(crate) const DEF_DT: f64 = 1e-3;

pub use error::{ ConfigError, GPError, GPResult };
pub use wavefunction::WaveFunction;
