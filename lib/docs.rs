//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Reduced dimensions](#reduced-dimensions)
//! - [Time dependence](#time-dependence)
//! - [Imaginary time](#imaginary-time)
//! - [Step size control](#step-size-control)
//!
//! # Background
//! A dilute Bose gas cooled far below its condensation temperature is well
//! described by a single macroscopic wavefunction *ψ*(**r**, *t*), normalized
//! to the number of atoms *N*, obeying the Gross-Pitaevskii (GP) equation
//! ```text
//!   ∂ψ      ħ²
//! iħ -- = - --- ∇²ψ + V(r) ψ + g₃ |ψ|² ψ
//!   ∂t      2 m
//!
//! g₃ = 4π ħ² a_s / m
//! ```
//! where *V* is the external trapping potential and *a*<sub>s</sub> is the
//! s-wave scattering length characterizing low-energy collisions between
//! atoms. The last term is a mean-field description of those collisions; it is
//! repulsive for *a*<sub>s</sub> > 0 and makes the equation nonlinear, so that
//! solutions cannot be built out of a superposition of eigenstates as they can
//! for the ordinary Schrödinger equation.
//!
//! Stationary states evolve only by a global phase, *ψ*(**r**, *t*) =
//! *ψ*(**r**) exp(−i *μ* *t* / *ħ*), where the chemical potential *μ* plays the
//! role of the eigenvalue:
//! ```text
//!     ħ²
//! (- --- ∇² + V + g₃ |ψ|²) ψ = μ ψ
//!    2 m
//! ```
//! The energy per particle differs from *μ* in that the interaction term is
//! counted with a factor ½, since each pair interaction is shared by two atoms:
//! ```text
//!         ⌠  ħ²                      1
//! E N  =  ⎮ --- |∇ψ|² + V |ψ|²  +  - g₃ |ψ|⁴  d³r
//!         ⌡ 2 m                      2
//! ```
//! See [`observables`][crate::observables].
//!
//! # Units
//! Everything in this crate works in oscillator units defined by a reference
//! trap frequency *ω* and atomic mass *m*:
//! ```text
//! length  a = √(ħ / m ω)
//! energy  ε = ħ ω
//! time    τ = 1 / ω
//! ```
//! Lengths, energies, and times are divided by these scales, and the
//! wavefunction is divided by √*N* so that it is normalized to unity. The GP
//! equation then becomes
//! ```text
//!   ∂ψ     1
//! i -- = - - ∇²ψ + V ψ + g |ψ|² ψ
//!   ∂t     2
//! ```
//! in which a harmonic trap of the reference frequency reads *V* = *r*²/2 and
//! has ground-state energy 1/2 per dimension in the absence of interactions.
//!
//! Items in [`units`][crate::units] are provided to handle the minutiae
//! associated with conversion to and from oscillator units.
//!
//! # Reduced dimensions
//! When the trap is much tighter along some directions than others, motion
//! along the tight directions is frozen into the transverse oscillator ground
//! state (of length *l*, in units of *a*) and can be integrated out. The
//! result is again a GP equation in the remaining dimension(s) with a rescaled
//! coupling constant:
//! ```text
//! 1D (cigar):     g = 2 a_s N / l²
//! 2D (pancake):   g = √(8π) a_s N / l
//! ```
//! These are computed by [`GridModel`][crate::grid::GridModel] from its
//! parameters.
//!
//! # Time dependence
//! Writing the right-hand side of the GP equation as (*T* + *N*)*ψ*, with
//! kinetic part *T* = −∇²/2 and potential-plus-nonlinear part
//! *N* = *V* + *g*|*ψ*|², each part on its own is trivial to exponentiate. *N*
//! is diagonal in position space and so acts pointwise; *T* is diagonal in
//! momentum space, where it is multiplication by *k*²/2, accessible with the
//! fast Fourier transform:
//! ```text
//!  -i T dt           -i k² dt/2
//! e        ψ = F⁻¹[e           F[ψ](k)]
//! ```
//! On a periodic grid this treats the kinetic term exactly for every
//! resolvable mode, which is the essence of a pseudo-spectral method.
//!
//! **Split-step Fourier method.** Symmetric (Strang) splitting sandwiches the
//! pointwise step between two kinetic half steps,
//! ```text
//!               -i T dt/2  -i N dt  -i T dt/2
//! ψ(t + dt) = [e          e        e         ] ψ(t) + O(dt³)
//! ```
//! which cancels the leading commutator error and makes the method second
//! order overall. Every factor is unitary, so the norm is preserved to
//! round-off in real time regardless of step size.
//!
//! Using this scheme, taking a step *dt* in time looks like this:
//! ```text
//!        ψ(t, x)
//!           |
//!           '--> FFT ---.
//!                       |
//!                       V
//!                  -i k² dt/4
//!                 e
//!                       |
//!           .-- iFFT <--'
//!           |
//!           V
//!   -i (V + g|ψ|²) dt
//!  e
//!           |
//!           '--> FFT ---.
//!                       |
//!                       V
//!                  -i k² dt/4
//!                 e
//!                       |
//!           .-- iFFT <--'
//!           |
//!           V
//!     ψ(t + dt, x)
//! ```
//!
//! **Runge-Kutta in the interaction picture.** Alternatively, the kinetic
//! evolution can be factored out exactly by working in the interaction picture
//! with respect to *T*, leaving an equation driven only by *N* that is
//! integrated with the classical fourth-order Runge-Kutta scheme[^1]. With the
//! interaction frame anchored at the midpoint of the step, and writing
//! *D* = exp(−i *T* *dt*/2),
//! ```text
//! ψ_I = D ψ
//! k₁  = D [dt N(ψ)]
//! k₂  = dt N(ψ_I + k₁/2)
//! k₃  = dt N(ψ_I + k₂/2)
//! k₄  = dt N(D (ψ_I + k₃))
//! ψ(t + dt) = D (ψ_I + k₁/6 + k₂/3 + k₃/3) + k₄/6
//! ```
//! where *N*(*ψ*) = −i (*V* + *g*|*ψ*|²) *ψ*. This is fourth order in *dt* at
//! the price of four evaluations of *N* and eight Fourier transforms per step,
//! and is not exactly norm-preserving.
//!
//! # Imaginary time
//! Substituting *t* → −i *t* turns every factor exp(−i *H* *dt*) above into
//! exp(−*H* *dt*). Expanding a trial state in (instantaneous) eigenstates of
//! the Hamiltonian, each component is then multiplied by exp(−*E*ₙ *dt*), so
//! excited components decay relative to the ground state at a rate set by the
//! gap. Renormalizing after every step keeps the state from decaying away
//! entirely, and repeated steps converge to the ground state for any trial
//! state with nonzero overlap with it[^2]. Both integrators are used unchanged
//! apart from the time coefficient; see
//! [`TimeAxis`][crate::propagator::TimeAxis] and
//! [`GroundStateSolver`][crate::ground::GroundStateSolver].
//!
//! # Step size control
//! Local errors are estimated by step doubling. From the same state, one step
//! of size *dt* gives *ψ*<sub>1</sub> and two steps of size *dt*/2 give
//! *ψ*<sub>2</sub>. For a method of order *p*, the leading error of
//! *ψ*<sub>2</sub> is
//! ```text
//!        ‖ψ₂ − ψ₁‖
//! err ≈ ----------
//!        2ᵖ − 1
//! ```
//! If this (relative to ‖*ψ*<sub>2</sub>‖) is within tolerance, *ψ*<sub>2</sub>
//! is kept and the next step size is grown by a safety-limited factor of
//! (tol/err)<sup>1/(*p* + 1)</sup>; otherwise the step is retried from the same
//! state with half the step size. See
//! [`AdaptiveStepController`][crate::adaptive::AdaptiveStepController].
//!
//! [^1]: J. Hult, "A fourth-order Runge-Kutta in the interaction picture method
//! for simulating supercontinuum generation in optical fibers." J. Lightwave
//! Technol. **25** 12 3770-3775 (2007).
//!
//! [^2]: M. L. Chiofalo, S. Succi, and M. P. Tosi, "Ground state of trapped
//! interacting Bose-Einstein condensates by an explicit imaginary-time
//! algorithm." Phys. Rev. E **62** 7438 (2000).
