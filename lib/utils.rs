//! Miscellaneous tools.

use std::sync::Arc;
use ndarray::{ self as nd, concatenate };
use num_complex::Complex64 as C64;
use num_traits::Zero;
use rustfft::{ Fft, Length };

/// Calculate the norm of a wavefunction, i.e. ∑|q|² times the volume element
/// `dv`.
///
/// For periodic grids this rectangle rule is spectrally accurate and is exactly
/// the quantity conserved by unitary pseudo-spectral steps.
pub fn wf_norm<S, D>(q: &nd::ArrayBase<S, D>, dv: f64) -> f64
where
    S: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    dv * q.iter().map(|qk| qk.norm_sqr()).sum::<f64>()
}

/// Calculate the inner product ⟨q|p⟩ of two wavefunctions.
///
/// *Panics if the arrays have different shapes.*
pub fn wf_dot<S, T, D>(
    q: &nd::ArrayBase<S, D>,
    p: &nd::ArrayBase<T, D>,
    dv: f64,
) -> C64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    let mut acc = C64::zero();
    nd::Zip::from(q).and(p)
        .for_each(|qk, pk| { acc += qk.conj() * pk; });
    acc * dv
}

/// Renormalize a wavefunction in place, returning the norm it had before.
///
/// A zero-norm wavefunction is turned into NaNs, which are caught by the
/// finite-value checks downstream.
pub fn wf_renormalize<S, D>(q: &mut nd::ArrayBase<S, D>, dv: f64) -> f64
where
    S: nd::DataMut<Elem = C64>,
    D: nd::Dimension,
{
    let norm = wf_norm(q, dv);
    let scale = norm.sqrt().recip();
    q.map_inplace(|qk| { *qk *= scale; });
    norm
}

/// Calculate the L2 distance ‖q − p‖ between two wavefunctions.
///
/// *Panics if the arrays have different shapes.*
pub fn l2_distance<S, T, D>(
    q: &nd::ArrayBase<S, D>,
    p: &nd::ArrayBase<T, D>,
    dv: f64,
) -> f64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    let mut acc: f64 = 0.0;
    nd::Zip::from(q).and(p)
        .for_each(|qk, pk| { acc += (qk - pk).norm_sqr(); });
    (acc * dv).sqrt()
}

/// Calculate the L2 distance between two wavefunctions relative to the norm of
/// the first, falling back to the absolute distance if `q` vanishes.
///
/// *Panics if the arrays have different shapes.*
pub fn rel_l2_distance<S, T, D>(q: &nd::ArrayBase<S, D>, p: &nd::ArrayBase<T, D>)
    -> f64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    let diff = l2_distance(q, p, 1.0);
    let scale = wf_norm(q, 1.0).sqrt();
    if scale > 0.0 { diff / scale } else { diff }
}

/// Return `true` if every element of `q` is finite.
pub fn is_finite<S, D>(q: &nd::ArrayBase<S, D>) -> bool
where
    S: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    q.iter().all(|qk| qk.re.is_finite() && qk.im.is_finite())
}

// perform the operation `a + v * b` succinctly
pub(crate) fn array_step<S, T, D>(
    a: &nd::ArrayBase<S, D>,
    v: f64,
    b: &nd::ArrayBase<T, D>,
) -> nd::Array<C64, D>
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    nd::Zip::from(a).and(b)
        .map_collect(|ak, bk| ak + v * bk)
}

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling interval `dt`.
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    if n % 2 == 0 {
        let fp: nd::Array1<f64>
            = (0..n / 2)
            .map(|k| k as f64 / (n as f64 * dt))
            .collect();
        let fm: nd::Array1<f64>
            = (1..n / 2 + 1).rev()
            .map(|k| -(k as f64) / (n as f64 * dt))
            .collect();
        concatenate!(nd::Axis(0), fp, fm)
    } else {
        let fp: nd::Array1<f64>
            = (0..(n + 1) / 2)
            .map(|k| k as f64 / (n as f64 * dt))
            .collect();
        let fm: nd::Array1<f64>
            = (1..(n + 1) / 2).rev()
            .map(|k| -(k as f64) / (n as f64 * dt))
            .collect();
        concatenate!(nd::Axis(0), fp, fm)
    }
}

/// Apply a one-dimensional FFT plan along every axis of `x` in place.
///
/// Contiguous lanes are transformed directly; strided lanes (e.g. columns of a
/// row-major 2D array) go through a copy buffer. No normalization is applied.
///
/// *Panics if any axis of `x` differs in length from the plan.*
pub fn fft_all_axes<S, D>(x: &mut nd::ArrayBase<S, D>, plan: &Arc<dyn Fft<f64>>)
where
    S: nd::DataMut<Elem = C64>,
    D: nd::Dimension,
{
    let n = plan.len();
    let mut buf: Vec<C64> = vec![C64::zero(); n];
    let mut scratch: Vec<C64> = vec![C64::zero(); plan.get_inplace_scratch_len()];
    for axis in 0..x.ndim() {
        assert_eq!(x.len_of(nd::Axis(axis)), n, "fft_all_axes: axis length mismatch");
        for mut lane in x.lanes_mut(nd::Axis(axis)) {
            match lane.as_slice_mut() {
                Some(slice) => plan.process_with_scratch(slice, &mut scratch),
                None => {
                    buf.iter_mut().zip(lane.iter())
                        .for_each(|(bk, lk)| { *bk = *lk; });
                    plan.process_with_scratch(&mut buf, &mut scratch);
                    lane.iter_mut().zip(&buf)
                        .for_each(|(lk, bk)| { *lk = *bk; });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fft_freq_ordering() {
        let f = fft_freq(4, 0.25);
        assert_eq!(f.to_vec(), vec![0.0, 1.0, -2.0, -1.0]);
        let f = fft_freq(5, 1.0);
        assert_eq!(f.to_vec(), vec![0.0, 0.2, 0.4, -0.4, -0.2]);
    }

    #[test]
    fn renormalize_returns_old_norm() {
        let mut q: nd::Array1<C64> = nd::Array1::from_elem(10, C64::new(1.0, 1.0));
        let old = wf_renormalize(&mut q, 0.5);
        assert_abs_diff_eq!(old, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wf_norm(&q, 0.5), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wf_dot(&q, &q, 0.5).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn strided_lanes_match_contiguous() {
        let mut planner = rustfft::FftPlanner::new();
        let plan = planner.plan_fft_forward(4);
        let a: nd::Array2<C64>
            = nd::Array2::from_shape_fn((4, 4), |(i, j)| {
                C64::new(i as f64 + 0.5 * j as f64, (i * j) as f64)
            });
        let mut b = a.clone();
        fft_all_axes(&mut b, &plan);
        let mut c = a.t().to_owned();
        fft_all_axes(&mut c, &plan);
        nd::Zip::from(&b).and(&c.t())
            .for_each(|bk, ck| {
                assert_abs_diff_eq!(bk.re, ck.re, epsilon = 1e-12);
                assert_abs_diff_eq!(bk.im, ck.im, epsilon = 1e-12);
            });
    }
}
