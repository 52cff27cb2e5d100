//! Forward and inverse discrete Fourier transform over the configured
//! field, plus polynomial evaluation.
//!
//! The reference (`examples/original_source/libmprio/fft.c`) implements
//! `fft`/`fft_recurse` as an even/odd split-and-combine recursion. This
//! crate keeps the same contract — an `n`-point forward transform maps
//! coefficients to evaluations at `g^0..g^{n-1}`, the inverse does the
//! reverse and scales by `n^{-1}` — but realizes it with the iterative
//! bit-reversal-then-butterfly Cooley–Tukey form the teacher crate already
//! uses in its own NTT (`ntt_in_place`/`intt_in_place`), an equivalent,
//! allocation-light rendering of the same transform.

use ark_ff::{Field as ArkField, One, Zero};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::field::Field;

fn bit_reverse_permute(a: &mut [Field]) {
    let n = a.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            a.swap(i, j);
        }
    }
}

/// In-place iterative Cooley–Tukey transform using `root` as the primitive
/// `n`-th root of unity (`n = a.len()`, a power of two).
fn ntt_in_place(a: &mut [Field], root: Field) {
    let n = a.len();
    debug_assert!(n.is_power_of_two());

    bit_reverse_permute(a);

    let mut len = 2;
    while len <= n {
        let w_len = root.pow([(n / len) as u64]);
        let half = len / 2;
        for start in (0..n).step_by(len) {
            let mut w = Field::one();
            for i in 0..half {
                let u = a[start + i];
                let v = a[start + i + half] * w;
                a[start + i] = u + v;
                a[start + i + half] = u - v;
                w *= w_len;
            }
        }
        len <<= 1;
    }
}

/// Forward transform: `out[i] = sum_j in[j] * root^{i*j}`, i.e. evaluate
/// polynomial coefficients `in` at every `n`-th root of unity.
///
/// `n = points.len()` must be a power of two dividing `cfg.n_roots()`.
pub fn fft(cfg: &Config, points: &[Field], invert: bool) -> Result<Vec<Field>> {
    let n = points.len();
    if n == 0 || !n.is_power_of_two() {
        return Err(Error::Domain("fft length must be a nonzero power of two"));
    }
    let roots = cfg.fft_roots(n, invert)?;
    let root = if n > 1 { roots[1] } else { Field::one() };

    let mut a = points.to_vec();
    ntt_in_place(&mut a, root);

    if invert {
        let n_inv = Field::from(n as u64)
            .inverse()
            .ok_or(Error::Arithmetic("fft length not invertible mod M"))?;
        for x in a.iter_mut() {
            *x *= n_inv;
        }
    }

    Ok(a)
}

/// Evaluate a polynomial given by its coefficients (lowest degree first) at
/// `x`, via Horner's method.
pub fn eval_poly(coeffs: &[Field], x: Field) -> Field {
    let mut acc = Field::zero();
    for c in coeffs.iter().rev() {
        acc = acc * x + c;
    }
    acc
}

/// Interpolate `evals` (the values of some degree-`< n` polynomial at the
/// `n`-th roots of unity) to coefficients via inverse FFT, then evaluate the
/// result at `x` with Horner's method. This is the combined primitive the
/// validation protocol runs on `points_f`, `points_g`, and `points_h`.
pub fn interp_evaluate(cfg: &Config, evals: &[Field], x: Field) -> Result<Field> {
    let coeffs = fft(cfg, evals, true)?;
    Ok(eval_poly(&coeffs, x))
}
