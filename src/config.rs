//! Immutable, shareable configuration: field count, modulus (implicit in
//! [`Field`]'s type), and the precomputed root-of-unity tables the FFT
//! consumes.

use ark_ff::{Field as ArkField, One};
use tracing::debug;

use crate::error::{Error, Result};
use crate::field::{inv2, Field};

/// `2^k`: the order of the largest multiplicative subgroup the configured
/// field admits a root of unity for. Fixed by the modulus's 2-adicity.
pub const N_ROOTS: usize = 1 << 19;

/// `g^{(M-1)/N_ROOTS} mod M` for the field's generator `g = 3`: a primitive
/// `N_ROOTS`-th root of unity. `examples/original_source/libmprio`'s
/// `config.c` reads an equivalent constant from a hard-coded hex table of
/// 4096 entries read at startup; this crate instead derives the single
/// generating root and builds the rest by repeated multiplication, the
/// "compute on demand from a single primitive root" table-storage tradeoff.
const ROOT_OF_UNITY_U128: u128 = 53_832_991_155_096_404_515_554_555;

fn primitive_root_of_unity() -> Field {
    Field::from(ROOT_OF_UNITY_U128)
}

/// Immutable configuration shared read-only across clients and both servers.
///
/// `Clone + Send + Sync`: every field is plain data with no interior
/// mutability, so a `Config` can be wrapped in `Arc` and handed to many
/// verifier tasks concurrently.
#[derive(Clone)]
pub struct Config {
    num_data_fields: usize,
    roots: Vec<Field>,
    roots_inv: Vec<Field>,
    inv2: Field,
}

impl Config {
    /// Build a configuration for `num_data_fields` Boolean inputs per
    /// client, validating `num_data_fields + 1 <= n_roots / 2` and
    /// precomputing the roots-of-unity tables.
    pub fn new(num_data_fields: usize) -> Result<Self> {
        if num_data_fields == 0 {
            return Err(Error::Domain("num_data_fields must be at least 1"));
        }
        if num_data_fields + 1 > N_ROOTS / 2 {
            return Err(Error::Domain(
                "num_data_fields + 1 exceeds n_roots / 2 for this modulus",
            ));
        }

        let root = primitive_root_of_unity();
        let mut roots = Vec::with_capacity(N_ROOTS);
        let mut acc = Field::one();
        for _ in 0..N_ROOTS {
            roots.push(acc);
            acc *= root;
        }
        let root_inv = root.inverse().ok_or(Error::Arithmetic("root of unity was zero"))?;
        let mut roots_inv = Vec::with_capacity(N_ROOTS);
        let mut acc_inv = Field::one();
        for _ in 0..N_ROOTS {
            roots_inv.push(acc_inv);
            acc_inv *= root_inv;
        }

        debug!(num_data_fields, n_roots = N_ROOTS, "config initialized");

        Ok(Config {
            num_data_fields,
            roots,
            roots_inv,
            inv2: inv2(),
        })
    }

    /// Convenience constructor for the protocol's documented default of
    /// 128 Boolean data fields per client.
    pub fn with_default_field_count() -> Result<Self> {
        Self::new(128)
    }

    pub fn num_data_fields(&self) -> usize {
        self.num_data_fields
    }

    pub fn n_roots(&self) -> usize {
        N_ROOTS
    }

    pub fn inv2(&self) -> Field {
        self.inv2
    }

    /// View over every `(n_roots / n)`-th entry of the roots table — the
    /// roots used by an `n`-point FFT. Mirrors
    /// `examples/original_source/libmprio/fft.c`'s `fft_get_roots`.
    /// `n` must divide `n_roots` and be a power of two.
    pub fn fft_roots(&self, n: usize, invert: bool) -> Result<Vec<Field>> {
        self.subsampled_roots(n, invert)
    }

    fn subsampled_roots(&self, n: usize, invert: bool) -> Result<Vec<Field>> {
        if n == 0 || !n.is_power_of_two() || N_ROOTS % n != 0 {
            return Err(Error::Domain("fft length must be a power of two dividing n_roots"));
        }
        let step = N_ROOTS / n;
        let table = if invert { &self.roots_inv } else { &self.roots };
        Ok((0..n).map(|i| table[i * step]).collect())
    }
}
