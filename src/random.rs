use log::debug;
use rand::Rng;

use super::{ArrayInstance, Floating, Matrix, Result};

pub use super::kernel::Distribution;

/// A seed for [`Matrix::random_with_seed`].
///
/// Every word is in `[0, 4096)` and the last word is odd.
pub type Seed = [i32; 4];

/// Draw a fresh seed from the thread-local generator.
pub fn new_seed() -> Seed {
    let mut rng = rand::thread_rng();
    let mut seed = [0; 4];

    for word in seed[..3].iter_mut() {
        *word = rng.gen_range(1..4095);
    }

    let r: i32 = rng.gen_range(1..4095);
    seed[3] = 2 * (r / 2) + 1;

    seed
}

impl<T: Floating> Matrix<T> {
    /// Construct a new `rows x columns` matrix of random values from the given distribution.
    pub fn random(rows: usize, columns: usize, dist: Distribution) -> Result<Self> {
        let mut seed = new_seed();
        Self::random_with_seed(rows, columns, dist, &mut seed)
    }

    /// Construct a new `rows x columns` matrix of random values from the given distribution,
    /// advancing `seed` so that it can be used again for the next draw.
    ///
    /// Panics: if `seed` is not a valid [`Seed`] in a debug build.
    pub fn random_with_seed(
        rows: usize,
        columns: usize,
        dist: Distribution,
        seed: &mut Seed,
    ) -> Result<Self> {
        let mut matrix = Self::zeros(rows, columns)?;

        debug!("{:?} fill of a {}x{} matrix with seed {:?}", dist, rows, columns, seed);
        T::larnv(dist, seed, matrix.values_mut());
        Ok(matrix)
    }
}
