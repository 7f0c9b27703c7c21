use core::ops::{Add, Mul};

use num_traits::Zero;
use rand::Rng;
use rand::SeedableRng;
use rand::distr::StandardUniform;
use rand::rngs::StdRng;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// Two-component sample value for exercising non-scalar coefficients
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pair(pub f64, pub f64);

impl Add for Pair {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pair(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl Mul<f64> for Pair {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Pair(self.0 * rhs, self.1 * rhs)
    }
}

impl Zero for Pair {
    fn zero() -> Self {
        Pair(0.0, 0.0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0.0 && self.1 == 0.0
    }
}
