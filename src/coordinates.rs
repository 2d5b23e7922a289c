use crate::config::{Config, Coordinates, Jitter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUND_DIGITS: usize = 15;

/// Generates the replacement coordinates for each record.
///
/// The coordinates for the record at `index` lie `index * step` degrees away from the origin
/// in both directions, plus a random offset of at most the jitter bound. The offset keeps
/// records apart from each other while the index keeps them ordered.
pub struct CoordinateGenerator<R: Rng = StdRng> {
    origin: Coordinates,
    step: f64,
    jitter: Jitter,
    rng: R,
}

impl CoordinateGenerator<StdRng> {
    /// Creates a generator from the given [`Config`].
    ///
    /// The random generator is seeded from the configured seed if there is one, otherwise from
    /// OS entropy.
    pub fn from_config(config: &Config) -> Self {
        let rng = match config.get_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: Rng> CoordinateGenerator<R> {
    pub fn new(config: &Config, rng: R) -> Self {
        Self {
            origin: config.get_origin(),
            step: config.get_step(),
            jitter: config.get_jitter(),
            rng,
        }
    }

    /// Computes the `(latitude, longitude)` pair for the record at `index`.
    ///
    /// Latitude and longitude each get their own random offset. Both are rounded to 15 decimal
    /// digits.
    pub fn coordinates(&mut self, index: usize) -> (f64, f64) {
        let offset = index as f64 * self.step;
        let latitude = self.origin.latitude() + offset + self.sample_jitter();
        let longitude = self.origin.longitude() + offset + self.sample_jitter();
        (round_to(latitude, ROUND_DIGITS), round_to(longitude, ROUND_DIGITS))
    }

    fn sample_jitter(&mut self) -> f64 {
        let bound = self.jitter.bound();
        self.rng.gen_range(-bound..=bound)
    }
}

fn round_to(value: f64, digits: usize) -> f64 {
    // formatting with a fixed precision rounds on the exact decimal expansion of `value`
    format!("{:.*}", digits, value)
        .parse()
        .expect("Failed to parse f64 from formatted f64")
}
