//! The uniform-randomness seam.
//!
//! Every sampler takes `&mut dyn RandomSource` rather than a concrete
//! generator, so callers can plug in anything that yields uniforms: a seeded
//! [`rand`] generator through [`RngSource`], or a scripted sequence in
//! tests. The exponential and normal primitives have default implementations
//! by inversion, which a source may override with something faster.

use crate::distr::norm::qnorm;

/// A stream of Uniform(0, 1) variates, plus the two derived primitives the
/// samplers lean on most.
pub trait RandomSource {
    /// The next uniform deviate, strictly inside (0, 1).
    fn unif_rand(&mut self) -> f64;

    /// A standard exponential deviate. Default: inversion.
    fn exp_rand(&mut self) -> f64 {
        -self.unif_rand().ln()
    }

    /// A standard normal deviate. Default: inversion through the normal
    /// quantile, which is exact in distribution and monotone in the uniform.
    fn norm_rand(&mut self) -> f64 {
        qnorm(self.unif_rand(), 0.0, 1.0, true, false)
    }
}

/// Adapter wrapping any [`rand::Rng`] as a [`RandomSource`].
pub struct RngSource<R: rand::Rng>(pub R);

impl<R: rand::Rng> RandomSource for RngSource<R> {
    fn unif_rand(&mut self) -> f64 {
        // gen::<f64>() is in [0, 1); nudge 0 off the boundary so that
        // log and quantile transforms stay finite.
        let u: f64 = self.0.gen();
        if u <= 0.0 {
            f64::MIN_POSITIVE
        } else {
            u
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// A scripted source replaying a fixed list of uniforms, cycling.
    pub struct FixedSource {
        values: Vec<f64>,
        at: usize,
    }

    impl FixedSource {
        pub fn new(values: Vec<f64>) -> Self {
            Self { values, at: 0 }
        }
    }

    impl RandomSource for FixedSource {
        fn unif_rand(&mut self) -> f64 {
            let v = self.values[self.at % self.values.len()];
            self.at += 1;
            v
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rng_source_stays_in_open_interval() {
        let mut src = RngSource(rand::rngs::StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let u = src.unif_rand();
            assert!(u > 0.0 && u < 1.0);
        }
    }

    #[test]
    fn default_primitives_track_the_uniform() {
        let mut src = testing::FixedSource::new(vec![0.5]);
        assert!((src.exp_rand() - std::f64::consts::LN_2).abs() < 1e-15);
        let mut src = testing::FixedSource::new(vec![0.5]);
        assert!(src.norm_rand().abs() < 1e-9);
    }
}
