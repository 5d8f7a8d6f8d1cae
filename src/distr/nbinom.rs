//! The negative binomial distribution: number of failures before the
//! `size`-th success, with real (not necessarily integer) `size`.

use crate::dpq::{
    d_nonint_check, q_p01_boundaries, rd0, rdt0, rdt1, rdt_qiv,
};
use crate::distr::binom::dbinom_raw;
use crate::distr::gamma::rgamma;
use crate::distr::norm::qnorm;
use crate::distr::pois::rpois;
use crate::error::domain_nan;
use crate::rmath::forceint;
use crate::rng::RandomSource;
use crate::search::discrete_quantile;
use crate::special::pbeta_raw;

/// Negative binomial density, through the Loader kernel:
/// f(x) = (size / (size + x)) * dbinom_raw(size, x + size, prob, 1 - prob).
pub fn dnbinom(x: f64, size: f64, prob: f64, give_log: bool) -> f64 {
    if x.is_nan() || size.is_nan() || prob.is_nan() {
        return x + size + prob;
    }
    if !(0.0..=1.0).contains(&prob) || prob == 0.0 || size < 0.0 {
        return domain_nan("dnbinom");
    }
    if let Some(r) = d_nonint_check(x, give_log, "dnbinom") {
        return r;
    }
    let x = forceint(x);
    if x < 0.0 || !x.is_finite() {
        return rd0(give_log);
    }
    if x == 0.0 && size == 0.0 {
        return crate::dpq::rd1(give_log);
    }
    let ans = dbinom_raw(size, x + size, prob, 1.0 - prob, give_log);
    let p = size / (size + x);
    if give_log {
        p.ln() + ans
    } else {
        p * ans
    }
}

/// Negative binomial CDF: P(X <= x) = I_prob(size, x + 1).
pub fn pnbinom(x: f64, size: f64, prob: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || size.is_nan() || prob.is_nan() {
        return x + size + prob;
    }
    if !(0.0..=1.0).contains(&prob) || prob == 0.0 || size < 0.0 || !size.is_finite() {
        return domain_nan("pnbinom");
    }
    if size == 0.0 {
        return rdt1(lower_tail, log_p);
    }
    if x < 0.0 {
        return rdt0(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    if !x.is_finite() {
        return rdt1(lower_tail, log_p);
    }
    pbeta_raw(prob, size, x + 1.0, lower_tail, log_p)
}

/// Negative binomial quantile.
pub fn qnbinom(p: f64, size: f64, prob: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || size.is_nan() || prob.is_nan() {
        return p + size + prob;
    }
    if !(0.0..=1.0).contains(&prob) || size < 0.0 {
        return domain_nan("qnbinom");
    }
    if prob == 1.0 || size == 0.0 {
        return 0.0;
    }
    if prob == 0.0 {
        return domain_nan("qnbinom");
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qnbinom") {
        return r;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    if p_ >= 1.0 {
        return f64::INFINITY;
    }
    let q = 1.0 - prob;
    let mu = size * q / prob;
    let sigma = (size * q).sqrt() / prob;
    let gamma = (q + 1.0) / (size * q).sqrt();
    let z = qnorm(p_, 0.0, 1.0, true, false);
    let start = forceint(mu + sigma * (z + gamma * (z * z - 1.0) / 6.0)).max(0.0);
    let target = p_ * (1.0 - 64.0 * f64::EPSILON);
    discrete_quantile(target, start, f64::INFINITY, |k| {
        pnbinom(k, size, prob, true, false)
    })
}

/// Negative binomial variate, as a gamma-mixed Poisson.
pub fn rnbinom(size: f64, prob: f64, source: &mut dyn RandomSource) -> f64 {
    if !size.is_finite() || size <= 0.0 || !(0.0..=1.0).contains(&prob) || prob == 0.0 {
        return domain_nan("rnbinom");
    }
    if prob == 1.0 {
        return 0.0;
    }
    rpois(rgamma(size, (1.0 - prob) / prob, source), source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngSource;
    use rand::SeedableRng;

    fn assert_rel(a: f64, b: f64, tol: f64) {
        let d = (a - b).abs() / b.abs().max(1e-300);
        assert!(d <= tol, "{a} vs {b} (rel {d:e})");
    }

    #[test]
    fn size_one_is_geometric() {
        let prob = 0.3;
        for k in 0..12 {
            let x = k as f64;
            assert_rel(
                dnbinom(x, 1.0, prob, false),
                prob * (1.0 - prob).powi(k),
                1e-13,
            );
        }
    }

    #[test]
    fn density_from_coefficients() {
        // f(x) = C(x + size - 1, x) p^size q^x for integer size.
        let (size, prob) = (4.0f64, 0.6f64);
        for k in 0..10 {
            let x = k as f64;
            let direct = crate::special::choose(x + size - 1.0, x)
                * prob.powf(size)
                * (1.0 - prob).powi(k);
            assert_rel(dnbinom(x, size, prob, false), direct, 1e-12);
        }
        assert_eq!(dnbinom(1.5, 4.0, 0.6, false), 0.0);
        assert_eq!(dnbinom(-1.0, 4.0, 0.6, false), 0.0);
    }

    #[test]
    fn cdf_matches_partial_sums() {
        let (size, prob) = (2.5, 0.4);
        let mut acc = 0.0;
        for k in 0..60 {
            acc += dnbinom(k as f64, size, prob, false);
            assert_rel(pnbinom(k as f64, size, prob, true, false), acc, 1e-11);
        }
    }

    #[test]
    fn quantile_is_smallest_k() {
        for &(size, prob) in &[(1.0, 0.5), (7.0, 0.2), (0.8, 0.7)] {
            for &p in &[0.01, 0.4, 0.5, 0.95, 0.999] {
                let k = qnbinom(p, size, prob, true, false);
                assert!(pnbinom(k, size, prob, true, false) >= p * (1.0 - 1e-12));
                if k > 0.0 {
                    assert!(pnbinom(k - 1.0, size, prob, true, false) < p);
                }
            }
        }
        assert_eq!(qnbinom(0.7, 3.0, 1.0, true, false), 0.0);
    }

    #[test]
    fn sampler_moments() {
        let (size, prob) = (5.0, 0.4);
        let mut src = RngSource(rand::rngs::StdRng::seed_from_u64(23));
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let x = rnbinom(size, prob, &mut src);
            assert!(x >= 0.0 && x == x.floor());
            sum += x;
        }
        // Mean = size (1-p)/p = 7.5.
        assert!((sum / n as f64 - 7.5).abs() < 0.15);
    }
}
