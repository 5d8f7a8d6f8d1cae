//! The binomial distribution.
//!
//! `dbinom_raw` is the Catherine Loader density: Stirling errors plus the
//! two `bd0` deviance terms, so n can be enormous without any factorial
//! overflowing. The beta and negative binomial densities borrow it.

use crate::dpq::{
    d_nonint_check, q_p01_boundaries, rd0, rd1, rd_exp, rdt0, rdt1, rdt_qiv,
};
use crate::distr::norm::qnorm;
use crate::error::domain_nan;
use crate::rmath::{bd0, forceint, stirlerr, M_2PI};
use crate::rng::RandomSource;
use crate::search::discrete_quantile;
use crate::special::pbeta_raw;

/// Loader's binomial point mass, for real x and n with 0 <= x <= n.
/// `q` must equal 1 - p (passed separately so the caller can keep whichever
/// of the pair it knows to full precision).
pub(crate) fn dbinom_raw(x: f64, n: f64, p: f64, q: f64, give_log: bool) -> f64 {
    if p == 0.0 {
        return if x == 0.0 { rd1(give_log) } else { rd0(give_log) };
    }
    if q == 0.0 {
        return if x == n { rd1(give_log) } else { rd0(give_log) };
    }
    if x == 0.0 {
        if n == 0.0 {
            return rd1(give_log);
        }
        // (1-p)^n, via the deviance when q alone would lose digits.
        let lc = if p < 0.1 {
            -bd0(n, n * q) - n * p
        } else {
            n * q.ln()
        };
        return rd_exp(lc, give_log);
    }
    if x == n {
        let lc = if q < 0.1 {
            -bd0(n, n * p) - n * q
        } else {
            n * p.ln()
        };
        return rd_exp(lc, give_log);
    }
    if x < 0.0 || x > n {
        return rd0(give_log);
    }
    let lc = stirlerr(n) - stirlerr(x) - stirlerr(n - x) - bd0(x, n * p) - bd0(n - x, n * q);
    let lf = M_2PI.ln() + x.ln() + (-x / n).ln_1p();
    rd_exp(lc - 0.5 * lf, give_log)
}

/// Binomial density.
pub fn dbinom(x: f64, n: f64, p: f64, give_log: bool) -> f64 {
    if x.is_nan() || n.is_nan() || p.is_nan() {
        return x + n + p;
    }
    if !(0.0..=1.0).contains(&p) || n < 0.0 || n != forceint(n) {
        return domain_nan("dbinom");
    }
    if let Some(r) = d_nonint_check(x, give_log, "dbinom") {
        return r;
    }
    let x = forceint(x);
    if x < 0.0 || !x.is_finite() {
        return rd0(give_log);
    }
    dbinom_raw(x, n, p, 1.0 - p, give_log)
}

/// Binomial CDF, through the incomplete beta integral:
/// P(X <= x) = I_{1-p}(n - x, x + 1).
pub fn pbinom(x: f64, n: f64, p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || n.is_nan() || p.is_nan() {
        return x + n + p;
    }
    if !n.is_finite() || !(0.0..=1.0).contains(&p) || n < 0.0 || n != forceint(n) {
        return domain_nan("pbinom");
    }
    if x < 0.0 {
        return rdt0(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    if x >= n {
        return rdt1(lower_tail, log_p);
    }
    pbeta_raw(p, x + 1.0, n - x, !lower_tail, log_p)
}

/// Binomial quantile.
pub fn qbinom(p: f64, n: f64, prob: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || n.is_nan() || prob.is_nan() {
        return p + n + prob;
    }
    if !n.is_finite() || !(0.0..=1.0).contains(&prob) || n < 0.0 || n != forceint(n) {
        return domain_nan("qbinom");
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, n, lower_tail, log_p, "qbinom") {
        return r;
    }
    if prob == 0.0 || n == 0.0 {
        return 0.0;
    }
    if prob == 1.0 {
        return n;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    if p_ >= 1.0 {
        return n;
    }
    let q = 1.0 - prob;
    let mu = n * prob;
    let sigma = (mu * q).sqrt();
    let gamma = (q - prob) / sigma;
    let z = qnorm(p_, 0.0, 1.0, true, false);
    let start = forceint(mu + sigma * (z + gamma * (z * z - 1.0) / 6.0)).clamp(0.0, n);
    let target = p_ * (1.0 - 64.0 * f64::EPSILON);
    discrete_quantile(target, start, n, |k| pbinom(k, n, prob, true, false))
}

/// Binomial variate: direct Bernoulli count for small n, quantile
/// inversion of a single uniform otherwise.
pub fn rbinom(n: f64, prob: f64, source: &mut dyn RandomSource) -> f64 {
    if !n.is_finite() || n < 0.0 || n != forceint(n) || !(0.0..=1.0).contains(&prob) {
        return domain_nan("rbinom");
    }
    if n <= 30.0 {
        let mut count = 0.0;
        for _ in 0..n as usize {
            if source.unif_rand() < prob {
                count += 1.0;
            }
        }
        return count;
    }
    qbinom(source.unif_rand(), n, prob, true, false)
}
