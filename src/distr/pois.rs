//! The Poisson distribution.
//!
//! `dpois_raw` is the saddle-point form exp(-stirlerr(x) - bd0(x, lambda))
//! / sqrt(2 pi x): every factor is O(1), so it never overflows an
//! intermediate even when x! or lambda^x would. It also accepts non-integer
//! x, which is what lets the gamma and binomial densities reuse it.

use crate::dpq::{d_nonint_check, q_p01_boundaries, rd0, rd1, rd_exp, rd_fexp, rdt0, rdt1, rdt_qiv};
use crate::distr::norm::qnorm;
use crate::error::domain_nan;
use crate::rmath::{bd0, forceint, stirlerr, M_2PI};
use crate::rng::RandomSource;
use crate::search::discrete_quantile;
use crate::special::{ln_gamma, pgamma_raw};

/// Poisson point mass at (possibly non-integer) x >= 0, without the
/// integer screening of `dpois`.
pub(crate) fn dpois_raw(x: f64, lambda: f64, give_log: bool) -> f64 {
    if lambda == 0.0 {
        return if x == 0.0 { rd1(give_log) } else { rd0(give_log) };
    }
    if !lambda.is_finite() {
        return rd0(give_log);
    }
    if x < 0.0 {
        return rd0(give_log);
    }
    if x <= lambda * f64::MIN_POSITIVE {
        return rd_exp(-lambda, give_log);
    }
    if lambda < x * f64::MIN_POSITIVE {
        if !x.is_finite() {
            return rd0(give_log);
        }
        return rd_exp(-lambda + x * lambda.ln() - ln_gamma(x + 1.0), give_log);
    }
    rd_fexp(M_2PI * x, -stirlerr(x) - bd0(x, lambda), give_log)
}

/// Poisson density.
pub fn dpois(x: f64, lambda: f64, give_log: bool) -> f64 {
    if x.is_nan() || lambda.is_nan() {
        return x + lambda;
    }
    if lambda < 0.0 {
        return domain_nan("dpois");
    }
    if let Some(r) = d_nonint_check(x, give_log, "dpois") {
        return r;
    }
    if x < 0.0 || !x.is_finite() {
        return rd0(give_log);
    }
    dpois_raw(forceint(x), lambda, give_log)
}

/// Poisson CDF, through the gamma integral:
/// P(X <= x) = Q(x + 1, lambda).
pub fn ppois(x: f64, lambda: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || lambda.is_nan() {
        return x + lambda;
    }
    if lambda < 0.0 {
        return domain_nan("ppois");
    }
    if x < 0.0 {
        return rdt0(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    if lambda == 0.0 || !x.is_finite() {
        return rdt1(lower_tail, log_p);
    }
    pgamma_raw(lambda, x + 1.0, !lower_tail, log_p)
}

/// Poisson quantile.
pub fn qpois(p: f64, lambda: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || lambda.is_nan() {
        return p + lambda;
    }
    if !lambda.is_finite() || lambda < 0.0 {
        return domain_nan("qpois");
    }
    if lambda == 0.0 {
        return 0.0;
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qpois") {
        return r;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    if p_ >= 1.0 {
        return f64::INFINITY;
    }
    // Cornish-Fisher start, then lattice search on the fuzzed target.
    let mu = lambda;
    let sigma = lambda.sqrt();
    let gamma = 1.0 / sigma;
    let z = qnorm(p_, 0.0, 1.0, true, false);
    let start = forceint(mu + sigma * (z + gamma * (z * z - 1.0) / 6.0)).max(0.0);
    let target = p_ * (1.0 - 64.0 * f64::EPSILON);
    discrete_quantile(target, start, f64::INFINITY, |k| {
        ppois(k, lambda, true, false)
    })
}

/// Poisson variate: Knuth's product method for small means, Hormann's PTRS
/// transformed rejection for the rest.
pub fn rpois(lambda: f64, source: &mut dyn RandomSource) -> f64 {
    if !lambda.is_finite() || lambda < 0.0 {
        return domain_nan("rpois");
    }
    if lambda == 0.0 {
        return 0.0;
    }
    if lambda < 10.0 {
        let limit = (-lambda).exp();
        let mut prod = 1.0;
        let mut k = -1.0;
        while prod > limit {
            prod *= source.unif_rand();
            k += 1.0;
        }
        return k;
    }
    let b = 0.931 + 2.53 * lambda.sqrt();
    let a = -0.059 + 0.02483 * b;
    let inv_alpha = 1.1239 + 1.1328 / (b - 3.4);
    let vr = 0.9277 - 3.6224 / (b - 2.0);
    let log_lambda = lambda.ln();
    loop {
        let u = source.unif_rand() - 0.5;
        let v = source.unif_rand();
        let us = 0.5 - u.abs();
        let k = ((2.0 * a / us + b) * u + lambda + 0.43).floor();
        if us >= 0.07 && v <= vr {
            return k;
        }
        if k < 0.0 || (us < 0.013 && v > us) {
            continue;
        }
        let accept = v * inv_alpha / (a / (us * us) + b);
        if accept.ln() <= k * log_lambda - lambda - ln_gamma(k + 1.0) {
            return k;
        }
    }
}
