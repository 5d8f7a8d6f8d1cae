//! The noncentral chi-squared distribution.
//!
//! The distribution is the Poisson mixture sum_k w_k(ncp/2) chi2(df + 2k),
//! and every routine here works that series from its largest term outward.
//! The density recurs the term ratio from the exact mode index; the CDF
//! accumulates log-scale terms with `logspace_add`, which keeps far tails
//! meaningful where a plain-scale sum would be flushed to zero.

use crate::dpq::{q_p01_boundaries, rd0, rd_exp, rd_val, rdt0, rdt1, rdt_qiv};
use crate::distr::chisq::{dchisq, pchisq, qchisq, rchisq};
use crate::distr::gamma::rgamma;
use crate::distr::pois::{dpois_raw, rpois};
use crate::error::{domain_nan, nonconvergence_warning};
use crate::rmath::logspace_add;
use crate::rng::RandomSource;
use crate::search::invert_cdf_positive;
use crate::special::pgamma_raw;

const SERIES_EPS: f64 = 1e-15;
const SERIES_MAX: usize = 100_000;

/// Noncentral chi-squared density.
pub fn dnchisq(x: f64, df: f64, ncp: f64, give_log: bool) -> f64 {
    if x.is_nan() || df.is_nan() || ncp.is_nan() {
        return x + df + ncp;
    }
    if df < 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("dnchisq");
    }
    if ncp == 0.0 {
        return dchisq(x, df, give_log);
    }
    if x < 0.0 {
        return rd0(give_log);
    }
    if x == 0.0 {
        return if df < 2.0 {
            f64::INFINITY
        } else if df > 2.0 {
            rd0(give_log)
        } else {
            // Only the k = 0 mixture term is nonzero at the origin.
            rd_exp(-0.5 * ncp - std::f64::consts::LN_2, give_log)
        };
    }
    let ncp2 = 0.5 * ncp;
    // Index of the largest term of the Poisson mixture.
    let imax = (((-(2.0 + df) + ((2.0 - df) * (2.0 - df) + 4.0 * ncp * x).sqrt()) / 4.0)
        .ceil())
    .max(0.0);
    let mid = dpois_raw(imax, ncp2, false) * dchisq(x, df + 2.0 * imax, false);
    // Patnaik's moment-matched central chi-squared, used when the series is
    // out of reach: the mid term underflowed, or the term window around the
    // mode (width O(sqrt(ncp x))) is too wide to walk.
    let patnaik = |give_log: bool| {
        let nl = df + ncp;
        let ic = nl / (nl + ncp);
        dchisq(x * ic, nl * ic, give_log)
    };
    if mid == 0.0 {
        return patnaik(give_log);
    }
    let mut sum = mid;
    // Upward: term ratio lambda x / (2 (i+1) (df/2 + i)).
    let x2 = x * ncp2;
    let mut term = mid;
    let mut i = imax;
    let mut dfm = df + 2.0 * imax;
    let mut iters = 0usize;
    loop {
        i += 1.0;
        let q = x2 / i / dfm;
        dfm += 2.0;
        term *= q;
        sum += term;
        if q < 1.0 && term * q <= (1.0 - q) * SERIES_EPS * sum {
            break;
        }
        iters += 1;
        if iters > SERIES_MAX {
            nonconvergence_warning("dnchisq", SERIES_MAX);
            return patnaik(give_log);
        }
    }
    // Downward to i = 0 with the reciprocal ratio.
    term = mid;
    i = imax;
    dfm = df + 2.0 * imax;
    iters = 0;
    while i > 0.0 {
        dfm -= 2.0;
        let q = i * dfm / x2;
        i -= 1.0;
        term *= q;
        sum += term;
        if q < 1.0 && term * q <= SERIES_EPS * sum {
            break;
        }
        iters += 1;
        if iters > SERIES_MAX {
            nonconvergence_warning("dnchisq", SERIES_MAX);
            return patnaik(give_log);
        }
    }
    rd_val(sum, give_log)
}

/// log of the mixture tail sum, anchored at the Poisson mode.
fn pnchisq_log(x: f64, df: f64, ncp: f64, lower_tail: bool) -> f64 {
    let lambda = 0.5 * ncp;
    let anchor = lambda.floor();
    let log_term = |k: f64| dpois_raw(k, lambda, true) + pgamma_raw(0.5 * x, 0.5 * df + k, lower_tail, true);
    let mut lsum = log_term(anchor);
    // Upward from the anchor.
    let mut k = anchor + 1.0;
    let mut iters = 0usize;
    loop {
        let lt = log_term(k);
        let new = logspace_add(lsum, lt);
        if new - lsum < SERIES_EPS && lt < lsum - 36.0 {
            break;
        }
        lsum = new;
        k += 1.0;
        iters += 1;
        if iters > SERIES_MAX {
            nonconvergence_warning("pnchisq", SERIES_MAX);
            break;
        }
    }
    // Downward.
    k = anchor - 1.0;
    iters = 0;
    while k >= 0.0 {
        let lt = log_term(k);
        let new = logspace_add(lsum, lt);
        if new - lsum < SERIES_EPS && lt < lsum - 36.0 {
            break;
        }
        lsum = new;
        k -= 1.0;
        iters += 1;
        if iters > SERIES_MAX {
            nonconvergence_warning("pnchisq", SERIES_MAX);
            break;
        }
    }
    lsum.min(0.0)
}

/// Noncentral chi-squared CDF.
pub fn pnchisq(x: f64, df: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || df.is_nan() || ncp.is_nan() {
        return x + df + ncp;
    }
    if df < 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("pnchisq");
    }
    if ncp == 0.0 {
        return pchisq(x, df, lower_tail, log_p);
    }
    if x <= 0.0 {
        return rdt0(lower_tail, log_p);
    }
    if !x.is_finite() {
        return rdt1(lower_tail, log_p);
    }
    if ncp > 1e5 {
        // The mixture index barely varies on this scale; Patnaik's
        // moment-matched central chi-squared is accurate here.
        let nl = df + ncp;
        let ic = nl / (nl + ncp);
        return pchisq(x * ic, nl * ic, lower_tail, log_p);
    }
    rd_exp(pnchisq_log(x, df, ncp, lower_tail), log_p)
}

/// Noncentral chi-squared quantile.
pub fn qnchisq(p: f64, df: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || df.is_nan() || ncp.is_nan() {
        return p + df + ncp;
    }
    if df < 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("qnchisq");
    }
    if ncp == 0.0 {
        return qchisq(p, df, lower_tail, log_p);
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qnchisq") {
        return r;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    if p_ >= 1.0 {
        return f64::INFINITY;
    }
    // Patnaik start: X ~ c chi2(f) with matched mean and variance.
    let c = (df + 2.0 * ncp) / (df + ncp);
    let fdf = (df + ncp) * (df + ncp) / (df + 2.0 * ncp);
    let start = c * qchisq(p_, fdf, true, false);
    invert_cdf_positive(p_, start.max(f64::MIN_POSITIVE), |x| {
        pnchisq(x, df, ncp, true, false)
    })
}

/// Noncentral chi-squared variate: a Poisson-mixed central chi-squared plus
/// an independent central part.
pub fn rnchisq(df: f64, ncp: f64, source: &mut dyn RandomSource) -> f64 {
    if !df.is_finite() || df < 0.0 || !ncp.is_finite() || ncp < 0.0 {
        return domain_nan("rnchisq");
    }
    if ncp == 0.0 {
        return if df == 0.0 { 0.0 } else { rgamma(df / 2.0, 2.0, source) };
    }
    let k = rpois(ncp / 2.0, source);
    let mut r = if k > 0.0 { rchisq(2.0 * k, source) } else { 0.0 };
    if df > 0.0 {
        r += rgamma(df / 2.0, 2.0, source);
    }
    r
}
