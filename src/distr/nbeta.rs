//! The noncentral beta distribution.
//!
//! The CDF is AS 226: a Poisson-weighted sum of central incomplete beta
//! integrals, started at the first index whose weight is non-negligible and
//! advanced with the rational recurrences for the weight, the integral and
//! the density term. The bound `(temp - gx) * sumq` on the truncated mass
//! decides when to stop.

use crate::dpq::{q_p01_boundaries, rd0, rd_exp, rdt0, rdt1, rdt_qiv};
use crate::distr::beta::{dbeta, pbeta, qbeta};
use crate::distr::pois::dpois_raw;
use crate::error::{domain_nan, nonconvergence_warning, precision_warning};
use crate::search::invert_cdf_unit;
use crate::special::{ln_beta, ln_gamma, pbeta_raw};

const ERRMAX: f64 = 1e-9;
const ITRMAX: usize = 10_000;
const SERIES_MAX: usize = 100_000;

/// Moment-matched density fallback: the noncentral numerator chi-squared
/// in X = Q1 / (Q1 + Q2) is replaced by Patnaik's scaled central one,
/// which turns X into a scaled central beta
/// X = s W / (1 + (s - 1) W), W ~ Beta(f/2, b).
fn dnbeta_patnaik(x: f64, a: f64, b: f64, ncp: f64, give_log: bool) -> f64 {
    let df = 2.0 * a;
    let s = (df + 2.0 * ncp) / (df + ncp);
    let f = (df + ncp) * (df + ncp) / (df + 2.0 * ncp);
    let denom = s - (s - 1.0) * x;
    let w = x / denom;
    let ld = dbeta(w, f / 2.0, b, true) + s.ln() - 2.0 * denom.ln();
    if give_log {
        ld
    } else {
        ld.exp()
    }
}

/// Lower tail of the noncentral beta, plain scale, from x and its
/// pre-computed complement (the caller often knows 1 - x exactly).
pub(crate) fn pnbeta_raw(x: f64, o_x: f64, a: f64, b: f64, ncp: f64) -> f64 {
    if x < 0.0 || o_x > 1.0 {
        return 0.0;
    }
    if x > 1.0 || o_x < 0.0 {
        return 1.0;
    }
    let c = ncp / 2.0;
    // First index with non-negligible Poisson weight.
    let x0 = (c - 7.0 * c.sqrt()).max(0.0).floor();
    let a0 = a + x0;
    let lbeta0 = ln_beta(a0, b);
    // Central integral, density term and weight at the starting index.
    let mut temp = pbeta_raw(x, a0, b, true, false);
    let mut gx = (a0 * x.ln() + b * o_x.ln() - lbeta0 - a0.ln()).exp();
    let mut q = if x0 == 0.0 {
        (-c).exp()
    } else {
        (-c + x0 * c.ln() - ln_gamma(x0 + 1.0)).exp()
    };
    let mut sumq = 1.0 - q;
    let mut ans = q * temp;
    let mut errbd = f64::INFINITY;
    let mut j = 0.0;
    for _ in 0..ITRMAX {
        j += 1.0;
        temp -= gx;
        gx *= x * (a0 + b + j - 1.0) / (a0 + j);
        q *= c / (x0 + j);
        sumq -= q;
        ans += q * temp;
        errbd = (temp - gx) * sumq;
        if errbd <= ERRMAX {
            break;
        }
    }
    if errbd > ERRMAX {
        precision_warning("pnbeta");
    }
    ans.clamp(0.0, 1.0)
}

/// Noncentral beta CDF with an explicit complement argument, the entry the
/// noncentral F reduction uses.
pub fn pnbeta2(x: f64, o_x: f64, a: f64, b: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    let lower = pnbeta_raw(x, o_x, a, b, ncp);
    if lower_tail {
        if log_p {
            lower.ln()
        } else {
            lower
        }
    } else if log_p {
        // The series result is plain-scale; the upper tail goes through
        // log1p to keep what precision the sum left.
        (-lower).ln_1p()
    } else {
        0.5 - lower + 0.5
    }
}

/// Noncentral beta CDF.
pub fn pnbeta(x: f64, a: f64, b: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() || ncp.is_nan() {
        return x + a + b + ncp;
    }
    if a <= 0.0 || b <= 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("pnbeta");
    }
    if ncp == 0.0 {
        return pbeta(x, a, b, lower_tail, log_p);
    }
    if x <= 0.0 {
        return rdt0(lower_tail, log_p);
    }
    if x >= 1.0 {
        return rdt1(lower_tail, log_p);
    }
    pnbeta2(x, 1.0 - x, a, b, ncp, lower_tail, log_p)
}

/// Noncentral beta density: the Poisson mixture summed from its largest
/// term, found by solving the term-ratio-equals-one quadratic.
pub fn dnbeta(x: f64, a: f64, b: f64, ncp: f64, give_log: bool) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() || ncp.is_nan() {
        return x + a + b + ncp;
    }
    if a <= 0.0 || b <= 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("dnbeta");
    }
    if ncp == 0.0 {
        return dbeta(x, a, b, give_log);
    }
    if !(0.0..=1.0).contains(&x) {
        return rd0(give_log);
    }
    let ncp2 = 0.5 * ncp;
    if x == 0.0 || x == 1.0 {
        // Only the k = 0 term survives at the endpoints.
        let l0 = dbeta(x, a, b, true);
        return rd_exp(-ncp2 + l0, give_log);
    }
    let dx2 = ncp2 * x;
    let d = (dx2 - a - 1.0) / 2.0;
    let big_d = d * d + dx2 * (a + b) - a;
    let kmax = if big_d <= 0.0 {
        0.0
    } else {
        (d + big_d.sqrt()).ceil().max(0.0)
    };
    let lmid = dpois_raw(kmax, ncp2, true) + dbeta(x, a + kmax, b, true);
    if lmid == f64::NEG_INFINITY {
        return rd0(give_log);
    }
    // Relative-scale sums in units of the mid term.
    let eps = 1e-15;
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = kmax;
    let mut iters = 0usize;
    loop {
        let q = ncp2 / (k + 1.0) * x * (a + b + k) / (a + k + 1.0);
        k += 1.0;
        term *= q;
        sum += term;
        if term <= sum * eps {
            break;
        }
        iters += 1;
        if iters > SERIES_MAX {
            // The term window around kmax is wider than any walkable
            // range; hand over to the moment-matched approximation.
            nonconvergence_warning("dnbeta", SERIES_MAX);
            return dnbeta_patnaik(x, a, b, ncp, give_log);
        }
    }
    term = 1.0;
    k = kmax;
    iters = 0;
    while k > 0.0 {
        let q = k / ncp2 * (a + k) / (x * (a + b + k - 1.0));
        k -= 1.0;
        term *= q;
        sum += term;
        if term <= sum * eps {
            break;
        }
        iters += 1;
        if iters > SERIES_MAX {
            nonconvergence_warning("dnbeta", SERIES_MAX);
            return dnbeta_patnaik(x, a, b, ncp, give_log);
        }
    }
    rd_exp(lmid + sum.ln(), give_log)
}

/// Noncentral beta quantile, by bisection of the AS 226 CDF.
pub fn qnbeta(p: f64, a: f64, b: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || a.is_nan() || b.is_nan() || ncp.is_nan() {
        return p + a + b + ncp;
    }
    if a <= 0.0 || b <= 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("qnbeta");
    }
    if ncp == 0.0 {
        return qbeta(p, a, b, lower_tail, log_p);
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, 1.0, lower_tail, log_p, "qnbeta") {
        return r;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    invert_cdf_unit(p_, |x| pnbeta_raw(x, 1.0 - x, a, b, ncp))
}
