//! The hypergeometric distribution: x white balls drawn in n draws without
//! replacement from r white and b black.
//!
//! The density is three Loader binomials; the CDF sums density ratios
//! backward from x (each ratio is rational, so the sum needs no factorials)
//! and swaps to the shorter tail first.

use crate::dpq::{
    d_nonint_check, q_p01_boundaries, rd0, rd_exp, rdt0, rdt1, rdt_qiv,
};
use crate::distr::binom::dbinom_raw;
use crate::distr::norm::qnorm;
use crate::error::domain_nan;
use crate::rmath::{forceint, log1_exp};
use crate::rng::RandomSource;
use crate::search::discrete_quantile;

fn bad_args(r: f64, b: f64, n: f64) -> bool {
    r < 0.0 || b < 0.0 || n < 0.0 || n > r + b
        || r != forceint(r) || b != forceint(b) || n != forceint(n)
        || !r.is_finite() || !b.is_finite() || !n.is_finite()
}

/// Hypergeometric density.
pub fn dhyper(x: f64, r: f64, b: f64, n: f64, give_log: bool) -> f64 {
    if x.is_nan() || r.is_nan() || b.is_nan() || n.is_nan() {
        return x + r + b + n;
    }
    if bad_args(r, b, n) {
        return domain_nan("dhyper");
    }
    if let Some(v) = d_nonint_check(x, give_log, "dhyper") {
        return v;
    }
    let x = forceint(x);
    if x < 0.0 || x > r || n - x < 0.0 || n - x > b {
        return rd0(give_log);
    }
    if n == 0.0 {
        return if x == 0.0 { crate::dpq::rd1(give_log) } else { rd0(give_log) };
    }
    let p = n / (r + b);
    let q = (r + b - n) / (r + b);
    let p1 = dbinom_raw(x, r, p, q, give_log);
    let p2 = dbinom_raw(n - x, b, p, q, give_log);
    let p3 = dbinom_raw(n, r + b, p, q, give_log);
    if give_log {
        p1 + p2 - p3
    } else {
        p1 * p2 / p3
    }
}

/// sum_{k <= x} f(k) / f(x), by the backward term ratio.
fn pdhyper(x: f64, r: f64, b: f64, n: f64, log_p: bool) -> f64 {
    let mut term = 1.0;
    let mut sum = 0.0;
    let mut x = x;
    while x > 0.0 && term >= f64::EPSILON * sum {
        term *= x * (b - n + x) / ((n + 1.0 - x) * (r + 1.0 - x));
        sum += term;
        x -= 1.0;
    }
    if log_p {
        sum.ln_1p()
    } else {
        1.0 + sum
    }
}

/// Hypergeometric CDF.
pub fn phyper(x: f64, r: f64, b: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || r.is_nan() || b.is_nan() || n.is_nan() {
        return x + r + b + n;
    }
    if bad_args(r, b, n) {
        return domain_nan("phyper");
    }
    let mut x = (x + 1e-7).floor();
    let mut r = r;
    let mut b = b;
    let mut lower_tail = lower_tail;
    if x * (r + b) > n * r {
        // Mirror to the shorter (lower) tail: count black draws instead.
        std::mem::swap(&mut r, &mut b);
        x = n - x - 1.0;
        lower_tail = !lower_tail;
    }
    if x < (n - b).max(0.0) {
        return rdt0(lower_tail, log_p);
    }
    if x >= r.min(n) {
        return rdt1(lower_tail, log_p);
    }
    let ld = dhyper(x, r, b, n, true);
    let lpd = pdhyper(x, r, b, n, true);
    let llower = ld + lpd;
    if lower_tail {
        rd_exp(llower, log_p)
    } else if log_p {
        log1_exp(llower)
    } else {
        -llower.exp_m1()
    }
}

/// Hypergeometric quantile.
pub fn qhyper(p: f64, r: f64, b: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || r.is_nan() || b.is_nan() || n.is_nan() {
        return p + r + b + n;
    }
    if bad_args(r, b, n) {
        return domain_nan("qhyper");
    }
    let left = (n - b).max(0.0);
    let right = r.min(n);
    if let Some(v) = q_p01_boundaries(p, left, right, lower_tail, log_p, "qhyper") {
        return v;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    if p_ >= 1.0 {
        return right;
    }
    let total = r + b;
    let frac = r / total;
    let mu = n * frac;
    let sigma2 = n * frac * (1.0 - frac) * (total - n) / (total - 1.0).max(1.0);
    let z = qnorm(p_, 0.0, 1.0, true, false);
    let start = forceint(mu + sigma2.sqrt() * z).clamp(left, right);
    let target = p_ * (1.0 - 64.0 * f64::EPSILON);
    let k = discrete_quantile(target, start, right, |k| phyper(k, r, b, n, true, false));
    k.max(left)
}

/// Hypergeometric variate by quantile inversion.
pub fn rhyper(r: f64, b: f64, n: f64, source: &mut dyn RandomSource) -> f64 {
    if bad_args(r, b, n) {
        return domain_nan("rhyper");
    }
    qhyper(source.unif_rand(), r, b, n, true, false)
}
