//! The beta distribution.
//!
//! For interior shapes the density is the binomial identity
//! f(x; a, b) = (a+b-1) * dbinom_raw(a-1, a+b-2, x, 1-x), inheriting the
//! Loader kernel's resistance to overflow; small shapes take the plain
//! log-beta form which is exact there.

use crate::dpq::{q_p01_boundaries, rd0, rd_exp, rdt_qiv};
use crate::distr::binom::dbinom_raw;
use crate::distr::gamma::rgamma;
use crate::error::domain_nan;
use crate::rng::RandomSource;
use crate::search::invert_cdf_unit;
use crate::special::{ln_beta, pbeta_raw};

/// Beta density.
pub fn dbeta(x: f64, a: f64, b: f64, give_log: bool) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() {
        return x + a + b;
    }
    if a < 0.0 || b < 0.0 {
        return domain_nan("dbeta");
    }
    if !(0.0..=1.0).contains(&x) {
        return rd0(give_log);
    }
    // Limit shapes concentrate all mass on a boundary point.
    if a == 0.0 || b == 0.0 || !a.is_finite() || !b.is_finite() {
        if a == 0.0 && b == 0.0 {
            return if x == 0.0 || x == 1.0 { f64::INFINITY } else { rd0(give_log) };
        }
        if a == 0.0 || (a.is_finite() && !b.is_finite()) {
            return if x == 0.0 { f64::INFINITY } else { rd0(give_log) };
        }
        if b == 0.0 || (b.is_finite() && !a.is_finite()) {
            return if x == 1.0 { f64::INFINITY } else { rd0(give_log) };
        }
        return if x == 0.5 { f64::INFINITY } else { rd0(give_log) };
    }
    if x == 0.0 {
        if a < 1.0 {
            return f64::INFINITY;
        }
        if a > 1.0 {
            return rd0(give_log);
        }
        return if give_log { b.ln() } else { b };
    }
    if x == 1.0 {
        if b < 1.0 {
            return f64::INFINITY;
        }
        if b > 1.0 {
            return rd0(give_log);
        }
        return if give_log { a.ln() } else { a };
    }
    if a <= 2.0 || b <= 2.0 {
        let lval = (a - 1.0) * x.ln() + (b - 1.0) * (-x).ln_1p() - ln_beta(a, b);
        return rd_exp(lval, give_log);
    }
    let lval = (a + b - 1.0).ln() + dbinom_raw(a - 1.0, a + b - 2.0, x, 1.0 - x, true);
    rd_exp(lval, give_log)
}

/// Beta CDF.
pub fn pbeta(q: f64, a: f64, b: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || a.is_nan() || b.is_nan() {
        return q + a + b;
    }
    if a < 0.0 || b < 0.0 {
        return domain_nan("pbeta");
    }
    pbeta_raw(q, a, b, lower_tail, log_p)
}

/// Beta quantile, by bisecting the incomplete beta integral.
pub fn qbeta(p: f64, a: f64, b: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || a.is_nan() || b.is_nan() {
        return p + a + b;
    }
    if a < 0.0 || b < 0.0 {
        return domain_nan("qbeta");
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, 1.0, lower_tail, log_p, "qbeta") {
        return r;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    invert_cdf_unit(p_, |x| pbeta_raw(x, a, b, true, false))
}

/// Beta variate as a gamma ratio: G_a / (G_a + G_b).
pub fn rbeta(a: f64, b: f64, source: &mut dyn RandomSource) -> f64 {
    if !a.is_finite() || !b.is_finite() || a <= 0.0 || b <= 0.0 {
        return domain_nan("rbeta");
    }
    let g1 = rgamma(a, 1.0, source);
    let g2 = rgamma(b, 1.0, source);
    g1 / (g1 + g2)
}
