//! The exponential distribution, parameterized by scale (mean).

use crate::dpq::{q_p01_boundaries, rd0, rd_exp, rdt0, rdt_clog};
use crate::error::domain_nan;
use crate::rng::RandomSource;

pub fn dexp(x: f64, scale: f64, give_log: bool) -> f64 {
    if x.is_nan() || scale.is_nan() {
        return x + scale;
    }
    if scale <= 0.0 {
        return domain_nan("dexp");
    }
    if x < 0.0 {
        return rd0(give_log);
    }
    if give_log {
        -x / scale - scale.ln()
    } else {
        (-x / scale).exp() / scale
    }
}

pub fn pexp(q: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || scale.is_nan() {
        return q + scale;
    }
    if scale <= 0.0 {
        return domain_nan("pexp");
    }
    if q <= 0.0 {
        return rdt0(lower_tail, log_p);
    }
    // Upper tail is exactly exp(-q/scale).
    if lower_tail {
        if log_p {
            // log(1 - e^-t) without forming the subtraction.
            crate::rmath::log1_exp(-q / scale)
        } else {
            -(-q / scale).exp_m1()
        }
    } else {
        rd_exp(-q / scale, log_p)
    }
}

pub fn qexp(p: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || scale.is_nan() {
        return p + scale;
    }
    if scale < 0.0 {
        return domain_nan("qexp");
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qexp") {
        return r;
    }
    // q = -scale * log(upper tail).
    -scale * rdt_clog(p, lower_tail, log_p)
}

pub fn rexp(scale: f64, source: &mut dyn RandomSource) -> f64 {
    if !scale.is_finite() || scale <= 0.0 {
        return domain_nan("rexp");
    }
    scale * source.exp_rand()
}
