//! The logistic distribution.

use crate::dpq::{q_p01_boundaries, rd0};
use crate::error::domain_nan;
use crate::rng::RandomSource;

pub fn dlogis(x: f64, location: f64, scale: f64, give_log: bool) -> f64 {
    if x.is_nan() || location.is_nan() || scale.is_nan() {
        return x + location + scale;
    }
    if scale <= 0.0 {
        return domain_nan("dlogis");
    }
    let z = ((x - location) / scale).abs();
    if !z.is_finite() {
        return rd0(give_log);
    }
    let e = (-z).exp();
    let f = 1.0 + e;
    if give_log {
        -(z + scale.ln() + 2.0 * f.ln())
    } else {
        e / (scale * f * f)
    }
}

pub fn plogis(q: f64, location: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || location.is_nan() || scale.is_nan() {
        return q + location + scale;
    }
    if scale <= 0.0 {
        return domain_nan("plogis");
    }
    let z = (q - location) / scale;
    // F(z) = 1/(1 + e^-z); the requested tail is 1/(1 + e^s) with the sign
    // of s chosen per tail, so the log path is a single log1p(exp).
    let s = if lower_tail { -z } else { z };
    if log_p {
        -log1p_exp(s)
    } else {
        1.0 / (1.0 + s.exp())
    }
}

/// log(1 + e^x), stable on both sides.
fn log1p_exp(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

pub fn qlogis(p: f64, location: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || location.is_nan() || scale.is_nan() {
        return p + location + scale;
    }
    if let Some(r) = q_p01_boundaries(
        p,
        f64::NEG_INFINITY,
        f64::INFINITY,
        lower_tail,
        log_p,
        "qlogis",
    ) {
        return r;
    }
    if scale < 0.0 {
        return domain_nan("qlogis");
    }
    if scale == 0.0 {
        return location;
    }
    // logit(p) = log(p) - log(1 - p), each term taken on its stable path.
    let z = crate::dpq::rdt_log(p, lower_tail, log_p) - crate::dpq::rdt_clog(p, lower_tail, log_p);
    location + scale * z
}

pub fn rlogis(location: f64, scale: f64, source: &mut dyn RandomSource) -> f64 {
    if location.is_nan() || !scale.is_finite() || scale < 0.0 {
        return domain_nan("rlogis");
    }
    if scale == 0.0 || !location.is_finite() {
        return location;
    }
    let u = source.unif_rand();
    location + scale * (u / (1.0 - u)).ln()
}
