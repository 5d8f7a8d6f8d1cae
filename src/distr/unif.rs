//! The continuous uniform distribution on [min, max].

use crate::dpq::{q_p01_check, rd_val, rdt0, rdt1, rdt_qiv};
use crate::error::domain_nan;
use crate::rng::RandomSource;

pub fn dunif(x: f64, min: f64, max: f64, give_log: bool) -> f64 {
    if x.is_nan() || min.is_nan() || max.is_nan() {
        return x + min + max;
    }
    if max < min || !min.is_finite() || !max.is_finite() {
        return domain_nan("dunif");
    }
    if (min..=max).contains(&x) {
        rd_val(1.0 / (max - min), give_log)
    } else {
        crate::dpq::rd0(give_log)
    }
}

pub fn punif(q: f64, min: f64, max: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || min.is_nan() || max.is_nan() {
        return q + min + max;
    }
    if max < min || !min.is_finite() || !max.is_finite() {
        return domain_nan("punif");
    }
    if q >= max {
        return rdt1(lower_tail, log_p);
    }
    if q <= min {
        return rdt0(lower_tail, log_p);
    }
    if lower_tail {
        rd_val((q - min) / (max - min), log_p)
    } else {
        rd_val((max - q) / (max - min), log_p)
    }
}

pub fn qunif(p: f64, min: f64, max: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || min.is_nan() || max.is_nan() {
        return p + min + max;
    }
    if let Some(r) = q_p01_check(p, log_p, "qunif") {
        return r;
    }
    if max < min || !min.is_finite() || !max.is_finite() {
        return domain_nan("qunif");
    }
    if max == min {
        return min;
    }
    min + rdt_qiv(p, lower_tail, log_p) * (max - min)
}

pub fn runif(min: f64, max: f64, source: &mut dyn RandomSource) -> f64 {
    if !min.is_finite() || !max.is_finite() || max < min {
        return domain_nan("runif");
    }
    if max == min {
        return min;
    }
    min + (max - min) * source.unif_rand()
}
