//! The log-normal distribution, a thin shell over the normal kernels.

use crate::dpq::{q_p01_boundaries, rd0, rdt0};
use crate::distr::norm::{pnorm, qnorm};
use crate::error::domain_nan;
use crate::rmath::M_LN_SQRT_2PI;
use crate::rng::RandomSource;

pub fn dlnorm(x: f64, meanlog: f64, sdlog: f64, give_log: bool) -> f64 {
    if x.is_nan() || meanlog.is_nan() || sdlog.is_nan() {
        return x + meanlog + sdlog;
    }
    if sdlog <= 0.0 {
        return domain_nan("dlnorm");
    }
    if x <= 0.0 {
        return rd0(give_log);
    }
    let z = (x.ln() - meanlog) / sdlog;
    if give_log {
        -(M_LN_SQRT_2PI + 0.5 * z * z + x.ln() + sdlog.ln())
    } else {
        crate::rmath::M_1_SQRT_2PI * (-0.5 * z * z).exp() / (x * sdlog)
    }
}

pub fn plnorm(q: f64, meanlog: f64, sdlog: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || meanlog.is_nan() || sdlog.is_nan() {
        return q + meanlog + sdlog;
    }
    if sdlog <= 0.0 {
        return domain_nan("plnorm");
    }
    if q <= 0.0 {
        return rdt0(lower_tail, log_p);
    }
    pnorm(q.ln(), meanlog, sdlog, lower_tail, log_p)
}

pub fn qlnorm(p: f64, meanlog: f64, sdlog: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || meanlog.is_nan() || sdlog.is_nan() {
        return p + meanlog + sdlog;
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qlnorm") {
        return r;
    }
    qnorm(p, meanlog, sdlog, lower_tail, log_p).exp()
}

pub fn rlnorm(meanlog: f64, sdlog: f64, source: &mut dyn RandomSource) -> f64 {
    if meanlog.is_nan() || !sdlog.is_finite() || sdlog < 0.0 {
        return domain_nan("rlnorm");
    }
    (meanlog + sdlog * source.norm_rand()).exp()
}
