//! The (central) chi-squared distribution: Gamma(df/2, 2).

use crate::distr::gamma::{dgamma, pgamma, qgamma, rgamma};
use crate::rng::RandomSource;

pub fn dchisq(x: f64, df: f64, give_log: bool) -> f64 {
    dgamma(x, df / 2.0, 2.0, give_log)
}

pub fn pchisq(q: f64, df: f64, lower_tail: bool, log_p: bool) -> f64 {
    pgamma(q, df / 2.0, 2.0, lower_tail, log_p)
}

pub fn qchisq(p: f64, df: f64, lower_tail: bool, log_p: bool) -> f64 {
    qgamma(p, df / 2.0, 2.0, lower_tail, log_p)
}

pub fn rchisq(df: f64, source: &mut dyn RandomSource) -> f64 {
    if !df.is_finite() || df < 0.0 {
        return crate::error::domain_nan("rchisq");
    }
    rgamma(df / 2.0, 2.0, source)
}
