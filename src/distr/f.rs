//! The (central) F distribution.
//!
//! Everything reduces to the beta distribution of w = m x / (m x + n); the
//! only subtlety is computing w (or its complement) without cancellation on
//! whichever side of the ratio is large, plus chi-squared shortcuts when
//! one of the degrees of freedom is so large that the other factor is
//! effectively constant.

use crate::dpq::{q_p01_boundaries, rd0, rdt0, rdt_qiv};
use crate::distr::beta::dbeta;
use crate::distr::chisq::{pchisq, qchisq, rchisq};
use crate::error::domain_nan;
use crate::rng::RandomSource;
use crate::special::pbeta_raw;

/// F density: the beta density of w, times dw/dx = m n / (m x + n)^2.
pub fn df(x: f64, df1: f64, df2: f64, give_log: bool) -> f64 {
    if x.is_nan() || df1.is_nan() || df2.is_nan() {
        return x + df1 + df2;
    }
    if df1 <= 0.0 || df2 <= 0.0 {
        return domain_nan("df");
    }
    if x < 0.0 {
        return rd0(give_log);
    }
    if x == 0.0 {
        if df1 < 2.0 {
            return f64::INFINITY;
        }
        if df1 > 2.0 {
            return rd0(give_log);
        }
        return if give_log { 0.0 } else { 1.0 };
    }
    if !x.is_finite() {
        return rd0(give_log);
    }
    let (w, wc) = split_ratio(x, df1, df2);
    // dw/dx = m n / (m x + n)^2 = w (1 - w) / x, which never overflows.
    let ld = dbeta(w, df1 / 2.0, df2 / 2.0, true) + w.ln() + wc.ln() - x.ln();
    if give_log {
        ld
    } else {
        ld.exp()
    }
}

/// w = m x / (m x + n) and its complement, each computed on its own
/// cancellation-free path.
fn split_ratio(x: f64, df1: f64, df2: f64) -> (f64, f64) {
    if df1 * x > df2 {
        let t = df2 / (df1 * x);
        (1.0 / (1.0 + t), t / (1.0 + t))
    } else {
        let t = df1 * x / df2;
        (t / (1.0 + t), 1.0 / (1.0 + t))
    }
}

/// F CDF.
pub fn pf(x: f64, df1: f64, df2: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || df1.is_nan() || df2.is_nan() {
        return x + df1 + df2;
    }
    if df1 <= 0.0 || df2 <= 0.0 {
        return domain_nan("pf");
    }
    if x <= 0.0 {
        return rdt0(lower_tail, log_p);
    }
    // One enormous df: the corresponding chi-squared factor degenerates.
    if df2 == f64::INFINITY {
        if df1 == f64::INFINITY {
            return crate::dpq::p_bounds_01(x, 1.0, 1.0, lower_tail, log_p)
                .unwrap_or_else(|| crate::dpq::rd_half(log_p));
        }
        return pchisq(x * df1, df1, lower_tail, log_p);
    }
    if df1 == f64::INFINITY {
        return pchisq(df2 / x, df2, !lower_tail, log_p);
    }
    if df1 * x > df2 {
        let (_, wc) = split_ratio(x, df1, df2);
        pbeta_raw(wc, df2 / 2.0, df1 / 2.0, !lower_tail, log_p)
    } else {
        let (w, _) = split_ratio(x, df1, df2);
        pbeta_raw(w, df1 / 2.0, df2 / 2.0, lower_tail, log_p)
    }
}

/// F quantile.
pub fn qf(p: f64, df1: f64, df2: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || df1.is_nan() || df2.is_nan() {
        return p + df1 + df2;
    }
    if df1 <= 0.0 || df2 <= 0.0 {
        return domain_nan("qf");
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qf") {
        return r;
    }
    // Degenerate-factor shortcuts mirror pf.
    if df1 <= df2 && df2 > 4e5 {
        if !df1.is_finite() {
            return 1.0;
        }
        return qchisq(p, df1, lower_tail, log_p) / df1;
    }
    if df1 > 4e5 {
        return df2 / qchisq(p, df2, !lower_tail, log_p);
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    // Invert through the beta quantile, from the side that keeps the
    // smaller of w and 1-w at full precision.
    if p_ < 0.5 {
        let w = crate::distr::beta::qbeta(p_, df1 / 2.0, df2 / 2.0, true, false);
        (df2 / df1) * (w / (1.0 - w))
    } else {
        let wc = crate::distr::beta::qbeta(p_, df2 / 2.0, df1 / 2.0, false, false);
        (df2 / df1) * ((1.0 - wc) / wc)
    }
}

/// F variate as a ratio of scaled chi-squared draws.
pub fn rf(df1: f64, df2: f64, source: &mut dyn RandomSource) -> f64 {
    if df1.is_nan() || df2.is_nan() || df1 <= 0.0 || df2 <= 0.0 {
        return domain_nan("rf");
    }
    let num = if df1.is_finite() {
        rchisq(df1, source) / df1
    } else {
        1.0
    };
    let den = if df2.is_finite() {
        rchisq(df2, source) / df2
    } else {
        1.0
    };
    num / den
}
