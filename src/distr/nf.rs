//! The noncentral F distribution, reduced to the noncentral beta of
//! w = df1 x / (df1 x + df2) exactly as the central F reduces to the
//! central beta. No generator: sampling noncentral F is out of scope here.

use crate::dpq::{q_p01_boundaries, rd0, rdt0, rdt_qiv};
use crate::distr::f::{df as df_central, pf, qf};
use crate::distr::nbeta::{dnbeta, pnbeta2, qnbeta};
use crate::distr::nchisq::pnchisq;
use crate::error::domain_nan;

/// Noncentral F density.
pub fn dnf(x: f64, df1: f64, df2: f64, ncp: f64, give_log: bool) -> f64 {
    if x.is_nan() || df1.is_nan() || df2.is_nan() || ncp.is_nan() {
        return x + df1 + df2 + ncp;
    }
    if df1 <= 0.0 || df2 <= 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("dnf");
    }
    if !df1.is_finite() && !df2.is_finite() {
        // Both ratios degenerate to point masses at once.
        return domain_nan("dnf");
    }
    if ncp == 0.0 {
        return df_central(x, df1, df2, give_log);
    }
    if x < 0.0 {
        return rd0(give_log);
    }
    if x == 0.0 || !x.is_finite() {
        // Endpoint behavior is the central F's, damped by e^(-ncp/2); keep
        // the infinities and zeros, which the weight cannot change.
        let central = df_central(x, df1, df2, give_log);
        return if give_log {
            if central.is_finite() { central - ncp / 2.0 } else { central }
        } else if central == 0.0 || central.is_infinite() {
            central
        } else {
            central * (-ncp / 2.0).exp()
        };
    }
    let (w, wc) = if df1 * x > df2 {
        let t = df2 / (df1 * x);
        (1.0 / (1.0 + t), t / (1.0 + t))
    } else {
        let t = df1 * x / df2;
        (t / (1.0 + t), 1.0 / (1.0 + t))
    };
    // dw/dx = w (1 - w) / x.
    let ld = dnbeta(w, df1 / 2.0, df2 / 2.0, ncp, true) + w.ln() + wc.ln() - x.ln();
    if give_log {
        ld
    } else {
        ld.exp()
    }
}

/// Noncentral F CDF.
pub fn pnf(x: f64, df1: f64, df2: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || df1.is_nan() || df2.is_nan() || ncp.is_nan() {
        return x + df1 + df2 + ncp;
    }
    if df1 <= 0.0 || df2 <= 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("pnf");
    }
    if !df1.is_finite() && !df2.is_finite() {
        return domain_nan("pnf");
    }
    if ncp == 0.0 {
        return pf(x, df1, df2, lower_tail, log_p);
    }
    if x <= 0.0 {
        return rdt0(lower_tail, log_p);
    }
    if df2 > 1e8 {
        // The denominator degenerates: df1 * X is noncentral chi-squared.
        return pnchisq(x * df1, df1, ncp, lower_tail, log_p);
    }
    let y = df1 / df2 * x;
    pnbeta2(
        y / (1.0 + y),
        1.0 / (1.0 + y),
        df1 / 2.0,
        df2 / 2.0,
        ncp,
        lower_tail,
        log_p,
    )
}

/// Noncentral F quantile.
pub fn qnf(p: f64, df1: f64, df2: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || df1.is_nan() || df2.is_nan() || ncp.is_nan() {
        return p + df1 + df2 + ncp;
    }
    if df1 <= 0.0 || df2 <= 0.0 || ncp < 0.0 || !ncp.is_finite() {
        return domain_nan("qnf");
    }
    if !df1.is_finite() && !df2.is_finite() {
        return domain_nan("qnf");
    }
    if ncp == 0.0 {
        return qf(p, df1, df2, lower_tail, log_p);
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qnf") {
        return r;
    }
    if df2 > 1e8 {
        return crate::distr::nchisq::qnchisq(p, df1, ncp, lower_tail, log_p) / df1;
    }
    let p_ = rdt_qiv(p, lower_tail, log_p);
    let w = qnbeta(p_, df1 / 2.0, df2 / 2.0, ncp, true, false);
    (df2 / df1) * (w / (1.0 - w))
}
