//! The probability-representation convention layer.
//!
//! Every CDF and quantile in this library speaks four dialects, selected by
//! two flags: `(lower_tail, log_p)`. The helpers here convert between the
//! dialects without ever forming `1 - p` when p is near 0 or 1 — the
//! complementary paths go through `ln_1p` / `exp_m1` instead — and provide
//! the boundary early-returns that let a kernel skip its general algorithm
//! when the answer is already decided.

use crate::error::domain_nan;
use crate::rmath::{log1_exp, M_LN2};

/// The representation of probability 0.
pub fn rd0(log_p: bool) -> f64 {
    if log_p {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}

/// The representation of probability 1.
pub fn rd1(log_p: bool) -> f64 {
    if log_p {
        0.0
    } else {
        1.0
    }
}

/// The representation of P(X <= lowest possible value), i.e. tail-aware 0.
pub fn rdt0(lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        rd0(log_p)
    } else {
        rd1(log_p)
    }
}

/// Tail-aware 1.
pub fn rdt1(lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        rd1(log_p)
    } else {
        rd0(log_p)
    }
}

/// The representation of probability 1/2.
pub fn rd_half(log_p: bool) -> f64 {
    if log_p {
        -M_LN2
    } else {
        0.5
    }
}

/// p if lower tail, 1 - p otherwise (plain probability in, plain out).
pub fn rd_lval(p: f64, lower_tail: bool) -> f64 {
    if lower_tail {
        p
    } else {
        0.5 - p + 0.5
    }
}

/// 1 - p if lower tail, p otherwise.
pub fn rd_cval(p: f64, lower_tail: bool) -> f64 {
    if lower_tail {
        0.5 - p + 0.5
    } else {
        p
    }
}

/// A plain probability x, presented in the caller's scale.
pub fn rd_val(x: f64, log_p: bool) -> f64 {
    if log_p {
        x.ln()
    } else {
        x
    }
}

/// 1 - x, presented in the caller's scale (log side via `ln_1p`).
pub fn rd_clog(x: f64, log_p: bool) -> f64 {
    if log_p {
        (-x).ln_1p()
    } else {
        0.5 - x + 0.5
    }
}

/// A log-scale probability x, presented in the caller's scale.
pub fn rd_exp(x: f64, log_p: bool) -> f64 {
    if log_p {
        x
    } else {
        x.exp()
    }
}

/// log(p) where p is in the caller's scale already.
pub fn rd_log(p: f64, log_p: bool) -> f64 {
    if log_p {
        p
    } else {
        p.ln()
    }
}

/// log(1 - p) where p is in the caller's scale.
pub fn rd_lexp(p: f64, log_p: bool) -> f64 {
    if log_p {
        log1_exp(p)
    } else {
        (-p).ln_1p()
    }
}

/// exp(x)/sqrt(f) in the caller's scale; the common tail of the
/// Stirling-decomposed densities.
pub fn rd_fexp(f: f64, x: f64, give_log: bool) -> f64 {
    if give_log {
        -0.5 * f.ln() + x
    } else {
        x.exp() / f.sqrt()
    }
}

/// A lower-tail probability x, presented per the caller's tail and scale.
pub fn rdt_val(x: f64, lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        rd_val(x, log_p)
    } else {
        rd_clog(x, log_p)
    }
}

/// The caller's p, normalized to a plain lower-tail probability
/// ("quantile inversion" direction).
pub fn rdt_qiv(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if log_p {
        if lower_tail {
            p.exp()
        } else {
            -p.exp_m1()
        }
    } else {
        rd_lval(p, lower_tail)
    }
}

/// The caller's p, normalized to a plain upper-tail probability.
pub fn rdt_civ(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if log_p {
        if lower_tail {
            -p.exp_m1()
        } else {
            p.exp()
        }
    } else {
        rd_cval(p, lower_tail)
    }
}

/// log of the lower-tail probability the caller's p denotes.
pub fn rdt_log(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        rd_log(p, log_p)
    } else {
        rd_lexp(p, log_p)
    }
}

/// log of the upper-tail probability the caller's p denotes.
pub fn rdt_clog(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        rd_lexp(p, log_p)
    } else {
        rd_log(p, log_p)
    }
}

/// Check that a quantile argument p is a valid probability in the caller's
/// scale. `Some(NaN)` (with a domain warning) means the caller must return
/// immediately.
pub fn q_p01_check(p: f64, log_p: bool, name: &'static str) -> Option<f64> {
    if (log_p && p > 0.0) || (!log_p && !(0.0..=1.0).contains(&p)) {
        return Some(domain_nan(name));
    }
    None
}

/// Combined boundary handling for quantile functions: invalid p is a domain
/// error, p at either end maps to the support's infimum/supremum.
pub fn q_p01_boundaries(
    p: f64,
    left: f64,
    right: f64,
    lower_tail: bool,
    log_p: bool,
    name: &'static str,
) -> Option<f64> {
    if log_p {
        if p > 0.0 {
            return Some(domain_nan(name));
        }
        if p == 0.0 {
            return Some(if lower_tail { right } else { left });
        }
        if p == f64::NEG_INFINITY {
            return Some(if lower_tail { left } else { right });
        }
    } else {
        if !(0.0..=1.0).contains(&p) {
            return Some(domain_nan(name));
        }
        if p == 0.0 {
            return Some(if lower_tail { left } else { right });
        }
        if p == 1.0 {
            return Some(if lower_tail { right } else { left });
        }
    }
    None
}

/// CDF boundary handling: x at or beyond the support edges is decided
/// without running the general algorithm.
pub fn p_bounds_01(x: f64, x_min: f64, x_max: f64, lower_tail: bool, log_p: bool) -> Option<f64> {
    if x <= x_min {
        return Some(rdt0(lower_tail, log_p));
    }
    if x >= x_max {
        return Some(rdt1(lower_tail, log_p));
    }
    None
}

/// Density check for a discrete distribution: a non-integer x carries no
/// mass; flag it and return 0.
pub fn d_nonint_check(x: f64, give_log: bool, name: &'static str) -> Option<f64> {
    // Relative fuzz: lattice values that picked up rounding noise at
    // large magnitudes still count as integers.
    if (x - crate::rmath::forceint(x)).abs() > 1e-7 * x.abs().max(1.0) {
        crate::error::precision_warning(name);
        return Some(rd0(give_log));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} vs {b} (tol {tol})");
    }

    #[test]
    fn four_representations_agree() {
        let p: f64 = 1e-12;
        // lower/plain -> the other three and back
        assert_close(rdt_qiv(p, true, false), p, 0.0);
        assert_close(rdt_qiv(1.0 - p, false, false), p, 1e-24);
        assert_close(rdt_qiv(p.ln(), true, true), p, 1e-26);
        // upper/log of the complement round-trips without forming 1 - p
        let upper_log = rd_lexp(p, false);
        assert_close(rdt_qiv(upper_log, false, true), p, p * 1e-12);
    }

    #[test]
    fn boundary_values() {
        assert_eq!(rdt0(true, false), 0.0);
        assert_eq!(rdt0(false, false), 1.0);
        assert_eq!(rdt0(true, true), f64::NEG_INFINITY);
        assert_eq!(rdt1(true, true), 0.0);
    }

    #[test]
    fn quantile_boundaries() {
        assert_eq!(
            q_p01_boundaries(0.0, 0.0, f64::INFINITY, true, false, "t"),
            Some(0.0)
        );
        assert_eq!(
            q_p01_boundaries(1.0, 0.0, f64::INFINITY, true, false, "t"),
            Some(f64::INFINITY)
        );
        assert_eq!(
            q_p01_boundaries(0.0, 0.0, f64::INFINITY, true, true, "t"),
            Some(f64::INFINITY)
        );
        assert!(q_p01_boundaries(0.5, 0.0, 1.0, true, false, "t").is_none());
        assert!(q_p01_boundaries(1.5, 0.0, 1.0, true, false, "t")
            .unwrap()
            .is_nan());
    }

    #[test]
    fn nonint_density_is_zero() {
        assert_eq!(d_nonint_check(2.5, false, "t"), Some(0.0));
        assert_eq!(d_nonint_check(2.5, true, "t"), Some(f64::NEG_INFINITY));
        assert!(d_nonint_check(3.0, false, "t").is_none());
        // The fuzz scales with magnitude.
        assert!(d_nonint_check(1e10 + 0.4, false, "t").is_none());
        assert!(d_nonint_check(10.4, false, "t").is_some());
    }
}
