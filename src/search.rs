//! Generic quantile search engines.
//!
//! The discrete distributions all invert their CDFs the same way: start
//! from a moment-based guess, bracket by doubling the step, then shrink the
//! bracket until it sits on a single lattice point. The continuous
//! distributions without a closed-form or special-function quantile use
//! plain bisection over a geometrically grown bracket. Both engines only
//! require the CDF to be monotone, which every CDF here is.

use crate::error::nonconvergence_warning;
use crate::rmath::forceint;

/// Smallest integer x with cdf(x) >= p, searched outward from `start`.
///
/// `p` must already be fuzzed and normalized to a plain lower-tail
/// probability by the caller. `cdf` is the plain lower-tail CDF on the
/// lattice. `right` caps the support (`f64::INFINITY` when unbounded).
pub fn discrete_quantile(p: f64, start: f64, right: f64, mut cdf: impl FnMut(f64) -> f64) -> f64 {
    let mut y = forceint(start).clamp(0.0, right);
    let mut incr = 1.0;
    if cdf(y) >= p {
        // Descend: the answer is the point where the CDF first reaches p,
        // so steps that stay at or above p move down (and double), steps
        // that fall below p shrink the bracket.
        loop {
            if y == 0.0 {
                return 0.0;
            }
            let lo = (y - incr).max(0.0);
            if cdf(lo) >= p {
                y = lo;
                incr *= 2.0;
            } else {
                if incr <= 1.0 {
                    return y;
                }
                incr = (incr / 2.0).floor().max(1.0);
            }
        }
    } else {
        // Ascend symmetrically.
        loop {
            let hi = (y + incr).min(right);
            if cdf(hi) >= p {
                if incr <= 1.0 || hi - y <= 1.0 {
                    return hi;
                }
                incr = (incr / 2.0).floor().max(1.0);
            } else {
                y = hi;
                if y >= right {
                    return right;
                }
                incr *= 2.0;
            }
        }
    }
}

const INVERT_TOL: f64 = 1e-15;
const INVERT_MAX: usize = 1000;

fn bisect(mut lo: f64, mut hi: f64, p: f64, cdf: &mut impl FnMut(f64) -> f64, geometric: bool) -> f64 {
    let mut done = false;
    for _ in 0..INVERT_MAX {
        let mid = if geometric && lo > 0.0 {
            (lo * hi).sqrt()
        } else {
            0.5 * (lo + hi)
        };
        if mid <= lo || mid >= hi {
            // The bracket has collapsed to adjacent representable values.
            done = true;
            break;
        }
        if cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if (hi - lo).abs() <= INVERT_TOL * (hi.abs() + lo.abs()).max(1.0) {
            done = true;
            break;
        }
    }
    if !done {
        nonconvergence_warning("invert_cdf", INVERT_MAX);
    }
    0.5 * (lo + hi)
}

/// Invert a continuous CDF on (0, inf): grow a geometric bracket around
/// `start`, then bisect (geometric midpoints, so decades are split evenly).
pub fn invert_cdf_positive(p: f64, start: f64, mut cdf: impl FnMut(f64) -> f64) -> f64 {
    let mut lo = if start > 0.0 && start.is_finite() { start } else { 1.0 };
    let mut hi = lo;
    if cdf(lo) < p {
        for _ in 0..INVERT_MAX {
            hi *= 2.0;
            if cdf(hi) >= p || !hi.is_finite() {
                break;
            }
            lo = hi;
        }
    } else {
        for _ in 0..INVERT_MAX {
            lo *= 0.5;
            if cdf(lo) < p || lo == 0.0 {
                break;
            }
            hi = lo;
        }
    }
    bisect(lo, hi, p, &mut cdf, true)
}

/// Invert a continuous CDF on (0, 1).
pub fn invert_cdf_unit(p: f64, mut cdf: impl FnMut(f64) -> f64) -> f64 {
    let mut lo = 0.0;
    let mut hi = 1.0;
    // Pull the bracket in from whichever side the mass sits on.
    let mut x = 0.5;
    for _ in 0..60 {
        if cdf(x) < p {
            lo = x;
            x = 0.5 * (x + hi);
        } else {
            hi = x;
            x = 0.5 * (lo + x);
        }
        if hi - lo <= INVERT_TOL {
            break;
        }
    }
    bisect(lo, hi, p, &mut cdf, false)
}

/// Invert a continuous CDF on the whole real line.
pub fn invert_cdf_real(p: f64, start: f64, mut cdf: impl FnMut(f64) -> f64) -> f64 {
    let s = if start.is_finite() { start } else { 0.0 };
    let mut lo = s - 1.0;
    let mut hi = s + 1.0;
    let mut step = 1.0;
    for _ in 0..INVERT_MAX {
        if cdf(lo) < p {
            break;
        }
        step *= 2.0;
        lo -= step;
    }
    step = 1.0;
    for _ in 0..INVERT_MAX {
        if cdf(hi) >= p {
            break;
        }
        step *= 2.0;
        hi += step;
    }
    bisect(lo, hi, p, &mut cdf, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_search_recovers_a_step_cdf() {
        // cdf(k) = (k+1)/10 on 0..=9.
        let cdf = |k: f64| ((k + 1.0) / 10.0).min(1.0);
        assert_eq!(discrete_quantile(0.05, 5.0, 9.0, cdf), 0.0);
        assert_eq!(discrete_quantile(0.1, 5.0, 9.0, cdf), 0.0);
        assert_eq!(discrete_quantile(0.11, 0.0, 9.0, cdf), 1.0);
        assert_eq!(discrete_quantile(0.95, 0.0, 9.0, cdf), 9.0);
        assert_eq!(discrete_quantile(1.0, 0.0, 9.0, cdf), 9.0);
    }

    #[test]
    fn discrete_search_far_start() {
        let cdf = |k: f64| ((k + 1.0) / 5000.0).min(1.0);
        assert_eq!(discrete_quantile(0.5, 0.0, 4999.0, cdf), 2499.0);
        assert_eq!(discrete_quantile(0.5, 4999.0, 4999.0, cdf), 2499.0);
    }

    #[test]
    fn positive_inversion() {
        // cdf of Exp(1).
        let cdf = |x: f64| -(-x as f64).exp_m1();
        let x = invert_cdf_positive(0.5, 1.0, cdf);
        assert!((x - std::f64::consts::LN_2).abs() < 1e-9);
        let x = invert_cdf_positive(1.0 - 1e-10, 1.0, cdf);
        assert!((cdf(x) - (1.0 - 1e-10)).abs() < 1e-12);
    }

    #[test]
    fn inversion_reaches_tight_relative_tolerance() {
        let cdf = |x: f64| -(-x as f64).exp_m1();
        let x = invert_cdf_positive(0.5, 1.0, cdf);
        let rel = ((x - std::f64::consts::LN_2) / std::f64::consts::LN_2).abs();
        assert!(rel < 1e-14, "rel {rel:e}");
    }

    #[test]
    fn unit_inversion() {
        let cdf = |x: f64| x * x;
        let x = invert_cdf_unit(0.25, cdf);
        assert!((x - 0.5).abs() < 1e-9);
    }

    #[test]
    fn real_line_inversion() {
        // Logistic CDF.
        let cdf = |x: f64| 1.0 / (1.0 + (-x as f64).exp());
        let x = invert_cdf_real(0.25, 0.0, cdf);
        assert!((x + (3.0_f64).ln()).abs() < 1e-9);
    }
}
