//! The Weibull distribution (shape, scale).

use crate::dpq::{q_p01_boundaries, rd0, rd_exp, rdt0, rdt_clog};
use crate::error::domain_nan;
use crate::rmath::log1_exp;
use crate::rng::RandomSource;

pub fn dweibull(x: f64, shape: f64, scale: f64, give_log: bool) -> f64 {
    if x.is_nan() || shape.is_nan() || scale.is_nan() {
        return x + shape + scale;
    }
    if shape <= 0.0 || scale <= 0.0 {
        return domain_nan("dweibull");
    }
    if x < 0.0 || !x.is_finite() {
        return rd0(give_log);
    }
    if x == 0.0 && shape < 1.0 {
        return f64::INFINITY;
    }
    let tx = (x / scale).powf(shape - 1.0);
    let tmp2 = tx * (x / scale);
    if give_log {
        -tmp2 + (shape * tx / scale).ln()
    } else {
        shape * tx * (-tmp2).exp() / scale
    }
}

pub fn pweibull(q: f64, shape: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || shape.is_nan() || scale.is_nan() {
        return q + shape + scale;
    }
    if shape <= 0.0 || scale <= 0.0 {
        return domain_nan("pweibull");
    }
    if q <= 0.0 {
        return rdt0(lower_tail, log_p);
    }
    let lt = -(q / scale).powf(shape);
    if lower_tail {
        if log_p {
            log1_exp(lt)
        } else {
            -lt.exp_m1()
        }
    } else {
        rd_exp(lt, log_p)
    }
}

pub fn qweibull(p: f64, shape: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || shape.is_nan() || scale.is_nan() {
        return p + shape + scale;
    }
    if shape <= 0.0 || scale <= 0.0 {
        return domain_nan("qweibull");
    }
    if let Some(r) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qweibull") {
        return r;
    }
    scale * (-rdt_clog(p, lower_tail, log_p)).powf(1.0 / shape)
}

pub fn rweibull(shape: f64, scale: f64, source: &mut dyn RandomSource) -> f64 {
    if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
        return domain_nan("rweibull");
    }
    scale * source.exp_rand().powf(1.0 / shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rel(a: f64, b: f64, tol: f64) {
        let d = (a - b).abs() / b.abs().max(1e-300);
        assert!(d <= tol, "{a} vs {b}");
    }

    #[test]
    fn shape_one_is_exponential() {
        for &x in &[0.2, 1.0, 9.0] {
            assert_rel(
                dweibull(x, 1.0, 2.0, false),
                crate::distr::exp::dexp(x, 2.0, false),
                1e-14,
            );
            assert_rel(
                pweibull(x, 1.0, 2.0, true, false),
                crate::distr::exp::pexp(x, 2.0, true, false),
                1e-14,
            );
        }
    }

    #[test]
    fn quantile_inverts() {
        for &p in &[1e-10, 0.1, 0.5, 0.99] {
            let x = qweibull(p, 2.5, 1.5, true, false);
            assert_rel(pweibull(x, 2.5, 1.5, true, false), p, 1e-11);
        }
        // Median of shape-k Weibull is scale * ln(2)^(1/k).
        assert_rel(
            qweibull(0.5, 3.0, 2.0, true, false),
            2.0 * std::f64::consts::LN_2.powf(1.0 / 3.0),
            1e-14,
        );
    }

    #[test]
    fn edge_behavior() {
        assert_eq!(dweibull(0.0, 0.5, 1.0, false), f64::INFINITY);
        assert_eq!(dweibull(-1.0, 2.0, 1.0, false), 0.0);
        assert!(dweibull(1.0, -1.0, 1.0, false).is_nan());
        assert_rel(pweibull(10.0, 2.0, 1.0, false, true), -100.0, 1e-13);
    }
}
