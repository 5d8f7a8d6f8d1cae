//! The normal distribution.
//!
//! `pnorm` is Cody's three-region rational approximation (the one behind
//! ALGORITHM 715), evaluated so that both tails and their logs are accurate
//! down to the underflow limit. `qnorm` is Wichura's AS 241 rational
//! approximation, double-precision branch, good to about 16 digits.

use crate::dpq::{rd0, rdt0, rdt1, rdt_qiv};
use crate::error::domain_nan;
use crate::rmath::{M_1_SQRT_2PI, M_LN_SQRT_2PI, M_SQRT_32};
use crate::rng::RandomSource;

/// Normal density.
pub fn dnorm(x: f64, mean: f64, sd: f64, give_log: bool) -> f64 {
    if x.is_nan() || mean.is_nan() || sd.is_nan() {
        return x + mean + sd;
    }
    if sd < 0.0 {
        return domain_nan("dnorm");
    }
    if sd == 0.0 {
        return if x == mean { f64::INFINITY } else { rd0(give_log) };
    }
    let z = (x - mean) / sd;
    if !z.is_finite() {
        return rd0(give_log);
    }
    if give_log {
        -(M_LN_SQRT_2PI + 0.5 * z * z + sd.ln())
    } else {
        M_1_SQRT_2PI * (-0.5 * z * z).exp() / sd
    }
}

const PNORM_A: [f64; 5] = [
    2.2352520354606839287,
    161.02823106855587881,
    1067.6894854603709582,
    18154.981253343561249,
    0.065682337918207449113,
];
const PNORM_B: [f64; 4] = [
    47.20258190468824187,
    976.09855173777669322,
    10260.932208618978205,
    45507.789335026729956,
];
const PNORM_C: [f64; 9] = [
    0.39894151208813466764,
    8.8831497943883759412,
    93.506656132177855979,
    597.27027639480026226,
    2494.5375852903726711,
    6848.1904505362823326,
    16003.184846516838186,
    28288.967758088486744,
    7.7545491003969270431e-7,
];
const PNORM_D: [f64; 8] = [
    22.266688044328115691,
    235.38790178262499861,
    1519.377599407554805,
    6485.558298266760755,
    18615.571640885098091,
    34900.952721145977266,
    38912.003286093271411,
    19685.429676859990727,
];
const PNORM_P: [f64; 6] = [
    0.21589853405795699,
    0.1274011611602473639,
    0.022235277870649807,
    0.001421619193227893466,
    2.9112874951168792e-5,
    0.02307344176494017303,
];
const PNORM_Q: [f64; 5] = [
    1.28426009614491121,
    0.468238212480865118,
    0.0659881378689285515,
    0.00378239633202758244,
    7.29751555083966205e-5,
];

/// Both tails of the standard normal CDF at once, on the scale requested.
///
/// The del trick splits z^2 into a coarse square plus a small remainder so
/// exp(-z^2/2) keeps full relative accuracy far into the tail.
pub(crate) fn pnorm_both(x: f64, log_p: bool) -> (f64, f64) {
    let eps = f64::EPSILON * 0.5;
    let y = x.abs();
    let (cum, ccum);
    if y <= 0.67448975 {
        // |x| up to the 3/4 quantile: a direct rational for Phi(x) - 1/2.
        let temp = if y > eps {
            let xsq = x * x;
            let mut xnum = PNORM_A[4] * xsq;
            let mut xden = xsq;
            for i in 0..3 {
                xnum = (xnum + PNORM_A[i]) * xsq;
                xden = (xden + PNORM_B[i]) * xsq;
            }
            x * (xnum + PNORM_A[3]) / (xden + PNORM_B[3])
        } else {
            x * PNORM_A[3] / PNORM_B[3]
        };
        let lo = 0.5 + temp;
        let hi = 0.5 - temp;
        return if log_p { (lo.ln(), hi.ln()) } else { (lo, hi) };
    } else if y <= M_SQRT_32 {
        let mut xnum = PNORM_C[8] * y;
        let mut xden = y;
        for i in 0..7 {
            xnum = (xnum + PNORM_C[i]) * y;
            xden = (xden + PNORM_D[i]) * y;
        }
        let temp = (xnum + PNORM_C[7]) / (xden + PNORM_D[7]);
        let (lower, upper) = tail_pair(y, temp, log_p);
        if x > 0.0 {
            cum = lower;
            ccum = upper;
        } else {
            cum = upper;
            ccum = lower;
        }
    } else if (log_p && y < 1e170) || (!log_p && y < 37.5193) {
        // Far tail: asymptotic rational in 1/x^2.
        let xsq = 1.0 / (x * x);
        let mut xnum = PNORM_P[5] * xsq;
        let mut xden = xsq;
        for i in 0..4 {
            xnum = (xnum + PNORM_P[i]) * xsq;
            xden = (xden + PNORM_Q[i]) * xsq;
        }
        let mut temp = xsq * (xnum + PNORM_P[4]) / (xden + PNORM_Q[4]);
        temp = (M_1_SQRT_2PI - temp) / y;
        let (lower, upper) = tail_pair(y, temp, log_p);
        if x > 0.0 {
            cum = lower;
            ccum = upper;
        } else {
            cum = upper;
            ccum = lower;
        }
    } else {
        // Beyond representability: the small tail underflows outright.
        return if x > 0.0 {
            (if log_p { 0.0 } else { 1.0 }, if log_p { f64::NEG_INFINITY } else { 0.0 })
        } else {
            (if log_p { f64::NEG_INFINITY } else { 0.0 }, if log_p { 0.0 } else { 1.0 })
        };
    }
    (cum, ccum)
}

/// (upper tail, 1 - upper tail) at |x| = y given the rational factor temp,
/// where upper = exp(-y^2/2) * temp.
fn tail_pair(y: f64, temp: f64, log_p: bool) -> (f64, f64) {
    let xsq = (y * 16.0).trunc() / 16.0;
    let del = (y - xsq) * (y + xsq);
    if log_p {
        let upper = -xsq * xsq * 0.5 - del * 0.5 + temp.ln();
        let lower = (-upper.exp()).ln_1p();
        (lower, upper)
    } else {
        let upper = (-xsq * xsq * 0.5).exp() * (-del * 0.5).exp() * temp;
        (1.0 - upper, upper)
    }
}

/// Normal CDF.
pub fn pnorm(q: f64, mean: f64, sd: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || mean.is_nan() || sd.is_nan() {
        return q + mean + sd;
    }
    if !q.is_finite() && mean == q {
        return f64::NAN;
    }
    if sd < 0.0 {
        return domain_nan("pnorm");
    }
    if sd == 0.0 {
        return if q < mean {
            rdt0(lower_tail, log_p)
        } else {
            rdt1(lower_tail, log_p)
        };
    }
    let z = (q - mean) / sd;
    if !z.is_finite() {
        return if z < 0.0 {
            rdt0(lower_tail, log_p)
        } else {
            rdt1(lower_tail, log_p)
        };
    }
    let (cum, ccum) = pnorm_both(z, log_p);
    if lower_tail {
        cum
    } else {
        ccum
    }
}

/// Normal quantile, AS 241.
pub fn qnorm(p: f64, mean: f64, sd: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || mean.is_nan() || sd.is_nan() {
        return p + mean + sd;
    }
    if log_p {
        if p > 0.0 {
            return domain_nan("qnorm");
        }
        if p == 0.0 {
            return if lower_tail { f64::INFINITY } else { f64::NEG_INFINITY };
        }
        if p == f64::NEG_INFINITY {
            return if lower_tail { f64::NEG_INFINITY } else { f64::INFINITY };
        }
    } else {
        if !(0.0..=1.0).contains(&p) {
            return domain_nan("qnorm");
        }
        if p == 0.0 {
            return if lower_tail { f64::NEG_INFINITY } else { f64::INFINITY };
        }
        if p == 1.0 {
            return if lower_tail { f64::INFINITY } else { f64::NEG_INFINITY };
        }
    }
    if sd < 0.0 {
        return domain_nan("qnorm");
    }
    if sd == 0.0 {
        return mean;
    }

    let p_ = rdt_qiv(p, lower_tail, log_p);
    let q = p_ - 0.5;
    let val;
    if q.abs() <= 0.425 {
        let r = 0.180625 - q * q;
        val = q
            * (((((((r * 2509.0809287301226727 + 33430.575583588128105) * r
                + 67265.770927008700853)
                * r
                + 45921.953931549871457)
                * r
                + 13731.693765509461125)
                * r
                + 1971.5909503065514427)
                * r
                + 133.14166789178437745)
                * r
                + 3.387132872796366608)
            / (((((((r * 5226.495278852545703 + 28729.085735721942674) * r
                + 39307.89580009271061)
                * r
                + 21213.794301586595867)
                * r
                + 5394.1960214247511077)
                * r
                + 687.1870074920579083)
                * r
                + 42.313330701600911252)
                * r
                + 1.0);
    } else {
        // Work from the smaller tail, taking its log exactly when the
        // caller already supplied logs on that side.
        let lr = if log_p && ((lower_tail && q <= 0.0) || (!lower_tail && q > 0.0)) {
            p
        } else {
            let r = if q < 0.0 { p_ } else { 0.5 - p_ + 0.5 };
            r.ln()
        };
        let mut r = (-lr).sqrt();
        let v;
        if r <= 5.0 {
            r -= 1.6;
            v = (((((((r * 7.7454501427834140764e-4 + 0.0227238449892691845833) * r
                + 0.24178072517745061177)
                * r
                + 1.27045825245236838258)
                * r
                + 3.64784832476320460504)
                * r
                + 5.7694972214606914055)
                * r
                + 4.6303378461565452959)
                * r
                + 1.42343711074968357734)
                / (((((((r * 1.05075007164441684324e-9 + 5.475938084995344946e-4) * r
                    + 0.0151986665636164571966)
                    * r
                    + 0.14810397642748007459)
                    * r
                    + 0.68976733498510000455)
                    * r
                    + 1.6763848301838038494)
                    * r
                    + 2.05319162663775882187)
                    * r
                    + 1.0);
        } else {
            r -= 5.0;
            v = (((((((r * 2.01033439929228813265e-7 + 2.71155556874348757815e-5) * r
                + 0.0012426609473880784386)
                * r
                + 0.026532189526576123093)
                * r
                + 0.29656057182850489123)
                * r
                + 1.7848265399172913358)
                * r
                + 5.4637849111641143699)
                * r
                + 6.6579046435011037772)
                / (((((((r * 2.04426310338993978564e-15 + 1.4215117583164458887e-7) * r
                    + 1.8463183175100546818e-5)
                    * r
                    + 7.868691311456132591e-4)
                    * r
                    + 0.0148753612908506148525)
                    * r
                    + 0.13692988092273580531)
                    * r
                    + 0.59983220655588793769)
                    * r
                    + 1.0);
        }
        val = if q < 0.0 { -v } else { v };
    }
    mean + sd * val
}

/// Normal variate.
pub fn rnorm(mean: f64, sd: f64, source: &mut dyn RandomSource) -> f64 {
    if mean.is_nan() || !sd.is_finite() || sd < 0.0 {
        return domain_nan("rnorm");
    }
    if sd == 0.0 || !mean.is_finite() {
        return mean;
    }
    mean + sd * source.norm_rand()
}
