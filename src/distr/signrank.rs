//! The distribution of the Wilcoxon signed-rank statistic for a sample of
//! size n: the sum of the ranks of the positive differences.
//!
//! The counts come from the subset-sum table over {1, .., n}, filled once
//! per call up to the midpoint and mirrored by the symmetry
//! c(k) = c(n(n+1)/2 - k). Total mass is 2^n.

use crate::dpq::{
    d_nonint_check, q_p01_boundaries, rd0, rd_exp, rdt0, rdt1, rdt_qiv,
};
use crate::error::domain_nan;
use crate::rmath::forceint;
use crate::rng::RandomSource;

/// Subset-sum counts c(0..=c_mid) for ranks 1..=n; indexes past the
/// midpoint use the mirror symmetry.
struct SignrankTable {
    n: f64,
    w: Vec<f64>,
}

impl SignrankTable {
    fn new(n: f64) -> Self {
        let u = n * (n + 1.0) / 2.0;
        let c = (u / 2.0) as usize;
        let mut w = vec![0.0; c + 1];
        w[0] = 1.0;
        if c >= 1 {
            w[1] = 1.0;
        }
        let mut j = 2usize;
        while j as f64 <= n {
            let top = (j * (j + 1) / 2).min(c);
            let mut i = top;
            while i >= j {
                w[i] += w[i - j];
                i -= 1;
            }
            j += 1;
        }
        Self { n, w }
    }

    fn count(&self, k: f64) -> f64 {
        let u = self.n * (self.n + 1.0) / 2.0;
        if k < 0.0 || k > u {
            return 0.0;
        }
        let k = if k > u / 2.0 { u - k } else { k };
        self.w[k as usize]
    }
}

// The count table holds n(n+1)/4 entries; refuse sizes that would make
// the allocation absurd.
const SIGNRANK_MAX: f64 = 1000.0;

fn bad_size(n: f64) -> bool {
    n <= 0.0 || n != forceint(n) || !n.is_finite() || n > SIGNRANK_MAX
}

/// Signed-rank density.
pub fn dsignrank(x: f64, n: f64, give_log: bool) -> f64 {
    if x.is_nan() || n.is_nan() {
        return x + n;
    }
    if bad_size(n) {
        return domain_nan("dsignrank");
    }
    if let Some(r) = d_nonint_check(x, give_log, "dsignrank") {
        return r;
    }
    let x = forceint(x);
    if x < 0.0 || x > n * (n + 1.0) / 2.0 {
        return rd0(give_log);
    }
    let table = SignrankTable::new(n);
    rd_exp(table.count(x).ln() - n * std::f64::consts::LN_2, give_log)
}

/// Signed-rank CDF, from the shorter tail.
pub fn psignrank(q: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
    if q.is_nan() || n.is_nan() {
        return q + n;
    }
    if bad_size(n) {
        return domain_nan("psignrank");
    }
    let q = (q + 1e-7).floor();
    let u = n * (n + 1.0) / 2.0;
    if q < 0.0 {
        return rdt0(lower_tail, log_p);
    }
    if q >= u {
        return rdt1(lower_tail, log_p);
    }
    let table = SignrankTable::new(n);
    let lscale = n * std::f64::consts::LN_2;
    let (short_is_lower, last) = if q <= u / 2.0 {
        (true, q)
    } else {
        (false, u - q - 1.0)
    };
    let mut acc = 0.0;
    let mut k = 0.0;
    while k <= last {
        acc += (table.count(k).ln() - lscale).exp();
        k += 1.0;
    }
    let p = acc.min(1.0);
    if short_is_lower == lower_tail {
        crate::dpq::rd_val(p, log_p)
    } else {
        crate::dpq::rd_clog(p, log_p)
    }
}

/// Signed-rank quantile.
pub fn qsignrank(p: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || n.is_nan() {
        return p + n;
    }
    if bad_size(n) {
        return domain_nan("qsignrank");
    }
    let u = n * (n + 1.0) / 2.0;
    if let Some(r) = q_p01_boundaries(p, 0.0, u, lower_tail, log_p, "qsignrank") {
        return r;
    }
    let mut x = rdt_qiv(p, lower_tail, log_p);
    if x >= 1.0 {
        return u;
    }
    let table = SignrankTable::new(n);
    let scale = (-n * std::f64::consts::LN_2).exp();
    if x <= 0.5 {
        x -= 10.0 * f64::EPSILON;
        let mut acc = 0.0;
        let mut q = 0.0;
        loop {
            acc += table.count(q) * scale;
            if acc >= x {
                return q;
            }
            q += 1.0;
        }
    } else {
        x = 1.0 - x + 10.0 * f64::EPSILON;
        let mut acc = 0.0;
        let mut q = 0.0;
        loop {
            acc += table.count(q) * scale;
            if acc > x {
                return u - q;
            }
            q += 1.0;
        }
    }
}

/// Signed-rank variate: each rank enters with an independent fair sign.
pub fn rsignrank(n: f64, source: &mut dyn RandomSource) -> f64 {
    if bad_size(n) {
        return domain_nan("rsignrank");
    }
    let mut sum = 0.0;
    let mut i = 1.0;
    while i <= n {
        sum += i * (source.unif_rand() + 0.5).floor();
        i += 1.0;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rel(a: f64, b: f64, tol: f64) {
        let d = (a - b).abs() / b.abs().max(1e-300);
        assert!(d <= tol, "{a} vs {b} (rel {d:e})");
    }

    #[test]
    fn tiny_cases_by_hand() {
        // n = 2: sums 0, 1, 2, 3 each from one subset of {1, 2}: all 1/4.
        for k in 0..=3 {
            assert_rel(dsignrank(k as f64, 2.0, false), 0.25, 1e-14);
        }
        // n = 3: eight subsets of {1, 2, 3}; sum 3 arises twice ({3}, {1,2}).
        assert_rel(dsignrank(3.0, 3.0, false), 2.0 / 8.0, 1e-14);
        assert_rel(dsignrank(0.0, 3.0, false), 1.0 / 8.0, 1e-14);
        assert_eq!(dsignrank(7.0, 3.0, false), 0.0);
        assert_eq!(dsignrank(1.5, 3.0, false), 0.0);
    }

    #[test]
    fn masses_sum_to_one_and_mirror() {
        let n = 9.0;
        let u = n * (n + 1.0) / 2.0;
        let total: f64 = (0..=u as i64).map(|k| dsignrank(k as f64, n, false)).sum();
        assert_rel(total, 1.0, 1e-11);
        for k in 0..=u as i64 {
            assert_rel(
                dsignrank(k as f64, n, false),
                dsignrank(u - k as f64, n, false),
                1e-12,
            );
        }
    }

    #[test]
    fn cdf_and_quantile_agree() {
        let n = 8.0;
        let mut acc = 0.0;
        for k in 0..=(n * (n + 1.0) / 2.0) as i64 {
            acc += dsignrank(k as f64, n, false);
            assert_rel(psignrank(k as f64, n, true, false), acc.min(1.0), 1e-11);
        }
        for &p in &[0.05, 0.25, 0.5, 0.75, 0.95] {
            let k = qsignrank(p, n, true, false);
            assert!(psignrank(k, n, true, false) >= p - 1e-12);
            if k > 0.0 {
                assert!(psignrank(k - 1.0, n, true, false) < p);
            }
        }
        // Symmetric distribution: the median of n = 8 is u/2 = 18.
        assert_eq!(qsignrank(0.5, 8.0, true, false), 18.0);
    }

    #[test]
    fn sampler_support_and_mean() {
        use crate::rng::RngSource;
        use rand::SeedableRng;
        let n = 10.0;
        let u = n * (n + 1.0) / 2.0;
        let mut src = RngSource(rand::rngs::StdRng::seed_from_u64(8));
        let trials = 10_000;
        let mut sum = 0.0;
        for _ in 0..trials {
            let w = rsignrank(n, &mut src);
            assert!(w >= 0.0 && w <= u && w == w.floor());
            sum += w;
        }
        // Mean is u/2 = 27.5.
        assert!((sum / trials as f64 - 27.5).abs() < 0.35);
    }
}
