//! Seeded statistical checks on the generators. Sample sizes and tolerances
//! are chosen so the assertions sit many standard errors away from the
//! expected values; with fixed seeds the tests are fully deterministic.

use rand::rngs::StdRng;
use rand::SeedableRng;

use dpqr::*;

const N: usize = 40_000;

fn source(seed: u64) -> RngSource<StdRng> {
    RngSource(StdRng::seed_from_u64(seed))
}

fn moments(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var)
}

/// One-sample Kolmogorov-Smirnov statistic against a CDF.
fn ks_stat(samples: &mut [f64], cdf: impl Fn(f64) -> f64) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = samples.len() as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            (f - i as f64 / n).abs().max(((i + 1) as f64 / n - f).abs())
        })
        .fold(0.0, f64::max)
}

// 1.63 / sqrt(n) is the 1% critical value; use 2/sqrt(n) for headroom.
fn ks_bound() -> f64 {
    2.0 / (N as f64).sqrt()
}

#[test]
fn rnorm_distribution() {
    let mut rng = source(11);
    let mut s: Vec<f64> = (0..N).map(|_| rnorm(2.0, 3.0, &mut rng)).collect();
    let d = ks_stat(&mut s, |x| pnorm(x, 2.0, 3.0, true, false));
    assert!(d < ks_bound(), "KS = {d}");
}

#[test]
fn rgamma_distribution() {
    for &(shape, scale) in &[(0.4, 1.0), (2.5, 3.0), (40.0, 0.1)] {
        let mut rng = source(23);
        let mut s: Vec<f64> = (0..N).map(|_| rgamma(shape, scale, &mut rng)).collect();
        let d = ks_stat(&mut s, |x| pgamma(x, shape, scale, true, false));
        assert!(d < ks_bound(), "shape {shape}: KS = {d}");
    }
}

#[test]
fn rbeta_distribution() {
    let mut rng = source(37);
    let mut s: Vec<f64> = (0..N).map(|_| rbeta(2.0, 5.0, &mut rng)).collect();
    let d = ks_stat(&mut s, |x| pbeta(x, 2.0, 5.0, true, false));
    assert!(d < ks_bound(), "KS = {d}");
}

#[test]
fn rexp_rweibull_rlogis_moments() {
    let mut rng = source(41);
    let (m, v) = moments(&(0..N).map(|_| rexp(2.0, &mut rng)).collect::<Vec<_>>());
    assert!((m - 2.0).abs() < 0.05 && (v - 4.0).abs() < 0.3, "{m} {v}");

    let s: Vec<f64> = (0..N).map(|_| rweibull(2.0, 1.0, &mut rng)).collect();
    let (m, _) = moments(&s);
    // E[Weibull(2,1)] = Gamma(1.5) = sqrt(pi)/2.
    assert!((m - 0.8862269254527580).abs() < 0.01, "{m}");

    let s: Vec<f64> = (0..N).map(|_| rlogis(1.0, 2.0, &mut rng)).collect();
    let (m, v) = moments(&s);
    // Var = (pi * scale)^2 / 3.
    assert!((m - 1.0).abs() < 0.1, "{m}");
    assert!((v - 13.159472534785811).abs() < 1.0, "{v}");
}

#[test]
fn rpois_both_regimes() {
    for &lambda in &[0.8, 7.5, 120.0] {
        let mut rng = source(53);
        let s: Vec<f64> = (0..N).map(|_| rpois(lambda, &mut rng)).collect();
        let (m, v) = moments(&s);
        let se = (lambda / N as f64).sqrt();
        assert!((m - lambda).abs() < 5.0 * se, "lambda {lambda}: mean {m}");
        assert!((v / lambda - 1.0).abs() < 0.1, "lambda {lambda}: var {v}");
        assert!(s.iter().all(|&x| x >= 0.0 && x == x.trunc()));
    }
}

#[test]
fn rpois_chi_squared_goodness_of_fit() {
    // Bin into counts 0..14 plus a >= 15 overflow cell and compare with a
    // chi-squared statistic; 26.3 is far beyond the 1% point for 15 df.
    let lambda = 7.5;
    let mut rng = source(59);
    let mut freq = [0usize; 16];
    for _ in 0..N {
        let k = rpois(lambda, &mut rng) as usize;
        freq[k.min(15)] += 1;
    }
    let mut stat = 0.0;
    for k in 0..16 {
        let p = if k < 15 {
            dpois(k as f64, lambda, false)
        } else {
            ppois(14.0, lambda, false, false)
        };
        let expected = N as f64 * p;
        stat += (freq[k] as f64 - expected).powi(2) / expected;
    }
    assert!(stat < 40.0, "chi-squared statistic {stat}");
}

#[test]
fn rbinom_matches_binomial_frequencies() {
    let (n, p) = (8.0, 0.3);
    let mut rng = source(61);
    let mut freq = [0usize; 9];
    for _ in 0..N {
        freq[rbinom(n, p, &mut rng) as usize] += 1;
    }
    for k in 0..=8 {
        let expected = N as f64 * dbinom(k as f64, n, p, false);
        if expected > 50.0 {
            let se = expected.sqrt();
            assert!(
                (freq[k] as f64 - expected).abs() < 5.0 * se,
                "k={k}: {} vs {expected}",
                freq[k]
            );
        }
    }
}

#[test]
fn rchisq_rt_rf_moments() {
    let mut rng = source(71);
    let (m, v) = moments(&(0..N).map(|_| rchisq(6.0, &mut rng)).collect::<Vec<_>>());
    assert!((m - 6.0).abs() < 0.1 && (v - 12.0).abs() < 0.6, "{m} {v}");

    let (m, v) = moments(&(0..N).map(|_| rt(10.0, &mut rng)).collect::<Vec<_>>());
    // Var of t_10 is 10/8.
    assert!(m.abs() < 0.05 && (v - 1.25).abs() < 0.1, "{m} {v}");

    let (m, _) = moments(&(0..N).map(|_| rf(5.0, 12.0, &mut rng)).collect::<Vec<_>>());
    // E[F(5,12)] = 12/10.
    assert!((m - 1.2).abs() < 0.1, "{m}");
}

#[test]
fn rnbinom_and_rhyper_moments() {
    let mut rng = source(83);
    let (size, prob) = (4.0, 0.4);
    let s: Vec<f64> = (0..N).map(|_| rnbinom(size, prob, &mut rng)).collect();
    let (m, v) = moments(&s);
    let mu = size * (1.0 - prob) / prob;
    assert!((m - mu).abs() < 0.15, "{m} vs {mu}");
    assert!((v - mu / prob).abs() < 1.0, "{v}");

    let (r, b, n) = (12.0, 8.0, 9.0);
    let s: Vec<f64> = (0..N).map(|_| rhyper(r, b, n, &mut rng)).collect();
    let (m, _) = moments(&s);
    assert!((m - n * r / (r + b)).abs() < 0.05, "{m}");
    assert!(s.iter().all(|&x| (1.0..=9.0).contains(&x)));
}

#[test]
fn rnchisq_moments() {
    let (df, ncp) = (4.0, 3.0);
    let mut rng = source(97);
    let s: Vec<f64> = (0..N).map(|_| rnchisq(df, ncp, &mut rng)).collect();
    let (m, v) = moments(&s);
    assert!((m - (df + ncp)).abs() < 0.15, "{m}");
    assert!((v - 2.0 * (df + 2.0 * ncp)).abs() < 1.5, "{v}");
}

#[test]
fn rank_statistics_means() {
    let mut rng = source(103);
    let (m_w, n_w) = (6.0, 5.0);
    let s: Vec<f64> = (0..N).map(|_| rwilcox(m_w, n_w, &mut rng)).collect();
    let (mean, _) = moments(&s);
    assert!((mean - m_w * n_w / 2.0).abs() < 0.2, "{mean}");
    assert!(s.iter().all(|&x| (0.0..=m_w * n_w).contains(&x)));

    let n = 10.0;
    let s: Vec<f64> = (0..N).map(|_| rsignrank(n, &mut rng)).collect();
    let (mean, _) = moments(&s);
    assert!((mean - n * (n + 1.0) / 4.0).abs() < 0.3, "{mean}");
}

#[test]
fn runif_respects_bounds() {
    let mut rng = source(113);
    let s: Vec<f64> = (0..N).map(|_| runif(-2.0, 3.0, &mut rng)).collect();
    assert!(s.iter().all(|&x| (-2.0..3.0).contains(&x)));
    let (m, _) = moments(&s);
    assert!((m - 0.5).abs() < 0.05, "{m}");
}
