//! Shared numeric primitives: rounding helpers, NaN-propagating min/max,
//! log-space accumulation, the Stirling error and the binomial deviance.
//!
//! `stirlerr` and `bd0` are the two kernels behind every density in the
//! library that would otherwise suffer catastrophic cancellation: a
//! factorial-based log density is assembled as
//! `stirlerr(n) - stirlerr(x) - stirlerr(n-x) - bd0(x, n p) - bd0(n-x, n q)`
//! and only exponentiated at the very end.

use crate::error::domain_nan;

/// ln(sqrt(2 pi))
pub const M_LN_SQRT_2PI: f64 = 0.918_938_533_204_672_741_780_329_736_406;
/// 1 / sqrt(2 pi)
pub const M_1_SQRT_2PI: f64 = 0.398_942_280_401_432_677_939_946_059_934;
/// sqrt(32)
pub const M_SQRT_32: f64 = 5.656_854_249_492_380_195_206_754_896_838;
/// ln(2)
pub const M_LN2: f64 = std::f64::consts::LN_2;
/// 2 pi
pub const M_2PI: f64 = 6.283_185_307_179_586_476_925_286_766_559;

/// Round to the nearest integer, returned as `f64` so values beyond the
/// integer range survive. `NaN` maps to 0, matching the reference behaviour
/// of the interpreter runtime this library grew out of.
pub fn forceint(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    (x + 0.5).floor()
}

/// Maximum with the NaN-propagation-by-sum convention.
pub fn fmax2(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    if x < y {
        y
    } else {
        x
    }
}

/// Minimum with the NaN-propagation-by-sum convention.
pub fn fmin2(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    if x < y {
        x
    } else {
        y
    }
}

/// |x| carrying the sign of y.
pub fn fsign(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    if y >= 0.0 {
        x.abs()
    } else {
        -x.abs()
    }
}

/// log(exp(lx) + exp(ly)) without leaving log space.
pub fn logspace_add(lx: f64, ly: f64) -> f64 {
    if lx == f64::NEG_INFINITY {
        return ly;
    }
    if ly == f64::NEG_INFINITY {
        return lx;
    }
    fmax2(lx, ly) + (-(lx - ly).abs()).exp().ln_1p()
}

/// log(exp(lx) - exp(ly)), requiring lx >= ly.
pub fn logspace_sub(lx: f64, ly: f64) -> f64 {
    lx + log1_exp(ly - lx)
}

/// log(1 - exp(x)) for x <= 0, split at -ln 2 to keep full precision on
/// both sides (Maechler's recipe).
pub fn log1_exp(x: f64) -> f64 {
    if x > -M_LN2 {
        (-x.exp_m1()).ln()
    } else {
        (-x.exp()).ln_1p()
    }
}

// stirlerr(n) for n = 0, 0.5, 1, 1.5, ..., 15 (index = 2n); index 0 is a
// placeholder, n = 0 never reaches the table.
const SFERR_HALVES: [f64; 31] = [
    0.0,
    0.153_426_409_720_027_345_291_384_8,   /* 0.5 */
    0.081_061_466_795_327_258_219_670_2,   /* 1.0 */
    0.054_814_121_051_917_653_896_139_0,   /* 1.5 */
    0.041_340_695_955_409_294_093_822_1,   /* 2.0 */
    0.033_162_873_519_936_287_485_110_48,  /* 2.5 */
    0.027_677_925_684_998_339_148_789_29,  /* 3.0 */
    0.023_746_163_656_297_495_971_329_20,  /* 3.5 */
    0.020_790_672_103_765_093_111_522_77,  /* 4.0 */
    0.018_488_450_532_673_185_230_779_34,  /* 4.5 */
    0.016_644_691_189_821_192_163_194_87,  /* 5.0 */
    0.015_134_973_221_917_378_873_512_55,  /* 5.5 */
    0.013_876_128_823_070_747_998_745_73,  /* 6.0 */
    0.012_810_465_242_920_226_924_249_86,  /* 6.5 */
    0.011_896_709_945_891_770_095_055_72,  /* 7.0 */
    0.011_104_559_758_206_917_326_629_91,  /* 7.5 */
    0.010_411_265_261_972_096_497_478_567, /* 8.0 */
    0.009_799_416_126_158_803_298_389_475, /* 8.5 */
    0.009_255_462_182_712_732_917_728_637, /* 9.0 */
    0.008_768_700_134_139_385_462_952_823, /* 9.5 */
    0.008_330_563_433_362_871_256_469_318, /* 10.0 */
    0.007_934_114_564_314_020_547_248_100, /* 10.5 */
    0.007_573_675_487_951_840_794_972_024, /* 11.0 */
    0.007_244_554_301_320_383_179_543_912, /* 11.5 */
    0.006_942_840_107_209_529_865_664_152, /* 12.0 */
    0.006_665_247_032_707_682_442_354_394, /* 12.5 */
    0.006_408_994_188_004_207_068_439_631, /* 13.0 */
    0.006_171_712_263_039_457_647_532_867, /* 13.5 */
    0.005_951_370_112_758_847_735_624_416, /* 14.0 */
    0.005_746_216_513_010_115_682_023_589, /* 14.5 */
    0.005_554_733_551_962_801_371_038_690, /* 15.0 */
];

const S0: f64 = 0.083333333333333333333; /* 1/12 */
const S1: f64 = 0.00277777777777777777778; /* 1/360 */
const S2: f64 = 0.00079365079365079365079365; /* 1/1260 */
const S3: f64 = 0.000595238095238095238095238; /* 1/1680 */
const S4: f64 = 0.0008417508417508417508417508; /* 1/1188 */

/// Stirling's error: `log(n!) - log(sqrt(2 pi n) (n/e)^n)`.
///
/// Exact tabulated values at half-integers up to 15, then the asymptotic
/// expansion with as many terms as n requires.
pub fn stirlerr(n: f64) -> f64 {
    if n <= 15.0 {
        let nn = n + n;
        if nn == nn.floor() && nn >= 1.0 {
            return SFERR_HALVES[nn as usize];
        }
        return crate::special::ln_gamma(n + 1.0) - (n + 0.5) * n.ln() + n - M_LN_SQRT_2PI;
    }

    let nn = n * n;
    if n > 500.0 {
        return (S0 - S1 / nn) / n;
    }
    if n > 80.0 {
        return (S0 - (S1 - S2 / nn) / nn) / n;
    }
    if n > 35.0 {
        return (S0 - (S1 - (S2 - S3 / nn) / nn) / nn) / n;
    }
    /* 15 < n <= 35 */
    (S0 - (S1 - (S2 - (S3 - S4 / nn) / nn) / nn) / nn) / n
}

/// Binomial deviance `x log(x/np) + np - x`, evaluated by a Taylor series
/// when x is within 10% of np so the logarithm never cancels.
pub fn bd0(x: f64, np: f64) -> f64 {
    if !x.is_finite() || !np.is_finite() || np == 0.0 {
        return domain_nan("bd0");
    }

    if (x - np).abs() < 0.1 * (x + np) {
        let mut v = (x - np) / (x + np);
        let mut s = (x - np) * v;
        let mut ej = 2.0 * x * v;
        v *= v;
        let mut j = 1.0;
        loop {
            ej *= v;
            let s1 = s + ej / (2.0 * j + 1.0);
            if s1 == s {
                return s1;
            }
            s = s1;
            j += 1.0;
        }
    }
    x * (x / np).ln() + np - x
}
