//! The distribution families.
//!
//! Each module exports the classic quartet for its family: a density
//! (`d*`), a CDF (`p*`), a quantile (`q*`) and, where a sampler makes
//! sense, a generator (`r*`). All CDFs and quantiles carry the
//! `(lower_tail, log_p)` pair and all densities a `give_log` flag; see
//! [`crate::dpq`] for the conventions.

pub mod beta;
pub mod binom;
pub mod chisq;
pub mod exp;
pub mod f;
pub mod gamma;
pub mod hyper;
pub mod lnorm;
pub mod logis;
pub mod nbeta;
pub mod nbinom;
pub mod nchisq;
pub mod nf;
pub mod norm;
pub mod pois;
pub mod signrank;
pub mod t;
pub mod unif;
pub mod weibull;
pub mod wilcox;
