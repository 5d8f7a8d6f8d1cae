//! Special functions backing the distribution kernels: the log-gamma and
//! log-beta functions, binomial coefficients, and the regularized incomplete
//! gamma and beta integrals that every gamma/beta-family CDF reduces to.

mod betainc;
mod gamma;
mod gammainc;

pub use betainc::pbeta_raw;
pub use gamma::{choose, gamma_fn, lchoose, ln_beta, ln_gamma};
pub use gammainc::pgamma_raw;
