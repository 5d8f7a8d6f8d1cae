//! Density, distribution, quantile and random-variate functions for the
//! classical statistical distributions.
//!
//! Every family exports up to four functions sharing one set of
//! conventions:
//!
//! - `d*(x, .., give_log)` — density or point mass, optionally its log;
//! - `p*(q, .., lower_tail, log_p)` — either tail of the CDF, on the plain
//!   or log scale;
//! - `q*(p, .., lower_tail, log_p)` — the matching quantile, accepting the
//!   same four probability dialects;
//! - `r*(.., &mut dyn RandomSource)` — a variate drawn from any injected
//!   uniform source (see [`rng::RngSource`] for the [`rand`] adapter).
//!
//! Log-scale tails stay meaningful thousands of logs below the smallest
//! positive double, which is the point of carrying `log_p` everywhere
//! rather than exponentiating at the end.
//!
//! Invalid parameters never panic: they yield NaN and report through the
//! warning hook installed with [`error::set_warning_hook`].
//!
//! ```
//! use dpqr::{dnorm, pnorm, qnorm};
//!
//! let z = qnorm(0.975, 0.0, 1.0, true, false);
//! assert!((pnorm(z, 0.0, 1.0, true, false) - 0.975).abs() < 1e-12);
//! assert!((dnorm(0.0, 0.0, 1.0, false) - 0.3989422804014327).abs() < 1e-15);
//! ```

pub mod distr;
pub mod dpq;
pub mod error;
pub mod rmath;
pub mod rng;
pub mod search;
pub mod special;

pub use error::{set_warning_hook, MathWarning};
pub use rng::{RandomSource, RngSource};

pub use distr::beta::{dbeta, pbeta, qbeta, rbeta};
pub use distr::binom::{dbinom, pbinom, qbinom, rbinom};
pub use distr::chisq::{dchisq, pchisq, qchisq, rchisq};
pub use distr::exp::{dexp, pexp, qexp, rexp};
pub use distr::f::{df, pf, qf, rf};
pub use distr::gamma::{dgamma, pgamma, qgamma, rgamma};
pub use distr::hyper::{dhyper, phyper, qhyper, rhyper};
pub use distr::lnorm::{dlnorm, plnorm, qlnorm, rlnorm};
pub use distr::logis::{dlogis, plogis, qlogis, rlogis};
pub use distr::nbeta::{dnbeta, pnbeta, pnbeta2, qnbeta};
pub use distr::nbinom::{dnbinom, pnbinom, qnbinom, rnbinom};
pub use distr::nchisq::{dnchisq, pnchisq, qnchisq, rnchisq};
pub use distr::nf::{dnf, pnf, qnf};
pub use distr::norm::{dnorm, pnorm, qnorm, rnorm};
pub use distr::pois::{dpois, ppois, qpois, rpois};
pub use distr::signrank::{dsignrank, psignrank, qsignrank, rsignrank};
pub use distr::t::{dt, pt, qt, rt};
pub use distr::unif::{dunif, punif, qunif, runif};
pub use distr::weibull::{dweibull, pweibull, qweibull, rweibull};
pub use distr::wilcox::{dwilcox, pwilcox, qwilcox, rwilcox};
