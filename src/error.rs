//! Warning side channel for the numerical kernels.
//!
//! The d/p/q/r functions never abort: a bad parameter yields `NaN` (or the
//! nearest boundary value) and the condition is reported through a
//! recoverable warning signal. What becomes of a warning — an exception in a
//! host interpreter, a log line, or silence — is entirely the caller's
//! decision, so the crate only offers a hook.

use std::cell::RefCell;

use thiserror::Error;

/// Conditions the numerical kernels can flag while still returning a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathWarning {
    /// A parameter was outside its mathematical domain; the result is `NaN`.
    #[error("argument out of domain in '{0}'")]
    Domain(&'static str),

    /// The algorithm converged but full precision was likely not achieved.
    #[error("full precision may not have been achieved in '{0}'")]
    Precision(&'static str),

    /// An iterative algorithm hit its iteration cap; the result is the best
    /// available estimate.
    #[error("convergence failed in '{0}' after {1} iterations")]
    NonConvergence(&'static str, usize),
}

thread_local! {
    static HOOK: RefCell<Option<Box<dyn FnMut(&MathWarning)>>> = RefCell::new(None);
}

/// Install (or clear, with `None`) the warning hook for the current thread.
///
/// The default is no hook: warnings are dropped. A host that wants to
/// surface them installs a closure here before calling into the library.
pub fn set_warning_hook(hook: Option<Box<dyn FnMut(&MathWarning)>>) {
    HOOK.with(|h| *h.borrow_mut() = hook);
}

/// Invoke the current thread's hook, if any.
///
/// The hook is taken out of its slot for the duration of the call so a hook
/// that itself evaluates distribution functions cannot re-enter it.
pub(crate) fn raise(warning: MathWarning) {
    let mut taken = HOOK.with(|h| h.borrow_mut().take());
    if let Some(f) = taken.as_mut() {
        f(&warning);
    }
    HOOK.with(|h| {
        let mut slot = h.borrow_mut();
        if slot.is_none() {
            *slot = taken;
        }
    });
}

/// Domain error: raise the warning and produce the `NaN` result.
pub(crate) fn domain_nan(name: &'static str) -> f64 {
    raise(MathWarning::Domain(name));
    f64::NAN
}

pub(crate) fn precision_warning(name: &'static str) {
    raise(MathWarning::Precision(name));
}

pub(crate) fn nonconvergence_warning(name: &'static str, iterations: usize) {
    raise(MathWarning::NonConvergence(name, iterations));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn hook_sees_domain_warnings() {
        let count = Rc::new(Cell::new(0usize));
        let c = Rc::clone(&count);
        set_warning_hook(Some(Box::new(move |w| {
            assert!(matches!(w, MathWarning::Domain("test")));
            c.set(c.get() + 1);
        })));
        assert!(domain_nan("test").is_nan());
        assert!(domain_nan("test").is_nan());
        set_warning_hook(None);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn no_hook_is_silent() {
        set_warning_hook(None);
        assert!(domain_nan("quiet").is_nan());
    }
}
