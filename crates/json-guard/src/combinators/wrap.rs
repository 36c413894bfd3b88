//! Wrappers that widen, narrow, or replace a guard's contract.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::guard::Guard;

// -------------------------------------------------------------------------
// Nullable / optional

#[derive(Debug, Clone)]
pub struct NullOr<G> {
    inner: G,
}

impl<G: Guard> Guard for NullOr<G> {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        match value {
            Some(Value::Null) => true,
            _ => self.inner.check(value, ctx),
        }
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Owned(format!("{} | null", self.inner.expected_type()))
    }
}

/// Accepts `null` outright, otherwise defers to `inner` unchanged.
pub fn is_null_or<G: Guard>(inner: G) -> NullOr<G> {
    NullOr { inner }
}

#[derive(Debug, Clone)]
pub struct UndefinedOr<G> {
    inner: G,
}

impl<G: Guard> Guard for UndefinedOr<G> {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        match value {
            None => true,
            Some(_) => self.inner.check(value, ctx),
        }
    }

    fn expected_type(&self) -> Cow<'static, str> {
        Cow::Owned(format!("{} | undefined", self.inner.expected_type()))
    }
}

/// Accepts an absent value outright, otherwise defers to `inner` unchanged.
pub fn is_undefined_or<G: Guard>(inner: G) -> UndefinedOr<G> {
    UndefinedOr { inner }
}

// -------------------------------------------------------------------------
// Tolerance

pub type ToleranceFn = Arc<dyn Fn(f64) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct Tolerance<G> {
    base: G,
    tolerance: ToleranceFn,
}

impl<G: fmt::Debug> fmt::Debug for Tolerance<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tolerance")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl<G: Guard> Guard for Tolerance<G> {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        if !self.base.check(value, ctx) {
            return false;
        }
        // Narrowing is silent.
        value
            .and_then(Value::as_f64)
            .is_some_and(|n| (self.tolerance)(n))
    }

    fn expected_type(&self) -> Cow<'static, str> {
        self.base.expected_type()
    }
}

/// Runs `base`, then narrows accepted numbers with `tolerance`.
///
/// A `base` failure keeps `base`'s own report. A value `base` accepts but
/// `tolerance` rejects (or that is not numeric) fails without a report.
pub fn guard_with_tolerance<G, F>(base: G, tolerance: F) -> Tolerance<G>
where
    G: Guard,
    F: Fn(f64) -> bool + Send + Sync + 'static,
{
    Tolerance {
        base,
        tolerance: Arc::new(tolerance),
    }
}

// -------------------------------------------------------------------------
// Branding

/// Domain routine behind a branded guard: `Err(reason)` rejects.
pub type BrandFn = Arc<dyn Fn(Option<&Value>) -> Result<(), String> + Send + Sync>;

#[derive(Clone)]
pub struct Branded {
    brand: Cow<'static, str>,
    routine: BrandFn,
}

impl fmt::Debug for Branded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branded")
            .field("brand", &self.brand)
            .finish_non_exhaustive()
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "routine panicked".to_string()
    }
}

impl Branded {
    pub fn brand(&self) -> &str {
        &self.brand
    }

    fn run(&self, value: Option<&Value>) -> Result<(), String> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.routine)(value))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let detail = panic_detail(payload.as_ref());
                tracing::warn!(brand = %self.brand, %detail, "branded routine panicked");
                Err(detail)
            }
        }
    }
}

impl Guard for Branded {
    fn check(&self, value: Option<&Value>, ctx: Option<&Context<'_>>) -> bool {
        match self.run(value) {
            Ok(()) => true,
            Err(detail) => {
                if let Some(ctx) = ctx {
                    ctx.report(&format!("branded type validation failed: {detail}"));
                }
                false
            }
        }
    }

    fn expected_type(&self) -> Cow<'static, str> {
        self.brand.clone()
    }
}

/// Adapts a domain routine to the guard protocol.
///
/// No type check is imposed beyond what `routine` performs. A routine that
/// panics is treated as a rejection.
pub fn is_branded<F>(brand: impl Into<Cow<'static, str>>, routine: F) -> Branded
where
    F: Fn(Option<&Value>) -> Result<(), String> + Send + Sync + 'static,
{
    Branded {
        brand: brand.into(),
        routine: Arc::new(routine),
    }
}
