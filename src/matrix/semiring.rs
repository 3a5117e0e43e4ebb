//! Semirings and semiring-generalized dense multiplication.
//!
//! A semiring `(S, ⊕, ⊗, 0, 1)` parameterizes matrix multiplication:
//! `(A ⊗ B)[i,j] = ⊕_k (A[i,k] ⊗ B[k,j])`, folded from the semiring's zero.
//! Swapping the operation pair turns the same adjacency matrix into a
//! reachability oracle (boolean), a shortest-path solver (tropical), a walk
//! counter (counting), or an independent-event probability propagator.
//!
//! The algebra is carried over `f64`: boolean values are encoded 0.0/1.0 and
//! the tropical additive identity is a true `f64::INFINITY`.
//!
//! The semiring axioms (⊕ and ⊗ associative, ⊗ distributing over ⊕, zero
//! as ⊕-identity and ⊗-annihilator, one as ⊗-identity) are assumed, never
//! checked at runtime. A custom semiring that violates them produces
//! meaningless results, not errors.

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;

/// Binary operation over the carrier type.
pub type SemiringOp = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Tag used to dispatch multiplication to a specialized kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemiringKind {
    /// `(∨, ∧, false, true)` over 0/1: reachability.
    Boolean,
    /// `(min, +, +∞, 0)`: shortest paths.
    Tropical,
    /// `(+, ·, 0, 1)`: walk counting.
    Counting,
    /// `(a+b−a·b, ·, 0, 1)`: independent-event probability.
    Probability,
    /// Caller-supplied operations; always runs the generic fold.
    Custom,
}

/// An algebraic structure `(name, zero, one, ⊕, ⊗)`.
#[derive(Clone)]
pub struct Semiring {
    kind: SemiringKind,
    name: String,
    zero: f64,
    one: f64,
    add: SemiringOp,
    mul: SemiringOp,
}

impl fmt::Debug for Semiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semiring")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("zero", &self.zero)
            .field("one", &self.one)
            .finish()
    }
}

impl Semiring {
    /// Boolean semiring: ⊕ = ∨, ⊗ = ∧ over the 0.0/1.0 encoding.
    pub fn boolean() -> Self {
        Self {
            kind: SemiringKind::Boolean,
            name: "boolean".into(),
            zero: 0.0,
            one: 1.0,
            add: Arc::new(|a, b| if a != 0.0 || b != 0.0 { 1.0 } else { 0.0 }),
            mul: Arc::new(|a, b| if a != 0.0 && b != 0.0 { 1.0 } else { 0.0 }),
        }
    }

    /// Tropical (min-plus) semiring with a real `+∞` additive identity.
    pub fn tropical() -> Self {
        Self {
            kind: SemiringKind::Tropical,
            name: "tropical".into(),
            zero: f64::INFINITY,
            one: 0.0,
            add: Arc::new(f64::min),
            mul: Arc::new(|a, b| a + b),
        }
    }

    /// Counting semiring: ordinary `(+, ·)`.
    pub fn counting() -> Self {
        Self {
            kind: SemiringKind::Counting,
            name: "counting".into(),
            zero: 0.0,
            one: 1.0,
            add: Arc::new(|a, b| a + b),
            mul: Arc::new(|a, b| a * b),
        }
    }

    /// Probability semiring: ⊕ = `a + b − a·b`, ⊗ = `·`.
    pub fn probability() -> Self {
        Self {
            kind: SemiringKind::Probability,
            name: "probability".into(),
            zero: 0.0,
            one: 1.0,
            add: Arc::new(|a, b| a + b - a * b),
            mul: Arc::new(|a, b| a * b),
        }
    }

    /// Caller-defined semiring; runs the generic fold kernel.
    pub fn custom(
        name: impl Into<String>,
        zero: f64,
        one: f64,
        add: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
        mul: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: SemiringKind::Custom,
            name: name.into(),
            zero,
            one,
            add: Arc::new(add),
            mul: Arc::new(mul),
        }
    }

    /// Dispatch tag.
    pub fn kind(&self) -> SemiringKind {
        self.kind
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Additive identity (fold seed).
    pub fn zero(&self) -> f64 {
        self.zero
    }

    /// Multiplicative identity.
    pub fn one(&self) -> f64 {
        self.one
    }

    /// Applies ⊕.
    pub fn add(&self, a: f64, b: f64) -> f64 {
        (self.add)(a, b)
    }

    /// Applies ⊗.
    pub fn mul(&self, a: f64, b: f64) -> f64 {
        (self.mul)(a, b)
    }
}

/// Dense semiring matrix product, dispatching to a specialized kernel for
/// the named semirings and folding with the closures otherwise.
///
/// Shape compatibility is the caller's responsibility; this kernel assumes
/// `a.ncols() == b.nrows()`.
pub(crate) fn multiply_dense(a: &Array2<f64>, b: &Array2<f64>, semiring: &Semiring) -> Array2<f64> {
    match semiring.kind {
        SemiringKind::Boolean => multiply_boolean(a, b),
        SemiringKind::Tropical => multiply_tropical(a, b),
        // Counting is the classical product.
        SemiringKind::Counting => a.dot(b),
        SemiringKind::Probability | SemiringKind::Custom => multiply_generic(a, b, semiring),
    }
}

fn multiply_boolean(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let (m, inner) = a.dim();
    let p = b.ncols();
    let mut out = Array2::zeros((m, p));
    for i in 0..m {
        for j in 0..p {
            for k in 0..inner {
                if a[[i, k]] != 0.0 && b[[k, j]] != 0.0 {
                    out[[i, j]] = 1.0;
                    break;
                }
            }
        }
    }
    out
}

fn multiply_tropical(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let (m, inner) = a.dim();
    let p = b.ncols();
    let mut out = Array2::from_elem((m, p), f64::INFINITY);
    for i in 0..m {
        for j in 0..p {
            let mut best = f64::INFINITY;
            for k in 0..inner {
                // +∞ is absorbing for the plus leg and neutral for min.
                best = best.min(a[[i, k]] + b[[k, j]]);
            }
            out[[i, j]] = best;
        }
    }
    out
}

fn multiply_generic(a: &Array2<f64>, b: &Array2<f64>, semiring: &Semiring) -> Array2<f64> {
    let (m, inner) = a.dim();
    let p = b.ncols();
    let mut out = Array2::from_elem((m, p), semiring.zero());
    for i in 0..m {
        for j in 0..p {
            let mut acc = semiring.zero();
            for k in 0..inner {
                acc = semiring.add(acc, semiring.mul(a[[i, k]], b[[k, j]]));
            }
            out[[i, j]] = acc;
        }
    }
    out
}
