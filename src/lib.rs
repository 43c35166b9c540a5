//! Incremental evaluation of linear recurrences over generic rings.
//!
//! An order-k recurrence f(n) = c_1(n)·f(n-1) + … + c_k(n)·f(n-k) + g(n) is
//! described by k coefficient functions, k initial terms, and an optional
//! forcing term g. The [`Evaluator`] extends the sequence lazily from the
//! longest known prefix, either memoizing every term ([`Memory::Full`]) or
//! keeping a constant-space window of the last k terms ([`Memory::Window`]).
//!
//! Arithmetic is pluggable through the [`Ring`] trait (zero, add, multiply),
//! implemented out of the box for primitive integers and floats,
//! [`num_bigint`] big integers, and the modular [`ModInt`]. Closed-form and
//! characteristic-polynomial techniques are deliberately out of scope; the
//! evaluator only ever iterates the recurrence itself, which keeps it exact
//! for whatever ring it is given.
//!
//! ```
//! use linrec::Recurrence;
//!
//! // f(n) = f(n-1) + f(n-2), f(0) = f(1) = 1
//! let fib = Recurrence::with_constant_coefficients(vec![1u64, 1], vec![1, 1]).unwrap();
//! let mut eval = fib.evaluator();
//! assert_eq!(eval.evaluate(10), Ok(89));
//! ```

pub mod algebra;
pub mod modular;
pub mod recurrence;

pub use algebra::Ring;
pub use modular::ModInt;
pub use recurrence::{
    ConstructionError, Evaluator, EvictedTerm, IndexFn, Memory, Recurrence, Terms,
};
