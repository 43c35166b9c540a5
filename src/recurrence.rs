use crate::algebra::Ring;
use thiserror::Error;

/// Index-dependent coefficient or forcing term: maps a sequence index to a
/// ring element.
pub type IndexFn<T> = Box<dyn Fn(u64) -> T>;

/// Storage policy for computed terms, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Memory {
    /// Retain every computed term. Any already-computed index can be
    /// re-queried in O(1), at the cost of O(n) space.
    #[default]
    Full,
    /// Retain only the last k terms in a circular window of size k.
    /// O(k) space; indices that have left the window cannot be re-queried
    /// and yield [`EvictedTerm`].
    Window,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error(
        "coefficient and initial term counts differ: \
         {coefficients} coefficient(s), {initial_terms} initial term(s)"
    )]
    LengthMismatch {
        coefficients: usize,
        initial_terms: usize,
    },
    #[error("a recurrence must have order at least 1")]
    ZeroOrder,
}

/// Under [`Memory::Window`], the requested index has already been evicted
/// from the window of retained terms.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("term {index} has been evicted; oldest retained index is {oldest_retained}")]
pub struct EvictedTerm {
    pub index: u64,
    pub oldest_retained: u64,
}

/// An order-k linear recurrence
/// f(n) = c_1(n)·f(n-1) + … + c_k(n)·f(n-k) + g(n),
/// immutable once constructed.
///
/// Coefficients and the forcing term g are arbitrary index functions, so
/// both constant-coefficient recurrences (Fibonacci) and index-dependent
/// ones (factorial-like products, holonomic sequences) fit. All arithmetic
/// happens through the [`Ring`] vocabulary of `T`.
pub struct Recurrence<T> {
    coefficients: Vec<IndexFn<T>>,
    initial_terms: Vec<T>,
    forcing: IndexFn<T>,
    memory: Memory,
}

impl<T> core::fmt::Debug for Recurrence<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Recurrence")
            .field("order", &self.coefficients.len())
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

impl<T> Recurrence<T> {
    /// Number of preceding terms each step depends on.
    pub fn order(&self) -> usize {
        self.coefficients.len()
    }
}

impl<T: Ring + 'static> Recurrence<T> {
    /// Builds a homogeneous recurrence from k coefficient functions and k
    /// initial terms f(0)..f(k-1). `coefficients[j]` weights the term j+1
    /// steps back.
    ///
    /// The initial terms are moved in; the caller keeps no alias to them.
    /// Coefficient functions must be total over all u64 indices.
    pub fn new(
        coefficients: Vec<IndexFn<T>>,
        initial_terms: Vec<T>,
    ) -> Result<Self, ConstructionError> {
        if coefficients.len() != initial_terms.len() {
            return Err(ConstructionError::LengthMismatch {
                coefficients: coefficients.len(),
                initial_terms: initial_terms.len(),
            });
        }
        if coefficients.is_empty() {
            return Err(ConstructionError::ZeroOrder);
        }
        Ok(Self {
            coefficients,
            initial_terms,
            forcing: Box::new(|_| T::zero()),
            memory: Memory::Full,
        })
    }

    /// Convenience constructor for the constant-coefficient case.
    pub fn with_constant_coefficients(
        coefficients: Vec<T>,
        initial_terms: Vec<T>,
    ) -> Result<Self, ConstructionError> {
        let coefficients = coefficients
            .into_iter()
            .map(|c| -> IndexFn<T> { Box::new(move |_| c.clone()) })
            .collect();
        Self::new(coefficients, initial_terms)
    }

    /// Sets the non-homogeneous term g(n). Defaults to the ring zero.
    pub fn with_forcing(mut self, forcing: impl Fn(u64) -> T + 'static) -> Self {
        self.forcing = Box::new(forcing);
        self
    }

    /// Sets the storage policy. Defaults to [`Memory::Full`].
    pub fn with_memory(mut self, memory: Memory) -> Self {
        self.memory = memory;
        self
    }

    /// Seeds an evaluator with this recurrence's initial terms.
    pub fn evaluator(self) -> Evaluator<T> {
        let history = self.initial_terms.clone();
        let next_index = history.len() as u64;
        Evaluator {
            spec: self,
            history,
            next_index,
        }
    }
}

/// Stateful evaluator for one [`Recurrence`].
///
/// Terms are computed lazily: a call to [`evaluate`](Evaluator::evaluate)
/// extends the known prefix of the sequence up to the requested index and
/// memoizes it, so terms are never recomputed. All state is behind
/// `&mut self`; share an evaluator across threads only with external
/// synchronization.
pub struct Evaluator<T> {
    spec: Recurrence<T>,
    history: Vec<T>,
    next_index: u64,
}

impl<T: Ring> Evaluator<T> {
    /// The largest index computed so far. Starts at k-1 (the last initial
    /// term) and never decreases.
    pub fn high_water_mark(&self) -> u64 {
        self.next_index - 1
    }

    /// Returns f(n), computing any missing terms up to n first.
    ///
    /// Each missing term costs O(k) ring operations plus the caller's
    /// coefficient/forcing evaluations; already-computed terms are returned
    /// from storage. Under [`Memory::Window`], only the last k terms remain
    /// retrievable and older indices yield [`EvictedTerm`]; under
    /// [`Memory::Full`] this never fails.
    pub fn evaluate(&mut self, n: u64) -> Result<T, EvictedTerm> {
        while self.next_index <= n {
            let term = self.step();
            self.push(term);
        }
        self.recall(n)
    }

    /// Iterates the sequence f(0), f(1), … by repeated evaluation.
    ///
    /// Infinite for a fresh evaluator in either memory mode. On an evaluator
    /// already advanced under [`Memory::Window`], iteration stops at the
    /// first evicted term.
    pub fn terms(&mut self) -> Terms<'_, T> {
        Terms {
            eval: self,
            cursor: 0,
        }
    }

    // Computes the term at next_index. Every operand lies at most k steps
    // back, so it is present in either storage mode.
    fn step(&self) -> T {
        let i = self.next_index;
        let mut acc = T::zero();
        for (j, coeff) in self.spec.coefficients.iter().enumerate() {
            let operand = self.stored(i - 1 - j as u64);
            acc = acc.add(coeff(i).mul(operand));
        }
        acc.add((self.spec.forcing)(i))
    }

    fn push(&mut self, term: T) {
        match self.spec.memory {
            Memory::Full => self.history.push(term),
            Memory::Window => {
                let k = self.spec.order() as u64;
                self.history[(self.next_index % k) as usize] = term;
            }
        }
        self.next_index += 1;
    }

    fn stored(&self, index: u64) -> T {
        let slot = match self.spec.memory {
            Memory::Full => index,
            Memory::Window => index % self.spec.order() as u64,
        };
        self.history[slot as usize].clone()
    }

    fn recall(&self, n: u64) -> Result<T, EvictedTerm> {
        if self.spec.memory == Memory::Window {
            let oldest_retained = self.next_index - self.spec.order() as u64;
            if n < oldest_retained {
                return Err(EvictedTerm {
                    index: n,
                    oldest_retained,
                });
            }
        }
        Ok(self.stored(n))
    }
}

/// Iterator over sequence terms, created by [`Evaluator::terms`].
pub struct Terms<'a, T> {
    eval: &'a mut Evaluator<T>,
    cursor: u64,
}

impl<T: Ring> Iterator for Terms<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let term = self.eval.evaluate(self.cursor).ok()?;
        self.cursor += 1;
        Some(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fib() -> Recurrence<i64> {
        Recurrence::with_constant_coefficients(vec![1, 1], vec![1, 1]).unwrap()
    }

    #[test]
    fn powers_of_three() {
        let mut eval = Recurrence::with_constant_coefficients(vec![3i64], vec![1])
            .unwrap()
            .evaluator();
        assert_eq!(eval.evaluate(5), Ok(243));
        assert_eq!(eval.evaluate(0), Ok(1));
    }

    #[test]
    fn fibonacci() {
        let mut eval = fib().evaluator();
        assert_eq!(eval.evaluate(10), Ok(89));
    }

    #[test]
    fn forced_second_order() {
        // f(n) = 2f(n-1) - f(n-2) + 2^n + 2, closed form n(n+7) + 2^(n+2) + 3.
        let mut eval = Recurrence::with_constant_coefficients(vec![2i64, -1], vec![7, 19])
            .unwrap()
            .with_forcing(|n| (1i64 << n) + 2)
            .evaluator();
        assert_eq!(eval.evaluate(4), Ok(111));
        for n in 0..=20 {
            assert_eq!(
                eval.evaluate(n),
                Ok(n as i64 * (n as i64 + 7) + (1i64 << (n + 2)) + 3)
            );
        }
    }

    #[test]
    fn index_dependent_coefficients() {
        // f(n) = (2n+1)f(n-1) + n^2 f(n-2) + 2n - 1.
        let coefficients: Vec<IndexFn<i64>> = vec![
            Box::new(|n| 2 * n as i64 + 1),
            Box::new(|n| (n * n) as i64),
        ];
        let mut eval = Recurrence::new(coefficients, vec![1, 1])
            .unwrap()
            .with_forcing(|n| 2 * n as i64 - 1)
            .evaluator();
        assert_eq!(eval.evaluate(9), Ok(1924648806));
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = Recurrence::with_constant_coefficients(vec![1i64, 1], vec![1]).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::LengthMismatch {
                coefficients: 2,
                initial_terms: 1,
            }
        );
        let msg = err.to_string();
        assert!(msg.contains('2') && msg.contains('1'), "{msg}");
    }

    #[test]
    fn zero_order_rejected() {
        let err = Recurrence::with_constant_coefficients(Vec::<i64>::new(), vec![]).unwrap_err();
        assert_eq!(err, ConstructionError::ZeroOrder);
    }

    #[test]
    fn prefix_returns_initial_terms_untouched() {
        // Coefficients that would blow up if the prefix were recomputed.
        let mut eval = Recurrence::with_constant_coefficients(vec![i64::MAX, i64::MAX], vec![3, 8])
            .unwrap()
            .evaluator();
        assert_eq!(eval.evaluate(0), Ok(3));
        assert_eq!(eval.evaluate(1), Ok(8));
        assert_eq!(eval.high_water_mark(), 1);
    }

    #[test]
    fn memoization_no_recomputation() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0u32));
        let counted = calls.clone();
        let coefficients: Vec<IndexFn<i64>> = vec![Box::new(move |_| {
            counted.set(counted.get() + 1);
            2
        })];
        let mut eval = Recurrence::new(coefficients, vec![1]).unwrap().evaluator();

        assert_eq!(eval.evaluate(8), Ok(256));
        assert_eq!(calls.get(), 8);
        assert_eq!(eval.evaluate(8), Ok(256));
        assert_eq!(eval.evaluate(3), Ok(8));
        assert_eq!(calls.get(), 8, "no term may be recomputed");
        assert_eq!(eval.high_water_mark(), 8);
    }

    #[test]
    fn window_matches_full_history() {
        let mut full = fib().evaluator();
        let mut window = fib().with_memory(Memory::Window).evaluator();
        for n in 0..40 {
            assert_eq!(full.evaluate(n), window.evaluate(n));
        }
    }

    #[test]
    fn window_eviction_is_an_error() {
        let mut eval = fib().with_memory(Memory::Window).evaluator();
        eval.evaluate(10).unwrap();
        assert_eq!(
            eval.evaluate(3),
            Err(EvictedTerm {
                index: 3,
                oldest_retained: 9,
            })
        );
        // The window edge itself is still retrievable.
        assert_eq!(eval.evaluate(9), Ok(55));
        assert_eq!(eval.evaluate(10), Ok(89));
    }

    #[test]
    fn fresh_window_prefix_is_retained() {
        let mut eval = fib().with_memory(Memory::Window).evaluator();
        assert_eq!(eval.evaluate(0), Ok(1));
        assert_eq!(eval.evaluate(1), Ok(1));
    }

    #[test]
    fn terms_iterator_agrees_with_evaluate() {
        let collected: Vec<i64> = fib().evaluator().terms().take(11).collect();
        assert_eq!(collected, [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89]);

        let windowed: Vec<i64> = fib()
            .with_memory(Memory::Window)
            .evaluator()
            .terms()
            .take(11)
            .collect();
        assert_eq!(collected, windowed);
    }

    #[test]
    fn terms_iterator_stops_at_evicted_prefix() {
        let mut eval = fib().with_memory(Memory::Window).evaluator();
        eval.evaluate(10).unwrap();
        assert_eq!(eval.terms().next(), None);
    }

    #[test]
    fn float_ring_uses_native_arithmetic() {
        let mut eval = Recurrence::with_constant_coefficients(vec![0.5f64], vec![1.0])
            .unwrap()
            .evaluator();
        assert_eq!(eval.evaluate(20), Ok(0.5f64.powi(20)));
    }
}
