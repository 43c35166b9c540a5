use crate::algebra::Ring;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Integers modulo `M`, kept reduced after every operation.
///
/// Products are widened through `u128`, so any modulus up to `u64::MAX` is
/// safe from intermediate overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModInt<const M: u64>(u64);

impl<const M: u64> ModInt<M> {
    pub fn new(value: u64) -> Self {
        Self(value % M)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl<const M: u64> AddAssign for ModInt<M> {
    fn add_assign(&mut self, rhs: Self) {
        // Reduced operands can still overflow u64 when M > 2^63, so avoid
        // forming the raw sum.
        if rhs.0 != 0 && self.0 >= M - rhs.0 {
            self.0 -= M - rhs.0;
        } else {
            self.0 += rhs.0;
        }
    }
}

impl<const M: u64> SubAssign for ModInt<M> {
    fn sub_assign(&mut self, rhs: Self) {
        if self.0 < rhs.0 {
            self.0 += M;
        }
        self.0 -= rhs.0;
    }
}

impl<const M: u64> MulAssign for ModInt<M> {
    fn mul_assign(&mut self, rhs: Self) {
        self.0 = (u128::from(self.0) * u128::from(rhs.0) % u128::from(M)) as u64;
    }
}

macro_rules! impl_op_by_op_assign {
    ($($Op:ident $op:ident $op_assign:ident),+) => {
        $(
            impl<const M: u64> $Op for ModInt<M> {
                type Output = Self;
                fn $op(mut self, rhs: Self) -> Self {
                    self.$op_assign(rhs);
                    self
                }
            }
        )+
    };
}
impl_op_by_op_assign!(Add add add_assign, Sub sub sub_assign, Mul mul mul_assign);

impl<const M: u64> Neg for ModInt<M> {
    type Output = Self;
    fn neg(self) -> Self {
        if self.0 == 0 {
            self
        } else {
            Self(M - self.0)
        }
    }
}

impl<const M: u64> From<u64> for ModInt<M> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const M: u64> Ring for ModInt<M> {
    fn zero() -> Self {
        Self(0)
    }
    fn add(self, rhs: Self) -> Self {
        self + rhs
    }
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
}

impl<const M: u64> std::fmt::Display for ModInt<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
