use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

/// Minimal ring vocabulary for recurrence evaluation: additive identity,
/// addition, multiplication.
///
/// The evaluator delegates every arithmetic step to these three operations
/// and imposes no rounding, clamping, or overflow handling of its own.
/// Primitive integers keep their native overflow behavior and floats their
/// native rounding; substitute [`BigInt`]/[`BigUint`] or
/// [`ModInt`](crate::modular::ModInt) when that is not acceptable.
pub trait Ring: Clone {
    fn zero() -> Self;
    fn add(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
}

macro_rules! impl_ring_native {
    ($($t:ty)+) => {
        $(
            impl Ring for $t {
                fn zero() -> Self {
                    Self::default()
                }
                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }
                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }
            }
        )+
    };
}

impl_ring_native!(u8 u16 u32 u64 u128 usize);
impl_ring_native!(i8 i16 i32 i64 i128 isize);
impl_ring_native!(f32 f64);

macro_rules! impl_ring_big {
    ($($t:ty)+) => {
        $(
            impl Ring for $t {
                fn zero() -> Self {
                    <$t as Zero>::zero()
                }
                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }
                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }
            }
        )+
    };
}

impl_ring_big!(BigInt BigUint);
