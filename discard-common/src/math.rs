#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Operation {0:?} + {1:?} failed")]
    AddFailed(Option<i128>, Option<i128>),
    #[error("Operation {0:?} * {1:?} failed")]
    MulFailed(Option<i128>, Option<i128>),
    #[error("Conversion failed for value {0:?}")]
    ConversionFailed(Option<i128>),
}

/// Same as `checked_add` functions but returns an error
///
/// ```
/// # use discard_common::math::*;
/// assert_eq!(2_u32.safe_add(3), Ok(5));
/// assert!(u32::MAX.safe_add(1).is_err());
/// ```
pub trait SafeAdd: Sized {
    fn safe_add(self, rhs: Self) -> Result<Self, MathError>;
}

/// Same as `checked_mul` functions but returns an error
pub trait SafeMul: Sized {
    fn safe_mul(self, rhs: Self) -> Result<Self, MathError>;
}

macro_rules! impl_operator {
    ($op:ident, $f:ident, $t:ty) => {
        paste::paste! {
            impl [< Safe $op >] for $t {
                fn [< safe_ $f >](self, rhs: $t) -> Result<$t, MathError> {
                    let err = || MathError:: [< $op Failed >] (self.try_into().ok(), rhs.try_into().ok());
                    self.[< checked_ $f >](rhs)
                        .ok_or_else(err)
                }
            }
        }
    };
}

macro_rules! impl_binary_operators {
    ($t:ty) => {
        impl_operator!(Add, add, $t);
        impl_operator!(Mul, mul, $t);
    };
}

impl_binary_operators!(u16);
impl_binary_operators!(u32);
impl_binary_operators!(u64);
impl_binary_operators!(usize);

pub trait ToU32: Sized + TryInto<u32> + TryInto<i128> + Copy {
    fn u32(self) -> Result<u32, MathError> {
        self.try_into()
            .map_err(|_| MathError::ConversionFailed(self.try_into().ok()))
    }
}

impl ToU32 for u16 {}
impl ToU32 for u64 {}
impl ToU32 for usize {}

pub trait ToU64: Sized + TryInto<u64> + TryInto<i128> + Copy {
    fn u64(self) -> Result<u64, MathError> {
        self.try_into()
            .map_err(|_| MathError::ConversionFailed(self.try_into().ok()))
    }
}

impl ToU64 for u16 {}
impl ToU64 for u32 {}
impl ToU64 for usize {}

/// Conversion into `usize` that reports values not fitting on the platform
///
/// ```
/// # use discard_common::math::*;
/// assert_eq!(20_u32.usize(), Ok(20));
/// assert_eq!(7_u64.usize(), Ok(7));
/// ```
pub trait ToUsize: Sized + TryInto<usize> + TryInto<i128> + Copy {
    fn usize(self) -> Result<usize, MathError> {
        self.try_into()
            .map_err(|_| MathError::ConversionFailed(self.try_into().ok()))
    }
}

impl ToUsize for u16 {}
impl ToUsize for u32 {}
impl ToUsize for u64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_reports_operands() {
        assert_eq!(
            u16::MAX.safe_add(1),
            Err(MathError::AddFailed(Some(65535), Some(1)))
        );
        assert_eq!(
            u64::MAX.safe_mul(2),
            Err(MathError::MulFailed(Some(u64::MAX.into()), Some(2)))
        );
    }

    #[test]
    fn conversions() {
        assert_eq!(usize::MAX.u64().map(|_| ()), Ok(()));
        assert_eq!(
            u64::MAX.u32(),
            Err(MathError::ConversionFailed(Some(u64::MAX.into())))
        );
    }
}
