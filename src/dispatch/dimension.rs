//! Bridging runtime dimensions to const-generic dimensions.

use crate::util::{PolyImageError, PolyImageResult};

/// Largest image dimension any specialization is generated for.
pub const MAX_DIMENSION: usize = 5;

/// Smallest dimension an [`crate::Image`] can be allocated with.
pub const MIN_IMAGE_DIMENSION: usize = 2;

// `visit_dimensions` and `dispatch_dimension` spell out 1..=5.
const _: () = assert!(MAX_DIMENSION == 5);

/// Callback invoked once per dimension of a range.
pub trait DimensionVisitor {
    fn visit<const D: usize>(&mut self);
}

/// Calls `visitor.visit::<D>()` for every `D` in `min..=max`.
///
/// Dimensions above [`MAX_DIMENSION`] are never visited.
pub fn visit_dimensions<V: DimensionVisitor>(min: usize, max: usize, visitor: &mut V) {
    macro_rules! visit {
        ($($d:literal),+) => {
            $(
                if min <= $d && $d <= max {
                    visitor.visit::<$d>();
                }
            )+
        };
    }
    visit!(1, 2, 3, 4, 5);
}

/// Handler for runtime to const-generic dimension dispatch.
pub trait DimensionHandler {
    type Output;

    /// Runs the handler specialized for dimension `D`.
    fn call<const D: usize>(self) -> PolyImageResult<Self::Output>;
}

/// Selects the `D`-specialized body of `handler` for a runtime `dimension`.
///
/// Handles `1..=MAX_DIMENSION`.
pub fn dispatch_dimension<H: DimensionHandler>(
    dimension: usize,
    handler: H,
) -> PolyImageResult<H::Output> {
    match dimension {
        1 => handler.call::<1>(),
        2 => handler.call::<2>(),
        3 => handler.call::<3>(),
        4 => handler.call::<4>(),
        5 => handler.call::<5>(),
        _ => Err(PolyImageError::UnsupportedDimension {
            dimension,
            min: 1,
            max: MAX_DIMENSION,
        }),
    }
}

/// Compile-time check that `1 <= MIN <= MAX <= MAX_DIMENSION`.
pub(crate) struct DimensionBounds<const MIN: usize, const MAX: usize>;

impl<const MIN: usize, const MAX: usize> DimensionBounds<MIN, MAX> {
    pub(crate) const VALID: () = assert!(
        MIN >= 1 && MIN <= MAX && MAX <= MAX_DIMENSION,
        "dimension bounds must satisfy 1 <= MIN <= MAX <= MAX_DIMENSION"
    );
}

#[cfg(test)]
mod tests {
    use super::{dispatch_dimension, visit_dimensions, DimensionHandler, DimensionVisitor};
    use crate::util::{PolyImageError, PolyImageResult};

    struct Record(Vec<usize>);

    impl DimensionVisitor for Record {
        fn visit<const D: usize>(&mut self) {
            self.0.push(D);
        }
    }

    struct ArrayLen;

    impl DimensionHandler for ArrayLen {
        type Output = usize;

        fn call<const D: usize>(self) -> PolyImageResult<usize> {
            Ok([0u8; D].len())
        }
    }

    #[test]
    fn visit_dimensions_respects_inclusive_range() {
        let mut record = Record(Vec::new());
        visit_dimensions(2, 4, &mut record);
        assert_eq!(record.0, vec![2, 3, 4]);
    }

    #[test]
    fn dispatch_dimension_selects_matching_const() {
        for dim in 1..=5 {
            assert_eq!(dispatch_dimension(dim, ArrayLen).unwrap(), dim);
        }
        assert_eq!(
            dispatch_dimension(6, ArrayLen).unwrap_err(),
            PolyImageError::UnsupportedDimension {
                dimension: 6,
                min: 1,
                max: 5,
            }
        );
        assert!(dispatch_dimension(0, ArrayLen).is_err());
    }
}
