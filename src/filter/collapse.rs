//! Direction matrix reduction when extraction drops axes.

use crate::util::{math, PolyImageError, PolyImageResult};
use std::fmt;

/// How direction cosines are reduced when the output has fewer axes.
///
/// `Unknown` is the initial state of a filter and cannot execute a
/// collapsing extraction; it cannot be requested explicitly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirectionCollapseStrategy {
    #[default]
    Unknown,
    /// Output direction is the identity.
    Identity,
    /// Output direction is the retained block of the input direction; a
    /// singular block is an error.
    Submatrix,
    /// Like `Submatrix`, falling back to the identity for a singular block.
    Guess,
}

impl fmt::Display for DirectionCollapseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DirectionCollapseStrategy::Unknown => "DirectionCollapseToUnknown",
            DirectionCollapseStrategy::Identity => "DirectionCollapseToIdentity",
            DirectionCollapseStrategy::Submatrix => "DirectionCollapseToSubmatrix",
            DirectionCollapseStrategy::Guess => "DirectionCollapseToGuess",
        };
        f.write_str(name)
    }
}

fn to_matrix<const K: usize>(flat: &[f64]) -> [[f64; K]; K] {
    std::array::from_fn(|r| std::array::from_fn(|c| flat[r * K + c]))
}

/// Reduces a `D x D` direction to the `K x K` block of the `retained` axes.
///
/// When nothing is dropped (`K == D`) the input direction is kept whatever
/// the strategy.
pub(crate) fn collapse_direction<const D: usize, const K: usize>(
    direction: &[[f64; D]; D],
    retained: &[usize],
    strategy: DirectionCollapseStrategy,
) -> PolyImageResult<[[f64; K]; K]> {
    debug_assert_eq!(retained.len(), K);
    let flat: Vec<f64> = direction.iter().flatten().copied().collect();
    let block = math::submatrix(&flat, D, retained);
    if K == D {
        return Ok(to_matrix::<K>(&block));
    }

    let singular = math::determinant(&block, K) == 0.0;
    match strategy {
        DirectionCollapseStrategy::Unknown => Err(PolyImageError::MissingStrategy {
            input_dimension: D,
            output_dimension: K,
        }),
        DirectionCollapseStrategy::Identity => Ok(to_matrix::<K>(&math::identity(K))),
        DirectionCollapseStrategy::Submatrix if singular => {
            Err(PolyImageError::NonPositiveDefiniteSubmatrix { submatrix: block })
        }
        DirectionCollapseStrategy::Guess if singular => Ok(to_matrix::<K>(&math::identity(K))),
        DirectionCollapseStrategy::Submatrix | DirectionCollapseStrategy::Guess => {
            Ok(to_matrix::<K>(&block))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::collapse_direction;
    use super::DirectionCollapseStrategy::{Guess, Submatrix, Unknown};
    use crate::util::PolyImageError;

    // Axis 2 maps onto physical x, so dropping it leaves a singular block.
    const SWAPPED: [[f64; 3]; 3] = [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];

    #[test]
    fn same_dimension_keeps_direction_for_any_strategy() {
        let out = collapse_direction::<3, 3>(&SWAPPED, &[0, 1, 2], Unknown).unwrap();
        assert_eq!(out, SWAPPED);
    }

    #[test]
    fn submatrix_rejects_singular_block_and_guess_falls_back() {
        let err = collapse_direction::<3, 2>(&SWAPPED, &[0, 1], Submatrix).unwrap_err();
        assert_eq!(
            err,
            PolyImageError::NonPositiveDefiniteSubmatrix {
                submatrix: vec![0.0, 0.0, 0.0, 1.0],
            }
        );

        let out = collapse_direction::<3, 2>(&SWAPPED, &[0, 1], Guess).unwrap();
        assert_eq!(out, [[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn submatrix_keeps_retained_block() {
        let out = collapse_direction::<3, 2>(&SWAPPED, &[0, 2], Submatrix).unwrap();
        assert_eq!(out, [[0.0, 1.0], [1.0, 0.0]]);
    }
}
