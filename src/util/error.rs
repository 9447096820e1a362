//! Error types for polyimage.

use crate::filter::DirectionCollapseStrategy;
use crate::pixel::ValueTypeTag;
use thiserror::Error;

/// Result alias for polyimage operations.
pub type PolyImageResult<T> = std::result::Result<T, PolyImageError>;

/// Errors that can occur when allocating images or dispatching operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolyImageError {
    /// The value type is the `Unknown` sentinel or not part of any catalog.
    #[error("unsupported pixel type: {tag}")]
    UnsupportedValueType { tag: ValueTypeTag },
    /// The dimension is outside the range accepted by the operation.
    #[error("unsupported dimension {dimension}, supported range is [{min}, {max}]")]
    UnsupportedDimension {
        dimension: usize,
        min: usize,
        max: usize,
    },
    /// Tag and dimension are individually valid but nothing is registered for them.
    #[error(
        "no implementation registered for pixel type {tag} with dimension {dimension} \
         (maximum supported dimension is {max_dimension})"
    )]
    UnsupportedCombination {
        tag: ValueTypeTag,
        dimension: usize,
        max_dimension: usize,
    },
    /// A key was registered twice in the same registry.
    #[error("duplicate registration for pixel type {tag} with dimension {dimension}")]
    DuplicateRegistration { tag: ValueTypeTag, dimension: usize },
    /// Collapsing dimensions requires an explicit direction strategy.
    #[error(
        "collapsing from dimension {input_dimension} to {output_dimension} requires an \
         explicit direction collapse strategy"
    )]
    MissingStrategy {
        input_dimension: usize,
        output_dimension: usize,
    },
    /// `Unknown` was requested explicitly as a collapse strategy.
    #[error("{strategy} cannot be selected explicitly")]
    InvalidStrategy { strategy: DirectionCollapseStrategy },
    /// The extracted direction block is singular.
    #[error("direction submatrix {submatrix:?} extracted for collapsed axes is not positive definite")]
    NonPositiveDefiniteSubmatrix { submatrix: Vec<f64> },
    /// A parameter sequence does not match the image dimension.
    #[error("{parameter} has {got} entries, expected {expected}")]
    ShapeMismatch {
        parameter: &'static str,
        expected: usize,
        got: usize,
    },
    /// The component count does not fit the pixel type.
    #[error("{components} components per pixel is invalid for pixel type {tag}")]
    InvalidComponentCount { tag: ValueTypeTag, components: usize },
    /// The requested region is not contained in the image region.
    #[error("requested region index {index:?} size {size:?} is outside the image region index {image_index:?} size {image_size:?}")]
    RegionOutOfBounds {
        index: Vec<i64>,
        size: Vec<usize>,
        image_index: Vec<i64>,
        image_size: Vec<usize>,
    },
    /// Geometry metadata is malformed.
    #[error("invalid {field}: {reason}")]
    InvalidGeometry {
        field: &'static str,
        reason: &'static str,
    },
    /// A pixel index is outside the image.
    #[error("pixel index {index:?} is outside image of size {size:?}")]
    IndexOutOfBounds { index: Vec<usize>, size: Vec<usize> },
    /// The owned representation does not have the type/dimension it reports.
    #[error(
        "image representation mismatch: expected {expected_tag} {expected_dimension}-D, \
         found {found_tag} {found_dimension}-D"
    )]
    RepresentationMismatch {
        expected_tag: ValueTypeTag,
        expected_dimension: usize,
        found_tag: ValueTypeTag,
        found_dimension: usize,
    },
}
