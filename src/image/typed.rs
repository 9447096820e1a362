//! Statically typed N-dimensional image storage.
//!
//! Pixels are stored contiguously with axis 0 varying fastest. Each pixel
//! occupies `components` consecutive buffer elements. Geometry metadata
//! (region start index, origin, spacing, direction) maps indices to
//! physical space.

use crate::pixel::{Component, PixelKind, PixelType};
use crate::util::{math, PolyImageError, PolyImageResult};
use std::marker::PhantomData;

/// Owned image of pixel type `P` with dimension `D`.
pub struct TypedImage<P: PixelType, const D: usize> {
    size: [usize; D],
    index: [i64; D],
    origin: [f64; D],
    spacing: [f64; D],
    direction: [[f64; D]; D],
    components: usize,
    buffer: Vec<P::Component>,
    _pixel: PhantomData<P>,
}

/// Resolves a requested component count for pixel type `P` in dimension `D`.
///
/// `0` selects the default: `D` components for vector pixels, one otherwise.
pub(crate) fn resolve_components<P: PixelType, const D: usize>(
    components: usize,
) -> PolyImageResult<usize> {
    match (P::KIND, components) {
        (PixelKind::Vector, 0) => Ok(D),
        (PixelKind::Vector, n) => Ok(n),
        (_, 0 | 1) => Ok(1),
        (_, n) => Err(PolyImageError::InvalidComponentCount {
            tag: P::TAG,
            components: n,
        }),
    }
}

fn identity<const D: usize>() -> [[f64; D]; D] {
    std::array::from_fn(|r| std::array::from_fn(|c| if r == c { 1.0 } else { 0.0 }))
}

/// Number of buffer elements for `size`, rejecting buffers whose byte size
/// exceeds `isize::MAX`.
fn buffer_len<C>(size: &[usize], components: usize) -> PolyImageResult<usize> {
    let len = size
        .iter()
        .try_fold(components, |acc, &s| acc.checked_mul(s))
        .ok_or(PolyImageError::InvalidGeometry {
            field: "size",
            reason: "number of pixel elements overflows usize",
        })?;
    let bytes = len.checked_mul(std::mem::size_of::<C>());
    if bytes.map_or(true, |bytes| bytes > isize::MAX as usize) {
        return Err(PolyImageError::InvalidGeometry {
            field: "size",
            reason: "pixel buffer exceeds the addressable size",
        });
    }
    Ok(len)
}

fn zeroed_buffer<C: Component>(len: usize) -> PolyImageResult<Vec<C>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| PolyImageError::InvalidGeometry {
            field: "size",
            reason: "pixel buffer allocation failed",
        })?;
    buffer.resize(len, C::default());
    Ok(buffer)
}

impl<P: PixelType, const D: usize> TypedImage<P, D> {
    /// Allocates a zero-filled image.
    ///
    /// `components` follows [`crate::Image::with_components`]: `0` selects the
    /// default for the pixel type.
    pub fn new(size: [usize; D], components: usize) -> PolyImageResult<Self> {
        let components = resolve_components::<P, D>(components)?;
        let len = buffer_len::<P::Component>(&size, components)?;
        Ok(Self::from_parts(size, components, zeroed_buffer(len)?))
    }

    /// Wraps an existing buffer laid out with axis 0 fastest.
    pub fn from_vec(
        size: [usize; D],
        components: usize,
        buffer: Vec<P::Component>,
    ) -> PolyImageResult<Self> {
        let components = resolve_components::<P, D>(components)?;
        let len = buffer_len::<P::Component>(&size, components)?;
        if buffer.len() != len {
            return Err(PolyImageError::ShapeMismatch {
                parameter: "buffer",
                expected: len,
                got: buffer.len(),
            });
        }
        Ok(Self::from_parts(size, components, buffer))
    }

    pub(crate) fn from_parts(
        size: [usize; D],
        components: usize,
        buffer: Vec<P::Component>,
    ) -> Self {
        Self {
            size,
            index: [0; D],
            origin: [0.0; D],
            spacing: [1.0; D],
            direction: identity::<D>(),
            components,
            buffer,
            _pixel: PhantomData,
        }
    }

    /// Number of pixels along each axis.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Start index of the image region.
    pub fn index(&self) -> [i64; D] {
        self.index
    }

    pub fn set_index(&mut self, index: [i64; D]) {
        self.index = index;
    }

    /// Physical coordinates of the pixel at the region start.
    pub fn origin(&self) -> [f64; D] {
        self.origin
    }

    pub fn set_origin(&mut self, origin: [f64; D]) -> PolyImageResult<()> {
        if origin.iter().any(|v| !v.is_finite()) {
            return Err(PolyImageError::InvalidGeometry {
                field: "origin",
                reason: "entries must be finite",
            });
        }
        self.origin = origin;
        Ok(())
    }

    /// Physical distance between adjacent pixels along each axis.
    pub fn spacing(&self) -> [f64; D] {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: [f64; D]) -> PolyImageResult<()> {
        if spacing.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(PolyImageError::InvalidGeometry {
                field: "spacing",
                reason: "entries must be positive and finite",
            });
        }
        self.spacing = spacing;
        Ok(())
    }

    /// Direction cosines, one row per physical axis.
    pub fn direction(&self) -> [[f64; D]; D] {
        self.direction
    }

    pub fn set_direction(&mut self, direction: [[f64; D]; D]) -> PolyImageResult<()> {
        let flat: Vec<f64> = direction.iter().flatten().copied().collect();
        if flat.iter().any(|v| !v.is_finite()) || math::determinant(&flat, D) == 0.0 {
            return Err(PolyImageError::InvalidGeometry {
                field: "direction",
                reason: "matrix must be finite and non-singular",
            });
        }
        self.direction = direction;
        Ok(())
    }

    /// Number of buffer elements per pixel.
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn number_of_pixels(&self) -> usize {
        self.size.iter().product()
    }

    /// Returns the backing buffer.
    pub fn as_slice(&self) -> &[P::Component] {
        &self.buffer
    }

    pub fn as_mut_slice(&mut self) -> &mut [P::Component] {
        &mut self.buffer
    }

    /// Buffer offset of the first component of pixel `idx`.
    fn offset(&self, idx: &[usize; D]) -> Option<usize> {
        let mut offset = 0usize;
        let mut stride = self.components;
        for axis in 0..D {
            if idx[axis] >= self.size[axis] {
                return None;
            }
            offset += idx[axis] * stride;
            stride *= self.size[axis];
        }
        Some(offset)
    }

    /// Returns the components of pixel `idx`, or `None` when out of bounds.
    pub fn pixel(&self, idx: [usize; D]) -> Option<&[P::Component]> {
        let start = self.offset(&idx)?;
        self.buffer.get(start..start + self.components)
    }

    pub fn pixel_mut(&mut self, idx: [usize; D]) -> Option<&mut [P::Component]> {
        let start = self.offset(&idx)?;
        let end = start + self.components;
        self.buffer.get_mut(start..end)
    }

    /// Copies geometry from another image of the same dimension.
    pub(crate) fn with_geometry(
        mut self,
        index: [i64; D],
        origin: [f64; D],
        spacing: [f64; D],
        direction: [[f64; D]; D],
    ) -> Self {
        self.index = index;
        self.origin = origin;
        self.spacing = spacing;
        self.direction = direction;
        self
    }
}

impl<P: PixelType, const D: usize> Clone for TypedImage<P, D> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            index: self.index,
            origin: self.origin,
            spacing: self.spacing,
            direction: self.direction,
            components: self.components,
            buffer: self.buffer.clone(),
            _pixel: PhantomData,
        }
    }
}
