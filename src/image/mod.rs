//! Runtime-typed image container.
//!
//! [`Image`] owns exactly one [`TypedImage<P, D>`] behind a trait object and
//! reports its pixel type and dimension at runtime. Allocation from a
//! runtime tag goes through a [`DispatchRegistry`] of per-`(P, D)`
//! constructors. Reallocating replaces the owned representation wholesale.

mod typed;

pub use typed::TypedImage;

use crate::dispatch::{Addressor, DispatchRegistry, MAX_DIMENSION, MIN_IMAGE_DIMENSION};
use crate::pixel::{AllPixels, Component, PixelType, ValueTypeTag};
use crate::util::{PolyImageError, PolyImageResult};
use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

/// Type-erased interface over [`TypedImage`] used by [`Image`].
pub(crate) trait ImageBase: Any + Send + Sync {
    fn tag(&self) -> ValueTypeTag;
    fn dimension(&self) -> usize;
    fn size(&self) -> Vec<usize>;
    fn index(&self) -> Vec<i64>;
    fn set_index(&mut self, index: &[i64]) -> PolyImageResult<()>;
    fn origin(&self) -> Vec<f64>;
    fn set_origin(&mut self, origin: &[f64]) -> PolyImageResult<()>;
    fn spacing(&self) -> Vec<f64>;
    fn set_spacing(&mut self, spacing: &[f64]) -> PolyImageResult<()>;
    /// Row-major `dimension x dimension` matrix.
    fn direction(&self) -> Vec<f64>;
    fn set_direction(&mut self, direction: &[f64]) -> PolyImageResult<()>;
    fn components(&self) -> usize;
    fn number_of_pixels(&self) -> usize;
    fn pixel_as_f64(&self, idx: &[usize]) -> PolyImageResult<Vec<f64>>;
    fn clone_box(&self) -> Box<dyn ImageBase>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Converts a runtime-length parameter into a `D`-array.
pub(crate) fn to_array<T: Copy, const D: usize>(
    values: &[T],
    parameter: &'static str,
) -> PolyImageResult<[T; D]> {
    <[T; D]>::try_from(values).map_err(|_| PolyImageError::ShapeMismatch {
        parameter,
        expected: D,
        got: values.len(),
    })
}

impl<P: PixelType, const D: usize> ImageBase for TypedImage<P, D> {
    fn tag(&self) -> ValueTypeTag {
        P::TAG
    }

    fn dimension(&self) -> usize {
        D
    }

    fn size(&self) -> Vec<usize> {
        TypedImage::size(self).to_vec()
    }

    fn index(&self) -> Vec<i64> {
        TypedImage::index(self).to_vec()
    }

    fn set_index(&mut self, index: &[i64]) -> PolyImageResult<()> {
        TypedImage::set_index(self, to_array(index, "index")?);
        Ok(())
    }

    fn origin(&self) -> Vec<f64> {
        TypedImage::origin(self).to_vec()
    }

    fn set_origin(&mut self, origin: &[f64]) -> PolyImageResult<()> {
        TypedImage::set_origin(self, to_array(origin, "origin")?)
    }

    fn spacing(&self) -> Vec<f64> {
        TypedImage::spacing(self).to_vec()
    }

    fn set_spacing(&mut self, spacing: &[f64]) -> PolyImageResult<()> {
        TypedImage::set_spacing(self, to_array(spacing, "spacing")?)
    }

    fn direction(&self) -> Vec<f64> {
        TypedImage::direction(self).iter().flatten().copied().collect()
    }

    fn set_direction(&mut self, direction: &[f64]) -> PolyImageResult<()> {
        if direction.len() != D * D {
            return Err(PolyImageError::ShapeMismatch {
                parameter: "direction",
                expected: D * D,
                got: direction.len(),
            });
        }
        let matrix = std::array::from_fn(|r| std::array::from_fn(|c| direction[r * D + c]));
        TypedImage::set_direction(self, matrix)
    }

    fn components(&self) -> usize {
        TypedImage::components(self)
    }

    fn number_of_pixels(&self) -> usize {
        TypedImage::number_of_pixels(self)
    }

    fn pixel_as_f64(&self, idx: &[usize]) -> PolyImageResult<Vec<f64>> {
        let idx: [usize; D] = to_array(idx, "pixel index")?;
        let pixel = self
            .pixel(idx)
            .ok_or_else(|| PolyImageError::IndexOutOfBounds {
                index: idx.to_vec(),
                size: self.size().to_vec(),
            })?;
        Ok(pixel.iter().map(|v| v.to_f64()).collect())
    }

    fn clone_box(&self) -> Box<dyn ImageBase> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type AllocateFn = fn(&[usize], usize) -> PolyImageResult<Box<dyn ImageBase>>;

struct Allocator;

impl Addressor for Allocator {
    type Entry = AllocateFn;

    fn produce<P: PixelType, const D: usize>() -> AllocateFn {
        allocate_typed::<P, D>
    }
}

fn allocate_typed<P: PixelType, const D: usize>(
    size: &[usize],
    components: usize,
) -> PolyImageResult<Box<dyn ImageBase>> {
    let size = to_array(size, "size")?;
    Ok(Box::new(TypedImage::<P, D>::new(size, components)?))
}

fn allocators() -> &'static DispatchRegistry<AllocateFn> {
    static ALLOCATORS: OnceLock<DispatchRegistry<AllocateFn>> = OnceLock::new();
    ALLOCATORS.get_or_init(|| {
        DispatchRegistry::build::<AllPixels, MIN_IMAGE_DIMENSION, MAX_DIMENSION, Allocator>()
    })
}

/// Image whose pixel type and dimension are chosen at runtime.
pub struct Image {
    inner: Box<dyn ImageBase>,
}

impl Image {
    /// Allocates a zero-filled image with the default component count.
    pub fn new(size: &[usize], tag: ValueTypeTag) -> PolyImageResult<Self> {
        Self::with_components(size, tag, 0)
    }

    /// Allocates a zero-filled image.
    ///
    /// `size.len()` is the dimension and must lie in
    /// `[MIN_IMAGE_DIMENSION, MAX_DIMENSION]`. A `components` of `0` selects
    /// the default: one for scalar and label pixels, the dimension for vector
    /// pixels.
    pub fn with_components(
        size: &[usize],
        tag: ValueTypeTag,
        components: usize,
    ) -> PolyImageResult<Self> {
        let mut image = Self::default();
        image.allocate(size, tag, components)?;
        Ok(image)
    }

    /// Replaces the owned representation with a freshly allocated one.
    ///
    /// On error the image is left unchanged.
    pub fn allocate(
        &mut self,
        size: &[usize],
        tag: ValueTypeTag,
        components: usize,
    ) -> PolyImageResult<()> {
        if tag == ValueTypeTag::Unknown {
            return Err(PolyImageError::UnsupportedValueType { tag });
        }
        let dimension = size.len();
        if !(MIN_IMAGE_DIMENSION..=MAX_DIMENSION).contains(&dimension) {
            return Err(PolyImageError::UnsupportedDimension {
                dimension,
                min: MIN_IMAGE_DIMENSION,
                max: MAX_DIMENSION,
            });
        }
        let allocate = allocators().lookup(tag, dimension)?;
        self.inner = allocate(size, components)?;
        Ok(())
    }

    /// Pixel type of the owned representation.
    pub fn value_type_tag(&self) -> ValueTypeTag {
        self.inner.tag()
    }

    /// Number of axes of the owned representation.
    pub fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    pub fn size(&self) -> Vec<usize> {
        self.inner.size()
    }

    /// Start index of the image region.
    pub fn index(&self) -> Vec<i64> {
        self.inner.index()
    }

    /// Moves the image region to start at `index`; pixel data is unchanged.
    pub fn set_index(&mut self, index: &[i64]) -> PolyImageResult<()> {
        self.inner.set_index(index)
    }

    pub fn origin(&self) -> Vec<f64> {
        self.inner.origin()
    }

    pub fn set_origin(&mut self, origin: &[f64]) -> PolyImageResult<()> {
        self.inner.set_origin(origin)
    }

    pub fn spacing(&self) -> Vec<f64> {
        self.inner.spacing()
    }

    pub fn set_spacing(&mut self, spacing: &[f64]) -> PolyImageResult<()> {
        self.inner.set_spacing(spacing)
    }

    /// Direction cosines as a row-major `dimension x dimension` matrix.
    pub fn direction(&self) -> Vec<f64> {
        self.inner.direction()
    }

    pub fn set_direction(&mut self, direction: &[f64]) -> PolyImageResult<()> {
        self.inner.set_direction(direction)
    }

    pub fn number_of_components_per_pixel(&self) -> usize {
        self.inner.components()
    }

    pub fn number_of_pixels(&self) -> usize {
        self.inner.number_of_pixels()
    }

    /// Reads pixel `idx` converted to `f64`, one value per component.
    pub fn pixel_as_f64(&self, idx: &[usize]) -> PolyImageResult<Vec<f64>> {
        self.inner.pixel_as_f64(idx)
    }

    /// Borrows the typed representation if it is exactly `TypedImage<P, D>`.
    pub fn as_typed<P: PixelType, const D: usize>(&self) -> Option<&TypedImage<P, D>> {
        self.inner.as_any().downcast_ref()
    }

    pub fn as_typed_mut<P: PixelType, const D: usize>(
        &mut self,
    ) -> Option<&mut TypedImage<P, D>> {
        self.inner.as_any_mut().downcast_mut()
    }

    /// Like [`Image::as_typed`] but reports a mismatch as an error.
    pub(crate) fn typed<P: PixelType, const D: usize>(
        &self,
    ) -> PolyImageResult<&TypedImage<P, D>> {
        self.as_typed().ok_or(PolyImageError::RepresentationMismatch {
            expected_tag: P::TAG,
            expected_dimension: D,
            found_tag: self.value_type_tag(),
            found_dimension: self.dimension(),
        })
    }
}

impl Default for Image {
    /// An empty two-dimensional `UInt8` image.
    fn default() -> Self {
        Self::from(TypedImage::<u8, 2>::from_parts([0, 0], 1, Vec::new()))
    }
}

impl Clone for Image {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl<P: PixelType, const D: usize> From<TypedImage<P, D>> for Image {
    fn from(image: TypedImage<P, D>) -> Self {
        Self {
            inner: Box::new(image),
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("value_type", &self.value_type_tag())
            .field("dimension", &self.dimension())
            .field("size", &self.size())
            .field("components", &self.number_of_components_per_pixel())
            .finish()
    }
}
