//! Region extraction with optional dimension collapsing.
//!
//! For every axis `d`, `size[d] == 0` collapses that axis onto the slice at
//! `index[d]`; the output dimension is the number of non-zero sizes. The
//! output keeps the input origin and spacing on retained axes and its region
//! starts at the requested index.
//!
//! Execution dispatches twice: once on the input `(pixel type, dimension)`
//! through a registry, then on the output dimension, which is only known
//! after counting non-zero sizes.

use crate::dispatch::{
    dispatch_dimension, Addressor, DimensionHandler, DispatchRegistry, MAX_DIMENSION,
    MIN_IMAGE_DIMENSION,
};
use crate::filter::collapse::{collapse_direction, DirectionCollapseStrategy};
use crate::image::{to_array, Image, TypedImage};
use crate::pixel::{NonLabelPixels, PixelType};
use crate::trace::trace_span;
use crate::util::{PolyImageError, PolyImageResult};
use std::fmt;
use std::sync::OnceLock;

/// Crops an image to a region, collapsing axes whose requested size is zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractImageFilter {
    size: Vec<usize>,
    index: Vec<i64>,
    strategy: DirectionCollapseStrategy,
}

type ExtractFn = fn(&ExtractImageFilter, &Image, usize) -> PolyImageResult<Image>;

struct Extractor;

impl Addressor for Extractor {
    type Entry = ExtractFn;

    fn produce<P: PixelType, const D: usize>() -> ExtractFn {
        execute_internal::<P, D>
    }
}

fn registry() -> &'static DispatchRegistry<ExtractFn> {
    static REGISTRY: OnceLock<DispatchRegistry<ExtractFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        DispatchRegistry::build::<NonLabelPixels, MIN_IMAGE_DIMENSION, MAX_DIMENSION, Extractor>()
    })
}

impl ExtractImageFilter {
    /// Creates a filter with empty size/index and the `Unknown` strategy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: Vec<usize>) -> Self {
        self.size = size;
        self
    }

    pub fn with_index(mut self, index: Vec<i64>) -> Self {
        self.index = index;
        self
    }

    /// Builder form of [`ExtractImageFilter::set_direction_collapse_strategy`].
    pub fn with_direction_collapse_strategy(
        mut self,
        strategy: DirectionCollapseStrategy,
    ) -> PolyImageResult<Self> {
        self.set_direction_collapse_strategy(strategy)?;
        Ok(self)
    }

    /// Requested size per input axis; zero collapses the axis.
    pub fn size(&self) -> &[usize] {
        &self.size
    }

    pub fn set_size(&mut self, size: Vec<usize>) {
        self.size = size;
    }

    /// Requested start index per input axis.
    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn set_index(&mut self, index: Vec<i64>) {
        self.index = index;
    }

    pub fn direction_collapse_strategy(&self) -> DirectionCollapseStrategy {
        self.strategy
    }

    /// Selects how direction cosines are collapsed.
    ///
    /// `Unknown` is only the initial state and is rejected here.
    pub fn set_direction_collapse_strategy(
        &mut self,
        strategy: DirectionCollapseStrategy,
    ) -> PolyImageResult<()> {
        if strategy == DirectionCollapseStrategy::Unknown {
            return Err(PolyImageError::InvalidStrategy { strategy });
        }
        self.strategy = strategy;
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        "ExtractImageFilter"
    }

    /// Validates the parameters against an input dimension and returns the
    /// output dimension.
    pub fn output_dimension(&self, input_dimension: usize) -> PolyImageResult<usize> {
        if self.size.len() != input_dimension {
            return Err(PolyImageError::ShapeMismatch {
                parameter: "size",
                expected: input_dimension,
                got: self.size.len(),
            });
        }
        if self.index.len() != input_dimension {
            return Err(PolyImageError::ShapeMismatch {
                parameter: "index",
                expected: input_dimension,
                got: self.index.len(),
            });
        }
        let output_dimension = self.size.iter().filter(|&&s| s != 0).count();
        if output_dimension == 0 {
            return Err(PolyImageError::UnsupportedDimension {
                dimension: 0,
                min: 1,
                max: MAX_DIMENSION,
            });
        }
        Ok(output_dimension)
    }

    /// Extracts the configured region of `image` into a new image.
    pub fn execute(&self, image: &Image) -> PolyImageResult<Image> {
        let _span = trace_span!(
            "extract_image_filter",
            value_type = %image.value_type_tag(),
            dimension = image.dimension()
        )
        .entered();

        let input_dimension = image.dimension();
        let output_dimension = self.output_dimension(input_dimension)?;
        if output_dimension != input_dimension
            && self.strategy == DirectionCollapseStrategy::Unknown
        {
            return Err(PolyImageError::MissingStrategy {
                input_dimension,
                output_dimension,
            });
        }

        let execute = registry().lookup(image.value_type_tag(), input_dimension)?;
        execute(self, image, output_dimension)
    }
}

impl fmt::Display for ExtractImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name())?;
        writeln!(f, "  Size: {:?}", self.size)?;
        writeln!(f, "  Index: {:?}", self.index)?;
        writeln!(f, "  DirectionCollapseToStrategy: {}", self.strategy)
    }
}

fn execute_internal<P: PixelType, const D: usize>(
    filter: &ExtractImageFilter,
    image: &Image,
    output_dimension: usize,
) -> PolyImageResult<Image> {
    let input = image.typed::<P, D>()?;
    let size: [usize; D] = to_array(&filter.size, "size")?;
    let index: [i64; D] = to_array(&filter.index, "index")?;
    check_region_inside(input, &size, &index)?;

    dispatch_dimension(
        output_dimension,
        ExtractTo {
            input,
            size,
            index,
            strategy: filter.strategy,
        },
    )
}

fn check_region_inside<P: PixelType, const D: usize>(
    input: &TypedImage<P, D>,
    size: &[usize; D],
    index: &[i64; D],
) -> PolyImageResult<()> {
    let image_index = input.index();
    let image_size = input.size();
    let axis_inside = |d: usize| -> Option<bool> {
        // A collapsed axis still reads one slice.
        let extent = i64::try_from(size[d].max(1)).ok()?;
        let end = index[d].checked_add(extent)?;
        let image_end = image_index[d].checked_add(i64::try_from(image_size[d]).ok()?)?;
        Some(index[d] >= image_index[d] && end <= image_end)
    };
    if (0..D).all(|d| axis_inside(d) == Some(true)) {
        return Ok(());
    }
    Err(PolyImageError::RegionOutOfBounds {
        index: index.to_vec(),
        size: size.to_vec(),
        image_index: image_index.to_vec(),
        image_size: image_size.to_vec(),
    })
}

/// Second-stage dispatch on the output dimension.
struct ExtractTo<'a, P: PixelType, const D: usize> {
    input: &'a TypedImage<P, D>,
    size: [usize; D],
    index: [i64; D],
    strategy: DirectionCollapseStrategy,
}

impl<P: PixelType, const D: usize> DimensionHandler for ExtractTo<'_, P, D> {
    type Output = Image;

    fn call<const K: usize>(self) -> PolyImageResult<Image> {
        extract::<P, D, K>(self.input, &self.size, &self.index, self.strategy).map(Image::from)
    }
}

fn extract<P: PixelType, const D: usize, const K: usize>(
    input: &TypedImage<P, D>,
    size: &[usize; D],
    index: &[i64; D],
    strategy: DirectionCollapseStrategy,
) -> PolyImageResult<TypedImage<P, K>> {
    let retained: Vec<usize> = (0..D).filter(|&d| size[d] != 0).collect();
    if retained.len() != K {
        return Err(PolyImageError::UnsupportedDimension {
            dimension: K,
            min: retained.len(),
            max: retained.len(),
        });
    }

    let in_origin = input.origin();
    let in_spacing = input.spacing();
    let out_size: [usize; K] = std::array::from_fn(|j| size[retained[j]]);
    let out_index: [i64; K] = std::array::from_fn(|j| index[retained[j]]);
    let out_origin: [f64; K] = std::array::from_fn(|j| in_origin[retained[j]]);
    let out_spacing: [f64; K] = std::array::from_fn(|j| in_spacing[retained[j]]);
    let out_direction = collapse_direction::<D, K>(&input.direction(), &retained, strategy)?;

    let mut output = TypedImage::<P, K>::new(out_size, input.components())?;
    let mapper = LineMapper::new(input, index, &retained, &out_size);
    let src = input.as_slice();
    let dst = output.as_mut_slice();
    if mapper.line_len > 0 {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            dst.par_chunks_mut(mapper.line_len)
                .enumerate()
                .for_each(|(line, chunk)| mapper.copy_line(line, src, chunk));
        }
        #[cfg(not(feature = "rayon"))]
        {
            dst.chunks_mut(mapper.line_len)
                .enumerate()
                .for_each(|(line, chunk)| mapper.copy_line(line, src, chunk));
        }
    }

    Ok(output.with_geometry(out_index, out_origin, out_spacing, out_direction))
}

/// Maps output lines (runs along output axis 0) to input buffer offsets.
struct LineMapper {
    /// Input buffer offset of the region start.
    base: usize,
    /// Input buffer stride of each retained axis, in output axis order.
    strides: Vec<usize>,
    out_size: Vec<usize>,
    components: usize,
    line_len: usize,
}

impl LineMapper {
    fn new<P: PixelType, const D: usize>(
        input: &TypedImage<P, D>,
        index: &[i64; D],
        retained: &[usize],
        out_size: &[usize],
    ) -> Self {
        let components = input.components();
        let in_size = input.size();
        let in_index = input.index();
        let mut in_strides = [0usize; D];
        let mut stride = components;
        for d in 0..D {
            in_strides[d] = stride;
            stride *= in_size[d];
        }
        // Region containment was checked, so offsets are non-negative.
        let base = (0..D)
            .map(|d| (index[d] - in_index[d]) as usize * in_strides[d])
            .sum();
        let line_len = out_size.first().map_or(0, |&n| n * components);
        Self {
            base,
            strides: retained.iter().map(|&d| in_strides[d]).collect(),
            out_size: out_size.to_vec(),
            components,
            line_len,
        }
    }

    fn copy_line<C: Copy>(&self, line: usize, src: &[C], dst: &mut [C]) {
        let mut offset = self.base;
        let mut rest = line;
        for axis in 1..self.out_size.len() {
            offset += (rest % self.out_size[axis]) * self.strides[axis];
            rest /= self.out_size[axis];
        }
        let c = self.components;
        for (x, pixel) in dst.chunks_exact_mut(c).enumerate() {
            let start = offset + x * self.strides[0];
            pixel.copy_from_slice(&src[start..start + c]);
        }
    }
}
