//! polyimage is an N-dimensional image library whose runtime-typed
//! [`Image`] is backed by statically specialized storage.
//!
//! Operations are written once as generic code over a pixel type `P` and a
//! dimension `D`. A [`DispatchRegistry`] instantiates them for a closed
//! [`pixel::PixelCatalog`] and dimension range and routes calls by the
//! image's runtime [`ValueTypeTag`] and dimension.
//!
//! Optional features: `rayon` parallelizes pixel copies, `tracing` emits
//! spans and events.

mod trace;

pub mod dispatch;
pub mod filter;
pub mod image;
pub mod pixel;
pub mod util;

pub use dispatch::{
    dispatch_dimension, Addressor, DimensionHandler, DispatchKey, DispatchRegistry,
    MAX_DIMENSION, MIN_IMAGE_DIMENSION,
};
pub use filter::{DirectionCollapseStrategy, ExtractImageFilter};
pub use image::{Image, TypedImage};
pub use pixel::{Label, PixelType, ValueTypeTag, Vector};
pub use util::{PolyImageError, PolyImageResult};
