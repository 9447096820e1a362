//! Pixel value types and the closed catalog of supported representations.
//!
//! Every concrete pixel representation implements [`PixelType`], which ties
//! a Rust type to its runtime [`ValueTypeTag`]. Scalars implement the trait
//! directly; [`Vector`] and [`Label`] are zero-sized markers wrapping a scalar
//! component type.

use std::fmt;
use std::marker::PhantomData;

pub mod catalog;

pub use catalog::{
    AllPixels, LabelPixels, NonLabelPixels, PixelCatalog, PixelVisitor, ScalarPixels,
    VectorPixels,
};

/// Runtime identifier of a concrete pixel representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueTypeTag {
    /// Sentinel for "no valid pixel type". Never registered.
    Unknown,
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float32,
    Float64,
    VectorUInt8,
    VectorInt8,
    VectorUInt16,
    VectorInt16,
    VectorUInt32,
    VectorInt32,
    VectorUInt64,
    VectorInt64,
    VectorFloat32,
    VectorFloat64,
    LabelUInt8,
    LabelUInt16,
    LabelUInt32,
    LabelUInt64,
}

impl ValueTypeTag {
    /// All tags except `Unknown`, in declaration order.
    pub const KNOWN: [ValueTypeTag; 24] = [
        ValueTypeTag::UInt8,
        ValueTypeTag::Int8,
        ValueTypeTag::UInt16,
        ValueTypeTag::Int16,
        ValueTypeTag::UInt32,
        ValueTypeTag::Int32,
        ValueTypeTag::UInt64,
        ValueTypeTag::Int64,
        ValueTypeTag::Float32,
        ValueTypeTag::Float64,
        ValueTypeTag::VectorUInt8,
        ValueTypeTag::VectorInt8,
        ValueTypeTag::VectorUInt16,
        ValueTypeTag::VectorInt16,
        ValueTypeTag::VectorUInt32,
        ValueTypeTag::VectorInt32,
        ValueTypeTag::VectorUInt64,
        ValueTypeTag::VectorInt64,
        ValueTypeTag::VectorFloat32,
        ValueTypeTag::VectorFloat64,
        ValueTypeTag::LabelUInt8,
        ValueTypeTag::LabelUInt16,
        ValueTypeTag::LabelUInt32,
        ValueTypeTag::LabelUInt64,
    ];

    /// Returns a human readable name, e.g. `"32-bit float"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueTypeTag::Unknown => "Unknown pixel id",
            ValueTypeTag::UInt8 => "8-bit unsigned integer",
            ValueTypeTag::Int8 => "8-bit signed integer",
            ValueTypeTag::UInt16 => "16-bit unsigned integer",
            ValueTypeTag::Int16 => "16-bit signed integer",
            ValueTypeTag::UInt32 => "32-bit unsigned integer",
            ValueTypeTag::Int32 => "32-bit signed integer",
            ValueTypeTag::UInt64 => "64-bit unsigned integer",
            ValueTypeTag::Int64 => "64-bit signed integer",
            ValueTypeTag::Float32 => "32-bit float",
            ValueTypeTag::Float64 => "64-bit float",
            ValueTypeTag::VectorUInt8 => "vector of 8-bit unsigned integer",
            ValueTypeTag::VectorInt8 => "vector of 8-bit signed integer",
            ValueTypeTag::VectorUInt16 => "vector of 16-bit unsigned integer",
            ValueTypeTag::VectorInt16 => "vector of 16-bit signed integer",
            ValueTypeTag::VectorUInt32 => "vector of 32-bit unsigned integer",
            ValueTypeTag::VectorInt32 => "vector of 32-bit signed integer",
            ValueTypeTag::VectorUInt64 => "vector of 64-bit unsigned integer",
            ValueTypeTag::VectorInt64 => "vector of 64-bit signed integer",
            ValueTypeTag::VectorFloat32 => "vector of 32-bit float",
            ValueTypeTag::VectorFloat64 => "vector of 64-bit float",
            ValueTypeTag::LabelUInt8 => "label of 8-bit unsigned integer",
            ValueTypeTag::LabelUInt16 => "label of 16-bit unsigned integer",
            ValueTypeTag::LabelUInt32 => "label of 32-bit unsigned integer",
            ValueTypeTag::LabelUInt64 => "label of 64-bit unsigned integer",
        }
    }

    /// Returns `true` for multi-component pixel types.
    pub fn is_vector(self) -> bool {
        matches!(
            self,
            ValueTypeTag::VectorUInt8
                | ValueTypeTag::VectorInt8
                | ValueTypeTag::VectorUInt16
                | ValueTypeTag::VectorInt16
                | ValueTypeTag::VectorUInt32
                | ValueTypeTag::VectorInt32
                | ValueTypeTag::VectorUInt64
                | ValueTypeTag::VectorInt64
                | ValueTypeTag::VectorFloat32
                | ValueTypeTag::VectorFloat64
        )
    }

    /// Returns `true` for label pixel types.
    pub fn is_label(self) -> bool {
        matches!(
            self,
            ValueTypeTag::LabelUInt8
                | ValueTypeTag::LabelUInt16
                | ValueTypeTag::LabelUInt32
                | ValueTypeTag::LabelUInt64
        )
    }

    /// Returns `true` for single-component, non-label pixel types.
    pub fn is_scalar(self) -> bool {
        self != ValueTypeTag::Unknown && !self.is_vector() && !self.is_label()
    }
}

impl fmt::Display for ValueTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad classification of a pixel representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelKind {
    Scalar,
    Vector,
    Label,
}

/// Primitive numeric type stored in an image buffer.
pub trait Component: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Converts the value to `f64` (lossy for 64-bit integers).
    fn to_f64(self) -> f64;
}

macro_rules! impl_component {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Component for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )+
    };
}

impl_component!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// A concrete pixel representation known at compile time.
pub trait PixelType: Send + Sync + 'static {
    /// Element type of the backing buffer.
    type Component: Component;
    /// Runtime tag identifying this representation.
    const TAG: ValueTypeTag;
    /// Whether this is a scalar, vector or label pixel.
    const KIND: PixelKind;
}

/// Multi-component pixel with components of type `T`.
pub struct Vector<T>(PhantomData<T>);

/// Label pixel with integral storage `T`.
pub struct Label<T>(PhantomData<T>);

macro_rules! impl_pixel_types {
    ($($ty:ty => $scalar:ident, $vector:ident);+ $(;)?) => {
        $(
            impl PixelType for $ty {
                type Component = $ty;
                const TAG: ValueTypeTag = ValueTypeTag::$scalar;
                const KIND: PixelKind = PixelKind::Scalar;
            }

            impl PixelType for Vector<$ty> {
                type Component = $ty;
                const TAG: ValueTypeTag = ValueTypeTag::$vector;
                const KIND: PixelKind = PixelKind::Vector;
            }
        )+
    };
}

impl_pixel_types! {
    u8 => UInt8, VectorUInt8;
    i8 => Int8, VectorInt8;
    u16 => UInt16, VectorUInt16;
    i16 => Int16, VectorInt16;
    u32 => UInt32, VectorUInt32;
    i32 => Int32, VectorInt32;
    u64 => UInt64, VectorUInt64;
    i64 => Int64, VectorInt64;
    f32 => Float32, VectorFloat32;
    f64 => Float64, VectorFloat64;
}

macro_rules! impl_label_types {
    ($($ty:ty => $label:ident);+ $(;)?) => {
        $(
            impl PixelType for Label<$ty> {
                type Component = $ty;
                const TAG: ValueTypeTag = ValueTypeTag::$label;
                const KIND: PixelKind = PixelKind::Label;
            }
        )+
    };
}

impl_label_types! {
    u8 => LabelUInt8;
    u16 => LabelUInt16;
    u32 => LabelUInt32;
    u64 => LabelUInt64;
}
