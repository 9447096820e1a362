//! Compile-time enumerable lists of pixel types.
//!
//! A catalog cannot be iterated like a runtime collection because each
//! element is a distinct type. Instead the catalog calls back into a
//! [`PixelVisitor`] once per type, monomorphizing the visitor for each.

use crate::pixel::{Label, PixelType, ValueTypeTag, Vector};

/// Callback invoked once per pixel type of a catalog.
pub trait PixelVisitor {
    fn visit<P: PixelType>(&mut self);
}

/// A closed, build-time list of pixel types.
pub trait PixelCatalog {
    /// Number of types in the catalog.
    const LEN: usize;

    /// Calls `visitor.visit::<P>()` for every type `P` in the catalog.
    fn for_each<V: PixelVisitor>(visitor: &mut V);

    /// Returns the tags of all types in catalog order.
    fn tags() -> Vec<ValueTypeTag> {
        struct Collect(Vec<ValueTypeTag>);
        impl PixelVisitor for Collect {
            fn visit<P: PixelType>(&mut self) {
                self.0.push(P::TAG);
            }
        }
        let mut collect = Collect(Vec::with_capacity(Self::LEN));
        Self::for_each(&mut collect);
        collect.0
    }

    /// Returns `true` if `tag` belongs to a type of this catalog.
    fn contains(tag: ValueTypeTag) -> bool {
        Self::tags().contains(&tag)
    }
}

macro_rules! pixel_catalog {
    ($(#[$meta:meta])* $name:ident => [$($ty:ty),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $name;

        impl PixelCatalog for $name {
            const LEN: usize = [$(stringify!($ty)),+].len();

            fn for_each<V: PixelVisitor>(visitor: &mut V) {
                $( visitor.visit::<$ty>(); )+
            }
        }
    };
}

pixel_catalog! {
    /// Single-component numeric pixels.
    ScalarPixels => [u8, i8, u16, i16, u32, i32, u64, i64, f32, f64]
}

pixel_catalog! {
    /// Multi-component numeric pixels.
    VectorPixels => [
        Vector<u8>, Vector<i8>, Vector<u16>, Vector<i16>, Vector<u32>,
        Vector<i32>, Vector<u64>, Vector<i64>, Vector<f32>, Vector<f64>,
    ]
}

pixel_catalog! {
    /// Label pixels.
    LabelPixels => [Label<u8>, Label<u16>, Label<u32>, Label<u64>]
}

/// Scalar and vector pixels; what most filters accept.
#[derive(Copy, Clone, Debug, Default)]
pub struct NonLabelPixels;

impl PixelCatalog for NonLabelPixels {
    const LEN: usize = ScalarPixels::LEN + VectorPixels::LEN;

    fn for_each<V: PixelVisitor>(visitor: &mut V) {
        ScalarPixels::for_each(visitor);
        VectorPixels::for_each(visitor);
    }
}

/// Every supported pixel type.
#[derive(Copy, Clone, Debug, Default)]
pub struct AllPixels;

impl PixelCatalog for AllPixels {
    const LEN: usize = NonLabelPixels::LEN + LabelPixels::LEN;

    fn for_each<V: PixelVisitor>(visitor: &mut V) {
        NonLabelPixels::for_each(visitor);
        LabelPixels::for_each(visitor);
    }
}
