//! Dispatch from runtime `(pixel type, dimension)` pairs to specialized code.
//!
//! An [`Addressor`] turns a compile-time pair `(P, D)` into a callable entry
//! (typically a function pointer to `some_fn::<P, D>`). A
//! [`DispatchRegistry`] instantiates the addressor for every type of a
//! [`PixelCatalog`] and every dimension of a range, then serves O(1)
//! lookups keyed by the runtime [`ValueTypeTag`] and dimension.
//!
//! The entry type is a type parameter of the registry, so the signature used
//! at lookup is always the one produced at registration.

mod dimension;

pub use dimension::{
    dispatch_dimension, visit_dimensions, DimensionHandler, DimensionVisitor, MAX_DIMENSION,
    MIN_IMAGE_DIMENSION,
};

use crate::pixel::{PixelCatalog, PixelType, PixelVisitor, ValueTypeTag};
use crate::trace::trace_event;
use crate::util::{PolyImageError, PolyImageResult};
use dimension::DimensionBounds;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

/// Registry key: a pixel type tag and a dimension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey {
    pub tag: ValueTypeTag,
    pub dimension: usize,
}

impl DispatchKey {
    pub fn new(tag: ValueTypeTag, dimension: usize) -> Self {
        Self { tag, dimension }
    }
}

/// Produces the specialized entry for one `(P, D)` combination.
///
/// Implementors do no work besides naming the specialization, e.g.
/// `allocate::<P, D> as AllocateFn`.
pub trait Addressor {
    type Entry: Copy;

    fn produce<P: PixelType, const D: usize>() -> Self::Entry;
}

struct NonEmptyCatalog<C>(PhantomData<C>);

impl<C: PixelCatalog> NonEmptyCatalog<C> {
    const VALID: () = assert!(C::LEN > 0, "pixel catalog must not be empty");
}

/// Write-once table of specialized entries keyed by [`DispatchKey`].
///
/// Registries are meant to be built once (usually inside a `OnceLock`) and
/// then shared immutably across threads.
pub struct DispatchRegistry<E> {
    entries: HashMap<DispatchKey, E>,
}

impl<E: Copy> DispatchRegistry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a registry holding every `C x [MIN, MAX]` specialization of `A`.
    ///
    /// Bounds and catalog are checked at compile time:
    ///
    /// ```compile_fail
    /// use polyimage::dispatch::{Addressor, DispatchRegistry};
    /// use polyimage::pixel::{PixelType, ScalarPixels, ValueTypeTag};
    ///
    /// struct TagOnly;
    /// impl Addressor for TagOnly {
    ///     type Entry = ValueTypeTag;
    ///     fn produce<P: PixelType, const D: usize>() -> ValueTypeTag {
    ///         P::TAG
    ///     }
    /// }
    ///
    /// // MIN > MAX
    /// let _ = DispatchRegistry::build::<ScalarPixels, 4, 2, TagOnly>();
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the catalog lists the same pixel type twice.
    pub fn build<C, const MIN: usize, const MAX: usize, A>() -> Self
    where
        C: PixelCatalog,
        A: Addressor<Entry = E>,
    {
        let mut registry = Self::new();
        if let Err(err) = registry.register::<C, MIN, MAX, A>() {
            panic!("malformed pixel catalog: {err}");
        }
        trace_event!(
            "dispatch_registry_built",
            entries = registry.len(),
            min_dimension = MIN,
            max_dimension = MAX
        );
        registry
    }

    /// Adds every `C x [MIN, MAX]` specialization of `A`.
    ///
    /// Registration is all-or-nothing: if any key is already present (or
    /// occurs twice in `C`) the registry is left unchanged and
    /// [`PolyImageError::DuplicateRegistration`] names the first clash.
    pub fn register<C, const MIN: usize, const MAX: usize, A>(&mut self) -> PolyImageResult<()>
    where
        C: PixelCatalog,
        A: Addressor<Entry = E>,
    {
        let () = DimensionBounds::<MIN, MAX>::VALID;
        let () = NonEmptyCatalog::<C>::VALID;

        let mut staged = Vec::with_capacity(C::LEN * (MAX - MIN + 1));
        C::for_each(&mut TypeRegistrar::<A> {
            min: MIN,
            max: MAX,
            staged: &mut staged,
        });

        let mut seen = HashSet::with_capacity(staged.len());
        for (key, _) in &staged {
            if self.entries.contains_key(key) || !seen.insert(*key) {
                return Err(PolyImageError::DuplicateRegistration {
                    tag: key.tag,
                    dimension: key.dimension,
                });
            }
        }
        self.entries.extend(staged);
        Ok(())
    }

    /// Returns the entry registered for `(tag, dimension)`.
    pub fn lookup(&self, tag: ValueTypeTag, dimension: usize) -> PolyImageResult<E> {
        self.entries
            .get(&DispatchKey::new(tag, dimension))
            .copied()
            .ok_or(PolyImageError::UnsupportedCombination {
                tag,
                dimension,
                max_dimension: MAX_DIMENSION,
            })
    }

    /// Returns `true` if an entry exists for `(tag, dimension)`.
    pub fn contains(&self, tag: ValueTypeTag, dimension: usize) -> bool {
        self.entries.contains_key(&DispatchKey::new(tag, dimension))
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest registered dimension, or 0 for an empty registry.
    pub fn max_dimension(&self) -> usize {
        self.entries.keys().map(|key| key.dimension).max().unwrap_or(0)
    }

    /// Returns all registered keys in sorted order.
    pub fn keys(&self) -> Vec<DispatchKey> {
        let mut keys: Vec<_> = self.entries.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl<E: Copy> Default for DispatchRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for DispatchRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}

struct TypeRegistrar<'a, A: Addressor> {
    min: usize,
    max: usize,
    staged: &'a mut Vec<(DispatchKey, A::Entry)>,
}

impl<A: Addressor> PixelVisitor for TypeRegistrar<'_, A> {
    fn visit<P: PixelType>(&mut self) {
        let mut dims = DimensionRegistrar::<P, A> {
            staged: &mut *self.staged,
            _pixel: PhantomData,
        };
        visit_dimensions(self.min, self.max, &mut dims);
    }
}

struct DimensionRegistrar<'a, P, A: Addressor> {
    staged: &'a mut Vec<(DispatchKey, A::Entry)>,
    _pixel: PhantomData<fn() -> P>,
}

impl<P: PixelType, A: Addressor> DimensionVisitor for DimensionRegistrar<'_, P, A> {
    fn visit<const D: usize>(&mut self) {
        let entry = A::produce::<P, D>();
        self.staged.push((DispatchKey::new(P::TAG, D), entry));
    }
}
