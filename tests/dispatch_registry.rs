use polyimage::dispatch::{visit_dimensions, DimensionVisitor};
use polyimage::pixel::{PixelCatalog, PixelVisitor};
use polyimage::{
    Addressor, DispatchKey, DispatchRegistry, PixelType, PolyImageError, ValueTypeTag,
    MAX_DIMENSION,
};

/// Two-type catalog: `u8` and `f32`.
struct PairCatalog;

impl PixelCatalog for PairCatalog {
    const LEN: usize = 2;

    fn for_each<V: PixelVisitor>(visitor: &mut V) {
        visitor.visit::<u8>();
        visitor.visit::<f32>();
    }
}

/// Catalog listing `u8` twice.
struct RepeatingCatalog;

impl PixelCatalog for RepeatingCatalog {
    const LEN: usize = 2;

    fn for_each<V: PixelVisitor>(visitor: &mut V) {
        visitor.visit::<u8>();
        visitor.visit::<u8>();
    }
}

type DescribeFn = fn() -> (ValueTypeTag, usize);

fn describe<P: PixelType, const D: usize>() -> (ValueTypeTag, usize) {
    (P::TAG, D)
}

struct DescribeAddressor;

impl Addressor for DescribeAddressor {
    type Entry = DescribeFn;

    fn produce<P: PixelType, const D: usize>() -> DescribeFn {
        describe::<P, D>
    }
}

fn pair_registry() -> DispatchRegistry<DescribeFn> {
    DispatchRegistry::build::<PairCatalog, 2, 4, DescribeAddressor>()
}

#[test]
fn two_types_by_three_dimensions_yield_six_entries() {
    let registry = pair_registry();
    assert_eq!(registry.len(), 6);

    let entry = registry.lookup(ValueTypeTag::UInt8, 3).unwrap();
    assert_eq!(entry(), (ValueTypeTag::UInt8, 3));
    assert_eq!(entry(), describe::<u8, 3>());
}

#[test]
fn every_registered_pair_resolves_to_its_own_specialization() {
    let registry = pair_registry();
    for tag in [ValueTypeTag::UInt8, ValueTypeTag::Float32] {
        for dimension in 2..=4 {
            let entry = registry.lookup(tag, dimension).unwrap();
            assert_eq!(entry(), (tag, dimension));
        }
    }
    assert_eq!(
        registry.keys(),
        vec![
            DispatchKey::new(ValueTypeTag::UInt8, 2),
            DispatchKey::new(ValueTypeTag::UInt8, 3),
            DispatchKey::new(ValueTypeTag::UInt8, 4),
            DispatchKey::new(ValueTypeTag::Float32, 2),
            DispatchKey::new(ValueTypeTag::Float32, 3),
            DispatchKey::new(ValueTypeTag::Float32, 4),
        ]
    );
}

#[test]
fn pairs_outside_catalog_and_range_are_unsupported_combinations() {
    let registry = pair_registry();
    let outside = [
        (ValueTypeTag::UInt8, 1),
        (ValueTypeTag::UInt8, 5),
        (ValueTypeTag::Float32, 0),
        (ValueTypeTag::Int16, 3),
        (ValueTypeTag::VectorUInt8, 2),
        (ValueTypeTag::Unknown, 2),
    ];
    for (tag, dimension) in outside {
        assert_eq!(
            registry.lookup(tag, dimension).unwrap_err(),
            PolyImageError::UnsupportedCombination {
                tag,
                dimension,
                max_dimension: MAX_DIMENSION,
            }
        );
        assert!(!registry.contains(tag, dimension));
    }
}

#[test]
fn duplicate_registration_is_rejected_without_changes() {
    let mut registry = pair_registry();

    let err = registry
        .register::<PairCatalog, 2, 4, DescribeAddressor>()
        .unwrap_err();
    assert_eq!(
        err,
        PolyImageError::DuplicateRegistration {
            tag: ValueTypeTag::UInt8,
            dimension: 2,
        }
    );
    assert_eq!(registry.len(), 6);

    // Partial overlap is rejected as a whole.
    let err = registry
        .register::<PairCatalog, 4, 5, DescribeAddressor>()
        .unwrap_err();
    assert_eq!(
        err,
        PolyImageError::DuplicateRegistration {
            tag: ValueTypeTag::UInt8,
            dimension: 4,
        }
    );
    assert_eq!(registry.len(), 6);
    assert!(!registry.contains(ValueTypeTag::UInt8, 5));

    registry
        .register::<PairCatalog, 5, 5, DescribeAddressor>()
        .unwrap();
    assert_eq!(registry.len(), 8);
    assert_eq!(
        registry.lookup(ValueTypeTag::Float32, 5).unwrap()(),
        (ValueTypeTag::Float32, 5)
    );
}

#[test]
fn repeated_type_in_catalog_is_a_duplicate() {
    let mut registry = DispatchRegistry::<DescribeFn>::new();
    assert!(registry.is_empty());
    let err = registry
        .register::<RepeatingCatalog, 2, 2, DescribeAddressor>()
        .unwrap_err();
    assert_eq!(
        err,
        PolyImageError::DuplicateRegistration {
            tag: ValueTypeTag::UInt8,
            dimension: 2,
        }
    );
    assert!(registry.is_empty());
}

#[test]
#[should_panic(expected = "malformed pixel catalog")]
fn building_from_repeating_catalog_panics() {
    let _ = DispatchRegistry::build::<RepeatingCatalog, 2, 3, DescribeAddressor>();
}

#[test]
fn registry_is_shared_across_threads() {
    let registry = pair_registry();
    std::thread::scope(|scope| {
        for dimension in 2..=4 {
            let registry = &registry;
            scope.spawn(move || {
                for _ in 0..100 {
                    let entry = registry.lookup(ValueTypeTag::Float32, dimension).unwrap();
                    assert_eq!(entry(), (ValueTypeTag::Float32, dimension));
                }
            });
        }
    });
}

struct CollectDimensions(Vec<usize>);

impl DimensionVisitor for CollectDimensions {
    fn visit<const D: usize>(&mut self) {
        self.0.push(D);
    }
}

#[test]
fn visit_dimensions_stops_at_max_dimension() {
    let mut dims = CollectDimensions(Vec::new());
    visit_dimensions(3, 9, &mut dims);
    assert_eq!(dims.0, vec![3, 4, 5]);
}
