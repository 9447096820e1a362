use polyimage::{Image, PolyImageError, TypedImage, ValueTypeTag, Vector, MAX_DIMENSION};

#[test]
fn allocation_round_trips_tag_and_dimension() {
    for tag in ValueTypeTag::KNOWN {
        for dimension in 2..=MAX_DIMENSION {
            let size: Vec<usize> = (0..dimension).map(|d| d + 2).collect();
            let image = Image::new(&size, tag).unwrap();
            assert_eq!(image.value_type_tag(), tag);
            assert_eq!(image.dimension(), dimension);
            assert_eq!(image.size(), size);
            assert_eq!(image.number_of_pixels(), size.iter().product::<usize>());
        }
    }
}

#[test]
fn unknown_tag_is_unsupported_value_type() {
    let err = Image::new(&[4, 4], ValueTypeTag::Unknown).unwrap_err();
    assert_eq!(
        err,
        PolyImageError::UnsupportedValueType {
            tag: ValueTypeTag::Unknown,
        }
    );
}

#[test]
fn shape_length_outside_supported_range_is_rejected() {
    for size in [vec![], vec![8], vec![2; MAX_DIMENSION + 1]] {
        let err = Image::new(&size, ValueTypeTag::Float32).unwrap_err();
        assert_eq!(
            err,
            PolyImageError::UnsupportedDimension {
                dimension: size.len(),
                min: 2,
                max: MAX_DIMENSION,
            }
        );
    }
}

#[test]
fn component_count_follows_pixel_kind() {
    let vector = Image::new(&[3, 3, 3], ValueTypeTag::VectorFloat32).unwrap();
    assert_eq!(vector.number_of_components_per_pixel(), 3);

    let vector = Image::with_components(&[3, 3], ValueTypeTag::VectorUInt8, 7).unwrap();
    assert_eq!(vector.number_of_components_per_pixel(), 7);
    assert_eq!(vector.pixel_as_f64(&[2, 2]).unwrap(), vec![0.0; 7]);

    let scalar = Image::with_components(&[3, 3], ValueTypeTag::Int32, 1).unwrap();
    assert_eq!(scalar.number_of_components_per_pixel(), 1);

    let err = Image::with_components(&[3, 3], ValueTypeTag::Float64, 3).unwrap_err();
    assert_eq!(
        err,
        PolyImageError::InvalidComponentCount {
            tag: ValueTypeTag::Float64,
            components: 3,
        }
    );
}

#[test]
fn reallocation_replaces_representation_wholesale() {
    let mut image = Image::new(&[4, 4], ValueTypeTag::UInt8).unwrap();
    image.set_spacing(&[0.5, 2.0]).unwrap();

    image
        .allocate(&[2, 3, 4], ValueTypeTag::VectorFloat64, 0)
        .unwrap();
    assert_eq!(image.value_type_tag(), ValueTypeTag::VectorFloat64);
    assert_eq!(image.dimension(), 3);
    assert_eq!(image.spacing(), vec![1.0, 1.0, 1.0]);
    assert!(image.as_typed::<Vector<f64>, 3>().is_some());
    assert!(image.as_typed::<u8, 2>().is_none());
}

#[test]
fn failed_allocation_leaves_image_unchanged() {
    let mut image = Image::new(&[5, 6], ValueTypeTag::Int16).unwrap();
    assert!(image.allocate(&[5, 6], ValueTypeTag::Unknown, 0).is_err());
    assert!(image.allocate(&[5], ValueTypeTag::Int16, 0).is_err());
    assert!(image.allocate(&[5, 6], ValueTypeTag::LabelUInt8, 4).is_err());
    assert_eq!(image.value_type_tag(), ValueTypeTag::Int16);
    assert_eq!(image.size(), vec![5, 6]);
}

#[test]
fn geometry_setters_check_length_and_values() {
    let mut image = Image::new(&[4, 4, 4], ValueTypeTag::Float32).unwrap();

    assert_eq!(
        image.set_origin(&[1.0, 2.0]).unwrap_err(),
        PolyImageError::ShapeMismatch {
            parameter: "origin",
            expected: 3,
            got: 2,
        }
    );
    assert!(image.set_spacing(&[1.0, -1.0, 1.0]).is_err());
    assert!(image.set_direction(&[1.0, 0.0, 0.0, 1.0]).is_err());

    image.set_origin(&[1.0, 2.0, 3.0]).unwrap();
    image
        .set_direction(&[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0])
        .unwrap();
    assert_eq!(image.origin(), vec![1.0, 2.0, 3.0]);
    assert_eq!(image.direction()[1], 1.0);
    assert_eq!(image.index(), vec![0, 0, 0]);
}

#[test]
fn oversized_allocation_is_an_error() {
    for size in [vec![usize::MAX, 1], vec![1 << 40, 1 << 30]] {
        let err = Image::new(&size, ValueTypeTag::UInt8).unwrap_err();
        assert!(
            matches!(err, PolyImageError::InvalidGeometry { field: "size", .. }),
            "{err}"
        );
    }
}

#[test]
fn region_index_can_be_moved() {
    let mut image = Image::new(&[3, 3, 3], ValueTypeTag::VectorInt16).unwrap();
    image.set_index(&[-2, 5, 0]).unwrap();
    assert_eq!(image.index(), vec![-2, 5, 0]);
    assert_eq!(image.size(), vec![3, 3, 3]);
    assert_eq!(
        image.set_index(&[1, 1]).unwrap_err(),
        PolyImageError::ShapeMismatch {
            parameter: "index",
            expected: 3,
            got: 2,
        }
    );
    assert_eq!(image.index(), vec![-2, 5, 0]);
}

#[test]
fn clone_is_a_deep_copy() {
    let mut typed = TypedImage::<f32, 2>::new([2, 2], 0).unwrap();
    typed.pixel_mut([1, 0]).unwrap()[0] = 1.5;
    let original = Image::from(typed);

    let mut copy = original.clone();
    copy.as_typed_mut::<f32, 2>().unwrap().pixel_mut([1, 0]).unwrap()[0] = 9.0;

    assert_eq!(original.pixel_as_f64(&[1, 0]).unwrap(), vec![1.5]);
    assert_eq!(copy.pixel_as_f64(&[1, 0]).unwrap(), vec![9.0]);
}

#[test]
fn pixel_access_reports_out_of_bounds() {
    let image = Image::new(&[2, 3], ValueTypeTag::UInt16).unwrap();
    assert_eq!(
        image.pixel_as_f64(&[2, 0]).unwrap_err(),
        PolyImageError::IndexOutOfBounds {
            index: vec![2, 0],
            size: vec![2, 3],
        }
    );
    assert!(image.pixel_as_f64(&[0, 0, 0]).is_err());
}

#[test]
fn images_can_be_read_concurrently() {
    let image = Image::new(&[8, 8], ValueTypeTag::Float64).unwrap();
    std::thread::scope(|scope| {
        for y in 0..4 {
            let image = &image;
            scope.spawn(move || {
                assert_eq!(image.pixel_as_f64(&[0, y]).unwrap(), vec![0.0]);
            });
        }
    });
}
