//! Integration tests for the basic scheme.

use std::ops::ControlFlow;

use voxthin::*;

fn object_in(size: IVec3, points: impl IntoIterator<Item = IVec3>) -> DigitalObject {
    let domain = VoxelDomain::from_size(size).expect("domain");
    DigitalObject::from_points(domain, DigitalTopology::Adj26_6, points).expect("points")
}

fn filled_cube(side: i32) -> DigitalObject {
    let cube = VoxelDomain::new(IVec3::ONE, IVec3::splat(side)).expect("cube");
    object_in(IVec3::splat(side + 2), cube.points())
}

fn basic_run(object: &mut DigitalObject) -> RunReport {
    ThinningScheme::basic(GeometricSimplicity::default())
        .run(object)
        .expect("run")
}

#[test]
fn cube_of_27_thins_to_a_small_core() {
    let mut object = filled_cube(3);
    let report = basic_run(&mut object);

    assert!(report.finished);
    assert!(!object.is_empty());
    assert!(object.len() <= 8, "left {} points", object.len());
    assert_eq!(object.connected_components(), 1);
    assert_eq!(report.removed + report.remaining, 27);
}

#[test]
fn five_cube_stays_connected_and_non_empty() {
    let mut object = filled_cube(5);
    basic_run(&mut object);
    assert!(!object.is_empty());
    assert_eq!(object.connected_components(), 1);
}

#[test]
fn empty_object_is_a_fixed_point() {
    let mut object = object_in(IVec3::splat(3), []);
    let mut scheme = ThinningScheme::basic(GeometricSimplicity::default());

    let round = scheme.one_step(&mut object).expect("step");
    assert_eq!(round.removed, 0);
    assert!(round.finished);
    assert!(object.is_empty());

    let report = scheme.run(&mut object).expect("run");
    assert_eq!(report.rounds, 0);
    assert!(report.finished);
}

#[test]
fn one_more_round_after_the_fixed_point_removes_nothing() {
    let mut object = filled_cube(4);
    let mut scheme = ThinningScheme::basic(GeometricSimplicity::default());
    scheme.run(&mut object).expect("run");
    let before = object.clone();

    let extra = scheme.one_step(&mut object).expect("step");
    assert_eq!(extra.removed, 0);
    assert_eq!(object, before);
}

#[test]
fn rounds_never_grow_the_object() {
    let mut object = filled_cube(5);
    let mut sizes = vec![object.len()];
    ThinningScheme::basic(GeometricSimplicity::default())
        .run_with(&mut object, |round| {
            sizes.push(round.remaining);
            ControlFlow::Continue(())
        })
        .expect("run");
    assert!(sizes.windows(2).all(|w| w[1] <= w[0]), "{sizes:?}");
}

#[test]
fn cycle_without_simple_points_is_unchanged() {
    // Four points around an empty center: each joins two non-adjacent
    // neighbors, so none is simple.
    let c = IVec3::splat(2);
    let diamond = [IVec3::X, IVec3::NEG_X, IVec3::Y, IVec3::NEG_Y].map(|d| c + d);
    let mut object = object_in(IVec3::splat(5), diamond);
    let original = object.clone();

    let report = basic_run(&mut object);
    assert_eq!(report.rounds, 1);
    assert_eq!(report.removed, 0);
    assert_eq!(object, original);

    let distance = DistanceField::compute(&object);
    let isthmus = GeometricIsthmus::new(IsthmusMode::Full, object.topology());
    let report =
        ThinningScheme::critical_kernel(GeometricSimplicity::default(), isthmus, distance, 3)
            .run(&mut object)
            .expect("run");
    assert_eq!(report.removed, 0);
    assert_eq!(object, original);
}

#[test]
fn tunnel_survives_thinning() {
    // A 5x5 plate with its center punched out.
    let plate: Vec<IVec3> = (1..=5)
        .flat_map(|y| (1..=5).map(move |x| IVec3::new(x, y, 1)))
        .filter(|p| *p != IVec3::new(3, 3, 1))
        .collect();
    let mut object = object_in(IVec3::new(7, 7, 3), plate);
    basic_run(&mut object);

    assert!(object.len() >= 4, "left {:?}", object.to_points());
    assert_eq!(object.connected_components(), 1);
    assert!(!object.contains(IVec3::new(3, 3, 1)));
}

#[test]
fn thresholded_volume_thins_in_place() {
    // A solid 4x4x4 block of value 200 in a 6x6x6 volume of zeros.
    let domain = VoxelDomain::from_size(IVec3::splat(6)).expect("domain");
    let values: Vec<u8> = domain
        .points()
        .map(|p| if p.min_element() >= 1 && p.max_element() <= 4 { 200 } else { 0 })
        .collect();
    let mut object = DigitalObject::from_threshold(
        domain,
        DigitalTopology::Adj26_6,
        &values,
        Threshold::default(),
    )
    .expect("threshold");
    assert_eq!(object.len(), 64);

    let report = skeletonize(&mut object, &ThinningOptions::basic()).expect("skeletonize");
    assert!(report.finished);
    assert_eq!(object.connected_components(), 1);

    // The backing grid tracks every removal.
    let occupied = object.mask().iter().filter(|v| **v).count();
    assert_eq!(occupied, object.len());
}

#[test]
fn six_connected_objects_keep_their_components() {
    let domain = VoxelDomain::from_size(IVec3::new(6, 4, 4)).expect("domain");
    // Two blocks touching only along an edge: two 6-components.
    let a = VoxelDomain::new(IVec3::ZERO, IVec3::new(1, 1, 3)).expect("a");
    let b = VoxelDomain::new(IVec3::new(2, 2, 0), IVec3::new(3, 3, 3)).expect("b");
    let points = a.points().chain(b.points());
    let mut object =
        DigitalObject::from_points(domain, DigitalTopology::Adj6_26, points).expect("points");
    assert_eq!(object.connected_components(), 2);

    ThinningScheme::basic(GeometricSimplicity::new(DigitalTopology::Adj6_26))
        .run(&mut object)
        .expect("run");
    assert_eq!(object.connected_components(), 2);
}

#[test]
fn empty_lookup_table_freezes_the_object() {
    let table = LookupTable::from_bytes(&vec![0u8; TABLE_BYTES]).expect("table");
    let mut object = filled_cube(3);
    let report = ThinningScheme::basic(&table).run(&mut object).expect("run");
    assert_eq!(report.removed, 0);
    assert_eq!(object.len(), 27);
}

/// Thins a larger ball; slow in debug builds, run with `cargo test -- --ignored`.
#[test]
#[ignore]
fn large_ball_thins_to_a_connected_core() {
    let r = 12;
    let center = IVec3::splat(r + 1);
    let domain = VoxelDomain::from_size(IVec3::splat(2 * r + 3)).expect("domain");
    let ball: Vec<IVec3> = domain
        .points()
        .filter(|p| (*p - center).length_squared() <= r * r)
        .collect();
    let mut object = object_in(domain.extent(), ball);
    basic_run(&mut object);
    assert_eq!(object.connected_components(), 1);
}
