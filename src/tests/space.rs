use crate::error::{ErrorKind, PottsError};
use crate::space::{CellSpace, Neighborhood, Periodicity, MAX_DIMS};

#[test]
fn von_neumann_interior_degree() {
    let space = CellSpace::new(&[5, 5], false, Neighborhood::VonNeumann).expect("space");
    let center = space.vertex_at(&[2, 2]).expect("center");
    assert_eq!(space.degree(center), 4);

    let space3 = CellSpace::new(&[5, 5, 5], false, Neighborhood::VonNeumann).expect("space");
    let center3 = space3.vertex_at(&[2, 2, 2]).expect("center");
    assert_eq!(space3.degree(center3), 6);
}

#[test]
fn moore_interior_degree() {
    let space = CellSpace::new(&[5, 5], false, Neighborhood::Moore).expect("space");
    let center = space.vertex_at(&[2, 2]).expect("center");
    assert_eq!(space.degree(center), 8);

    let space3 = CellSpace::new(&[5, 5, 5], false, Neighborhood::Moore).expect("space");
    let center3 = space3.vertex_at(&[2, 2, 2]).expect("center");
    assert_eq!(space3.degree(center3), 26);
}

#[test]
fn clamped_corners_lose_neighbors() {
    // Non-periodic axes omit out-of-grid neighbors: corner and edge vertices
    // have strictly smaller degree than the interior.
    let vn = CellSpace::new(&[4, 4], false, Neighborhood::VonNeumann).expect("space");
    let corner = vn.vertex_at(&[0, 0]).expect("corner");
    let edge = vn.vertex_at(&[0, 2]).expect("edge");
    assert_eq!(vn.degree(corner), 2);
    assert_eq!(vn.degree(edge), 3);

    let moore = CellSpace::new(&[4, 4], false, Neighborhood::Moore).expect("space");
    let corner = moore.vertex_at(&[0, 0]).expect("corner");
    assert_eq!(moore.degree(corner), 3);
}

#[test]
fn periodic_axis_wraps() {
    let space = CellSpace::new(&[4], true, Neighborhood::VonNeumann).expect("space");
    assert_eq!(space.neighbors(0), &[1, 3]);
    assert_eq!(space.neighbors(3), &[0, 2]);
    assert_eq!(space.edge_count(), 4);
    assert!(space.is_periodic(0));
}

#[test]
fn mixed_periodicity_is_per_axis() {
    let space = CellSpace::new(
        &[4, 4],
        Periodicity::PerAxis(vec![true, false]),
        Neighborhood::VonNeumann,
    )
    .expect("space");
    let corner = space.vertex_at(&[0, 0]).expect("corner");
    // Wraps along axis 0, clamped along axis 1.
    assert_eq!(space.degree(corner), 3);
    assert!(space.is_periodic(0));
    assert!(!space.is_periodic(1));
}

#[test]
fn degenerate_wraps_stay_simple() {
    // Extent 2 with wrap reaches the same vertex from both sides; extent 1
    // wraps onto itself. Neither may produce duplicates or self loops.
    let two = CellSpace::new(&[2], true, Neighborhood::VonNeumann).expect("space");
    assert_eq!(two.neighbors(0), &[1]);
    assert_eq!(two.edge_count(), 1);

    let one = CellSpace::new(&[1], true, Neighborhood::VonNeumann).expect("space");
    assert_eq!(one.neighbors(0), &[] as &[u32]);
    assert_eq!(one.edge_count(), 0);
}

#[test]
fn edges_are_reported_once() {
    let space = CellSpace::new(&[3, 3], false, Neighborhood::VonNeumann).expect("space");
    let edges: Vec<(u32, u32)> = space.edges().collect();
    assert_eq!(edges.len(), 12);
    assert_eq!(edges.len(), space.edge_count());
    assert!(edges.iter().all(|&(u, w)| u < w));
}

#[test]
fn coords_round_trip() {
    let space = CellSpace::new(&[3, 4, 5], false, Neighborhood::VonNeumann).expect("space");
    let mut coords = [0usize; MAX_DIMS];
    for v in 0..space.vertex_count() {
        space.coords_into(v, &mut coords);
        assert_eq!(space.vertex_at(&coords[..3]), Some(v));
    }
    assert_eq!(space.vertex_at(&[3, 0, 0]), None);
    assert_eq!(space.vertex_at(&[0, 0]), None);
}

#[test]
fn invalid_shapes_are_configuration_errors() {
    let empty = CellSpace::new(&[], false, Neighborhood::Moore).unwrap_err();
    assert_eq!(empty.kind(), ErrorKind::Configuration);

    let zero = CellSpace::new(&[4, 0], false, Neighborhood::Moore).unwrap_err();
    assert_eq!(zero.kind(), ErrorKind::Configuration);

    let deep = CellSpace::new(&[2; 9], false, Neighborhood::Moore).unwrap_err();
    assert!(matches!(deep, PottsError::BadShape { .. }));

    let arity = CellSpace::new(
        &[4, 4],
        Periodicity::PerAxis(vec![true]),
        Neighborhood::Moore,
    )
    .unwrap_err();
    assert!(matches!(arity, PottsError::PeriodicityArity { got: 1, expected: 2 }));
}
