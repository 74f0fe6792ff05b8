use crate::engine::CellPotts;
use crate::error::{ErrorKind, PottsError};
use crate::penalties::{AdhesionPenalty, Penalty, PerimeterPenalty, VolumePenalty};
use crate::space::{CellSpace, ConnectivityGuard, Neighborhood};
use crate::state::CellState;

fn sorting_sim(seed: u64) -> CellPotts {
    let space = CellSpace::new(&[20, 20], true, Neighborhood::Moore).expect("space");
    let state = CellState::new(&["Cell"], &[30], &[3])
        .expect("state")
        .with_desired_perimeters(&[40])
        .expect("perimeters");
    CellPotts::seeded(
        space,
        state,
        vec![
            Penalty::Adhesion(AdhesionPenalty::new(&[vec![0, 8], vec![8, 4]]).expect("adhesion")),
            Penalty::Volume(VolumePenalty::new(&[5])),
            Penalty::Perimeter(PerimeterPenalty::new(&[1])),
        ],
        seed,
    )
    .expect("simulation")
}

#[test]
fn dumbbell_bridge_is_an_articulation_vertex() {
    // Two 2x3 blobs joined by a one-wide bridge along y = 1; vertex (x, y)
    // is 3x + y.
    let mut space = CellSpace::new(&[7, 3], false, Neighborhood::VonNeumann).expect("space");
    let cell: Vec<usize> = vec![0, 1, 2, 3, 4, 5, 7, 10, 13, 15, 16, 17, 18, 19, 20];
    for &v in &cell {
        space.set(v, 1, 1);
    }

    let mut guard = ConnectivityGuard::new(space.vertex_count());
    // Removing the middle of the bridge would split the cell: deterministic
    // rejection, no randomness involved.
    assert!(!guard.stays_connected(&space, 10, 1));
    assert!(!guard.stays_connected(&space, 7, 1));
    // A blob corner is redundant.
    assert!(guard.stays_connected(&space, 0, 1));
    assert!(guard.stays_connected(&space, 17, 1));
}

#[test]
fn invariants_hold_along_a_run() {
    let mut sim = sorting_sim(11);
    sim.verify_invariants().expect("invariants after placement");
    let completed = sim.run_while(30, |s| {
        s.verify_invariants().expect("invariants during run");
        let cells: i64 = (1..=s.count_cells() as u32)
            .map(|id| s.table().volume(id))
            .sum();
        assert_eq!(
            s.table().volume(0) + cells,
            s.space().vertex_count() as i64
        );
        true
    });
    assert_eq!(completed, 30);
    assert!(sim.stats().committed > 0);
}

#[test]
fn same_seed_reproduces_the_run() {
    let mut a = sorting_sim(42);
    let mut b = sorting_sim(42);
    a.run(15);
    b.run(15);
    assert_eq!(a.array_ids(), b.array_ids());
    assert_eq!(a.array_types(), b.array_types());
    assert_eq!(a.stats().committed, b.stats().committed);
    assert_eq!(a.stats().rejected_energy, b.stats().rejected_energy);
}

#[test]
fn medium_only_attempts_always_fail_fast() {
    let space = CellSpace::new(&[8, 8], true, Neighborhood::VonNeumann).expect("space");
    let state = CellState::new(&["Ghost"], &[10], &[0]).expect("state");
    let mut sim = CellPotts::seeded(space, state, vec![], 3).expect("simulation");
    for _ in 0..200 {
        assert!(!sim.mh_step());
        assert!(!sim.last_attempt().success);
    }
    let stats = sim.stats();
    assert_eq!(stats.attempts, 200);
    assert_eq!(stats.rejected_identity, 200);
    assert_eq!(stats.committed, 0);
}

#[test]
fn wrapped_and_interior_cells_have_equal_perimeter() {
    // The same 2x2 block, once across the periodic seam and once in the
    // middle of the grid, must report the same boundary-edge count.
    let paint = |vertices: &[(usize, usize)]| -> i64 {
        let space = CellSpace::new(&[8, 8], true, Neighborhood::VonNeumann).expect("space");
        let state = CellState::new(&["Block"], &[4], &[1]).expect("state");
        let mut sim = CellPotts::seeded(space, state, vec![], 5).expect("simulation");
        for v in 0..sim.space().vertex_count() {
            sim.set_node(v, 0).expect("clear");
        }
        for &(x, y) in vertices {
            let v = sim.space().vertex_at(&[x, y]).expect("vertex");
            sim.set_node(v, 1).expect("paint");
        }
        sim.verify_invariants().expect("painted block is consistent");
        sim.table().perimeter(1)
    };

    let seam = paint(&[(7, 0), (7, 1), (0, 0), (0, 1)]);
    let interior = paint(&[(3, 3), (3, 4), (4, 3), (4, 4)]);
    assert_eq!(seam, interior);
    assert_eq!(seam, 8);
}

#[test]
fn observer_cancels_between_model_steps() {
    let mut sim = sorting_sim(9);
    let completed = sim.run_while(100, |s| s.step() < 5);
    assert_eq!(completed, 5);
    assert_eq!(sim.step(), 5);
}

#[test]
fn remove_cell_renumbers_the_lattice() {
    let space = CellSpace::new(&[12, 12], false, Neighborhood::Moore).expect("space");
    let state = CellState::new(&["Cell"], &[12], &[2]).expect("state");
    let mut sim = CellPotts::seeded(space, state, vec![], 21).expect("simulation");

    // Empty cell 1 by hand, then drop its row: cell 2 becomes cell 1.
    let owned: Vec<usize> = (0..sim.space().vertex_count())
        .filter(|&v| sim.space().node_id(v) == 1)
        .collect();
    for v in owned {
        sim.set_node(v, 0).expect("clear");
    }
    let survivor_volume = sim.table().volume(2);
    sim.remove_cell(1).expect("remove empty cell");

    assert_eq!(sim.count_cells(), 1);
    assert_eq!(sim.table().volume(1), survivor_volume);
    sim.verify_invariants().expect("renumbered lattice is consistent");

    sim.set_recording(true);
    let err = sim.remove_cell(1).unwrap_err();
    assert!(matches!(err, PottsError::RemoveWhileRecording { .. }));
}

#[test]
fn positions_seed_cells_where_requested() {
    let space = CellSpace::new(&[20, 20], false, Neighborhood::Moore).expect("space");
    let state = CellState::new(&["Cell"], &[25], &[2])
        .expect("state")
        .with_positions(vec![vec![5.0, 5.0], vec![14.0, 14.0]])
        .expect("positions");
    let sim = CellPotts::seeded(space, state, vec![], 77).expect("simulation");

    let near = |id: u32, x: f64, y: f64| {
        let centroid = sim.table().position(id).expect("centroid");
        (centroid[0] - x).abs() < 4.0 && (centroid[1] - y).abs() < 4.0
    };
    assert_eq!(sim.table().volume(1), 25);
    assert_eq!(sim.table().volume(2), 25);
    assert!(near(1, 5.0, 5.0));
    assert!(near(2, 14.0, 14.0));
    sim.verify_invariants().expect("placement is consistent");
}

#[test]
fn placement_errors_are_eager() {
    let space = CellSpace::new(&[5, 5], false, Neighborhood::Moore).expect("space");
    let state = CellState::new(&["Cell"], &[20], &[2]).expect("state");
    let err = CellPotts::seeded(space, state, vec![], 1).unwrap_err();
    assert!(matches!(err, PottsError::InsufficientCapacity { needed: 40, capacity: 25 }));
    assert_eq!(err.kind(), ErrorKind::Placement);

    let space = CellSpace::new(&[20, 20], false, Neighborhood::Moore).expect("space");
    let state = CellState::new(&["Cell"], &[10], &[1])
        .expect("state")
        .with_positions(vec![vec![30.0, 5.0]])
        .expect("positions");
    let err = CellPotts::seeded(space, state, vec![], 1).unwrap_err();
    assert!(matches!(err, PottsError::SeedOutOfRange { .. }));
}

#[test]
fn growth_can_saturate_the_whole_lattice() {
    let space = CellSpace::new(&[6, 6], false, Neighborhood::VonNeumann).expect("space");
    let state = CellState::new(&["Greedy"], &[36], &[1]).expect("state");
    let sim = CellPotts::seeded(space, state, vec![], 2).expect("simulation");
    assert_eq!(sim.table().volume(1), 36);
    assert_eq!(sim.table().volume(0), 0);
    sim.verify_invariants().expect("saturated lattice is consistent");
}

#[test]
fn single_vertex_lattice_has_no_moves() {
    let space = CellSpace::new(&[1], false, Neighborhood::VonNeumann).expect("space");
    let state = CellState::new(&["Lonely"], &[1], &[1]).expect("state");
    let mut sim = CellPotts::seeded(space, state, vec![], 8).expect("simulation");
    for _ in 0..10 {
        assert!(!sim.mh_step());
    }
    assert_eq!(sim.stats().rejected_identity, 10);
}
