use crate::error::{ErrorKind, PottsError};
use crate::state::{CellRecord, CellState, CellTable, MEDIUM, MEDIUM_DESIRED_VOLUME};

fn two_group_table() -> CellTable {
    let state = CellState::new(&["Epithelial", "Mesenchymal"], &[30, 20], &[2, 3])
        .expect("state");
    CellTable::from_state(&state, 2, 100)
}

#[test]
fn groups_expand_into_typed_rows() {
    let table = two_group_table();
    assert_eq!(table.rows(), 6);
    assert_eq!(table.cell_count(), 5);
    assert_eq!(table.type_count(), 2);
    assert_eq!(table.distinct_types(), 2);

    assert_eq!(table.name(0), "Medium");
    assert_eq!(table.type_id(0), MEDIUM);
    assert_eq!(table.desired_volume(0), MEDIUM_DESIRED_VOLUME);
    // Nothing placed yet: the medium owns the whole lattice.
    assert_eq!(table.volume(0), 100);

    assert_eq!(table.name(1), "Epithelial");
    assert_eq!(table.type_id(2), 1);
    assert_eq!(table.desired_volume(2), 30);
    assert_eq!(table.name(3), "Mesenchymal");
    assert_eq!(table.type_id(5), 2);
    assert_eq!(table.desired_volume(5), 20);
}

#[test]
fn single_name_broadcasts_across_groups() {
    let state = CellState::new(&["Cell"], &[10, 40], &[1, 2]).expect("state");
    let table = CellTable::from_state(&state, 2, 64);
    assert_eq!(table.name(1), "Cell");
    assert_eq!(table.name(3), "Cell");
    assert_eq!(table.type_id(1), 1);
    assert_eq!(table.type_id(3), 2);
    assert_eq!(table.desired_volume(3), 40);
}

#[test]
fn group_arity_is_checked() {
    let err = CellState::new(&["A", "B", "C"], &[10], &[1, 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(matches!(err, PottsError::GroupArity { what: "name", .. }));

    let err = CellState::new(&["A"], &[10], &[]).unwrap_err();
    assert!(matches!(err, PottsError::GroupArity { .. }));

    let state = CellState::new(&["A"], &[10], &[2]).expect("state");
    let err = state.with_positions(vec![vec![1.0, 1.0]]).unwrap_err();
    assert!(matches!(err, PottsError::GroupArity { what: "position", .. }));
}

#[test]
fn named_columns_read_and_write() {
    let state = CellState::new(&["A"], &[10], &[1])
        .expect("state")
        .with_column("stiffness", &[2.5])
        .expect("column");
    let mut table = CellTable::from_state(&state, 2, 25);

    assert_eq!(table.get(1, "desired_volume").expect("get"), 10.0);
    assert_eq!(table.get(1, "stiffness").expect("get"), 2.5);
    assert_eq!(table.get(0, "stiffness").expect("get"), 0.0);

    table.set(1, "desired_volume", 12.0).expect("set");
    assert_eq!(table.desired_volume(1), 12);
    table.set(1, "stiffness", 3.0).expect("set");
    assert_eq!(table.extra_column("stiffness").expect("column")[1], 3.0);

    let err = table.set(1, "volume", 5.0).unwrap_err();
    assert!(matches!(err, PottsError::ReadOnlyColumn { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);

    let err = table.get(1, "no_such").unwrap_err();
    assert!(matches!(err, PottsError::NoSuchColumn { .. }));

    let err = table.get(9, "volume").unwrap_err();
    assert!(matches!(err, PottsError::NoSuchCell { cell: 9 }));
}

#[test]
fn add_and_remove_cells() {
    let mut table = two_group_table();
    let id = table.add_cell(CellRecord {
        name: "Extra".into(),
        type_id: 2,
        desired_volume: 15,
        desired_perimeter: 0,
    });
    assert_eq!(id, 6);
    assert_eq!(table.volume(id), 0);
    assert_eq!(table.rows(), 7);

    // Empty cells can go; occupied ones cannot.
    table.remove_cell(id).expect("remove empty cell");
    assert_eq!(table.rows(), 6);

    table.bump_volume(2, 4);
    let err = table.remove_cell(2).unwrap_err();
    assert!(matches!(err, PottsError::RemoveNonEmpty { cell: 2, volume: 4 }));
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn iter_cells_skips_medium() {
    let table = two_group_table();
    let rows: Vec<u32> = table.iter_cells().map(|row| row.id).collect();
    assert_eq!(rows, vec![1, 2, 3, 4, 5]);
    assert!(table.iter_cells().all(|row| row.type_id != MEDIUM));
}
