/// Act-model migration: a single cell with an activity memory develops a
/// leading edge and performs a persistent random walk.
pub fn run() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::engine::CellPotts;
    use crate::error::PottsError;
    use crate::penalties::{AdhesionPenalty, MigrationPenalty, Penalty, VolumePenalty};
    use crate::space::{CellSpace, Neighborhood};
    use crate::state::CellState;

    const SIZE: usize = 50;
    let mut rng = SmallRng::from_os_rng();
    let seeds: Vec<u64> = (0..8).map(|_| rng.random()).collect();

    let output_path = std::path::Path::new("output/migration");
    let steps = 1000;

    let build = |seed: u64| -> Result<CellPotts, PottsError> {
        let space = CellSpace::new(&[SIZE, SIZE], true, Neighborhood::Moore)?;
        let state = CellState::new(&["Walker"], &[200], &[1])?;
        CellPotts::seeded(
            space,
            state,
            vec![
                Penalty::Adhesion(AdhesionPenalty::new(&[vec![0, 20], vec![20, 0]])?),
                Penalty::Volume(VolumePenalty::new(&[50])),
                Penalty::Migration(MigrationPenalty::new(20, &[200], &[SIZE, SIZE])?),
            ],
            seed,
        )
    };

    if let Err(err) = crate::tasks::ensemble::run(build, &seeds, steps, Some(output_path)) {
        eprintln!("migration failed: {err}");
        std::process::exit(1);
    }
}
