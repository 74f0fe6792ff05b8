/// Differential-adhesion cell sorting: two cell types that prefer their own
/// kind unmix from a random initial arrangement.
pub fn run() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::engine::CellPotts;
    use crate::error::PottsError;
    use crate::penalties::{AdhesionPenalty, Penalty, VolumePenalty};
    use crate::space::{CellSpace, Neighborhood};
    use crate::state::CellState;

    const SIZE: usize = 100;
    let mut rng = SmallRng::from_os_rng();
    let seeds: Vec<u64> = (0..4).map(|_| rng.random()).collect();

    let output_path = std::path::Path::new("output/cell_sorting");
    let steps = 250;

    let build = |seed: u64| -> Result<CellPotts, PottsError> {
        let space = CellSpace::new(&[SIZE, SIZE], true, Neighborhood::Moore)?;
        let state = CellState::new(&["Dark", "Light"], &[60, 60], &[20, 20])?;
        // Heterotypic contacts cost more than homotypic ones.
        let adhesion =
            AdhesionPenalty::new(&[vec![0, 16, 16], vec![16, 2, 11], vec![16, 11, 2]])?;
        CellPotts::seeded(
            space,
            state,
            vec![
                Penalty::Adhesion(adhesion),
                Penalty::Volume(VolumePenalty::new(&[25, 25])),
            ],
            seed,
        )
    };

    if let Err(err) = crate::tasks::ensemble::run(build, &seeds, steps, Some(output_path)) {
        eprintln!("cell_sorting failed: {err}");
        std::process::exit(1);
    }
}
