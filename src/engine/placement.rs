/// ==============================================================================================
/// ================================ Deterministic Seed-And-Grow =================================
/// ==============================================================================================
use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::PottsError;
use crate::space::CellSpace;
use crate::state::{CellTable, MEDIUM};

/// Seed every cell on the lattice and grow the seeds toward their desired
/// volumes.
///
/// With a positions column, seeds land on the free vertex nearest each
/// centroid; otherwise seeds are drawn uniformly from the free vertices.
/// Growth is round-robin, one vertex per cell per round, claiming free
/// neighbors in CSR order: blobs stay compact, connected, and reproducible
/// for a given RNG state. Growth stops when desired volumes are met or the
/// space saturates.
pub(super) fn place_cells(
    space: &mut CellSpace,
    table: &CellTable,
    positions: Option<&[Vec<f64>]>,
    rng: &mut ChaCha8Rng,
) -> Result<(), PottsError> {
    let vertex_count = space.vertex_count();
    let cells = table.cell_count();
    if cells == 0 {
        return Ok(());
    }

    // Every cell needs at least its seed vertex.
    let needed = table
        .iter_cells()
        .fold(0i64, |acc, row| acc.saturating_add(row.desired_volume.max(1)));
    if needed > vertex_count as i64 {
        return Err(PottsError::InsufficientCapacity {
            needed,
            capacity: vertex_count,
        });
    }

    let seeds = match positions {
        Some(positions) => seeds_from_positions(space, positions)?,
        None => random_seeds(space, cells, rng),
    };

    // Claim seeds, then grow round-robin: queues hold claimed vertices whose
    // neighborhoods may still contain free vertices.
    let mut volumes = vec![0i64; cells + 1];
    let mut frontiers: Vec<VecDeque<u32>> = vec![VecDeque::new(); cells + 1];
    for (index, &seed) in seeds.iter().enumerate() {
        let id = index as u32 + 1;
        space.set(seed, id, table.type_id(id));
        volumes[id as usize] = 1;
        frontiers[id as usize].push_back(seed as u32);
    }

    loop {
        let mut grew = false;
        for id in 1..=cells {
            if volumes[id] >= table.desired_volume(id as u32) {
                continue;
            }
            while let Some(&front) = frontiers[id].front() {
                let free = space
                    .neighbors(front as usize)
                    .iter()
                    .copied()
                    .find(|&w| space.node_id(w as usize) == MEDIUM);
                match free {
                    Some(w) => {
                        space.set(w as usize, id as u32, table.type_id(id as u32));
                        volumes[id] += 1;
                        frontiers[id].push_back(w);
                        grew = true;
                        break;
                    }
                    None => {
                        frontiers[id].pop_front();
                    }
                }
            }
        }
        if !grew {
            break;
        }
    }

    debug!(
        placed = volumes.iter().skip(1).sum::<i64>(),
        cells, "seed-and-grow placement finished"
    );
    Ok(())
}

// Nearest in-range vertex for each requested centroid; when it is already
// taken, walk outward in breadth-first order to the closest free one.
fn seeds_from_positions(
    space: &CellSpace,
    positions: &[Vec<f64>],
) -> Result<Vec<usize>, PottsError> {
    let mut seeds = Vec::with_capacity(positions.len());
    let mut taken = vec![false; space.vertex_count()];
    for position in positions {
        if position.len() != space.ndim()
            || position
                .iter()
                .zip(space.shape())
                .any(|(&p, &extent)| !p.is_finite() || p < 0.0 || p >= extent as f64)
        {
            return Err(PottsError::SeedOutOfRange {
                position: position.clone(),
            });
        }
        let coords: Vec<usize> = position
            .iter()
            .zip(space.shape())
            .map(|(&p, &extent)| (p.round() as usize).min(extent - 1))
            .collect();
        let vertex = space
            .vertex_at(&coords)
            .expect("rounded coordinates were range checked");
        let seed = nearest_free(space, &taken, vertex).ok_or_else(|| {
            PottsError::InsufficientCapacity {
                needed: positions.len() as i64,
                capacity: space.vertex_count(),
            }
        })?;
        taken[seed] = true;
        seeds.push(seed);
    }
    Ok(seeds)
}

fn nearest_free(space: &CellSpace, taken: &[bool], start: usize) -> Option<usize> {
    if !taken[start] {
        return Some(start);
    }
    let mut visited = vec![false; space.vertex_count()];
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);
    while let Some(v) = queue.pop_front() {
        for &w in space.neighbors(v) {
            let w = w as usize;
            if visited[w] {
                continue;
            }
            if !taken[w] {
                return Some(w);
            }
            visited[w] = true;
            queue.push_back(w);
        }
    }
    None
}

// Uniform draw without replacement from the free vertices.
fn random_seeds(space: &CellSpace, cells: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut free: Vec<u32> = (0..space.vertex_count() as u32).collect();
    let mut seeds = Vec::with_capacity(cells);
    for _ in 0..cells {
        let pick = rng.random_range(0..free.len());
        seeds.push(free.swap_remove(pick) as usize);
    }
    seeds
}
