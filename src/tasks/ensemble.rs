/// ==============================================================================================
/// ================================== Multi-Seed Ensemble Runner ================================
/// ==============================================================================================
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::engine::CellPotts;
use crate::error::PottsError;

/// Run one configuration across many seeds in parallel.
///     Inputs:
///         - `build`: constructs a fresh simulation for a seed (typically a
///           thin wrapper around `CellPotts::seeded`)
///         - `seeds`: one independent simulation per entry
///         - `steps`: model steps per simulation
///         - `output_path`: when set, each run records its history and saves
///           it to `{output_path}/{seed}.json`
///     Returns the finished simulations in seed order.
///
/// Simulations share no mutable state, so the pool runs them fully
/// independently; a shared chemotaxis field would have to be guarded by the
/// caller.
pub fn run(
    build: impl Fn(u64) -> Result<CellPotts, PottsError> + Sync,
    seeds: &[u64],
    steps: u64,
    output_path: Option<&Path>,
) -> Result<Vec<CellPotts>> {
    let pb = ProgressBar::new(seeds.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message(format!("ensemble of {}", seeds.len()));

    let finished = seeds
        .par_iter()
        .map(|&seed| {
            let mut sim = build(seed)
                .with_context(|| format!("ensemble: build simulation for seed {seed}"))?;
            if output_path.is_some() {
                sim.set_recording(true);
            }
            sim.run(steps);
            if let Some(dir) = output_path {
                let file = dir.join(format!("{seed}.json"));
                sim.history()
                    .save(&file)
                    .with_context(|| format!("ensemble: save history for seed {seed}"))?;
            }
            pb.inc(1);
            Ok(sim)
        })
        .collect::<Result<Vec<_>>>()?;

    pb.finish_and_clear();
    Ok(finished)
}
