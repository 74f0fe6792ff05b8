/// ==============================================================================================
/// ===================================== Attempt Loop ===========================================
/// ==============================================================================================
use rand::Rng;
use tracing::debug;

use super::{CellPotts, StepInfo};
use crate::space::MAX_DIMS;
use crate::state::MEDIUM;

impl CellPotts {
    /// One Metropolis attempt. Returns whether a copy was committed.
    ///
    /// Draws a target vertex uniformly and a source uniformly from the
    /// target's neighbors, rejects identity and fragmenting copies, sums the
    /// penalty deltas, and applies the Boltzmann acceptance rule. A committed
    /// copy updates the lattice, the derived table columns, the penalty
    /// auxiliaries, and (when recording) the history, in that order.
    pub fn mh_step(&mut self) -> bool {
        self.stats.attempts += 1;
        self.info.success = false;

        let vertex_count = self.space.vertex_count();
        let target = self.rng.random_range(0..vertex_count);
        let degree = self.space.degree(target);
        if degree == 0 {
            self.stats.rejected_identity += 1;
            return false;
        }
        let pick = self.rng.random_range(0..degree);
        let source = self.space.neighbors(target)[pick] as usize;

        if self.space.node_id(source) == self.space.node_id(target) {
            self.stats.rejected_identity += 1;
            return false;
        }
        self.info = StepInfo::for_copy(&self.space, source, target, self.step);

        // Removing the target from a real cell must not fragment it, and a
        // cell is never allowed to lose its last vertex.
        if self.info.target_id != MEDIUM {
            if self.table.volume(self.info.target_id) <= 1 {
                self.stats.rejected_last_vertex += 1;
                return false;
            }
            if !self
                .guard
                .stays_connected(&self.space, target, self.info.target_id)
            {
                self.stats.rejected_connectivity += 1;
                return false;
            }
        }

        let mut dh = 0i64;
        for penalty in &self.penalties {
            dh = dh.saturating_add(penalty.delta_h(&self.space, &self.table, &self.info));
        }

        let accept = dh <= 0 || {
            self.temperature > 0.0
                && self.rng.random::<f64>() < (-(dh as f64) / self.temperature).exp()
        };
        if !accept {
            self.stats.rejected_energy += 1;
            return false;
        }

        self.commit(dh);
        true
    }

    fn commit(&mut self, dh: i64) {
        let info = self.info;
        self.space.set(info.target, info.source_id, info.source_type);

        self.table.bump_volume(info.source_id, 1);
        self.table.bump_volume(info.target_id, -1);
        self.table.bump_perimeter(info.source_id, info.perim_delta_source);
        self.table.bump_perimeter(info.target_id, info.perim_delta_target);

        let mut coords = [0usize; MAX_DIMS];
        self.space.coords_into(info.target, &mut coords);
        self.table.shift_centroid(info.source_id, &coords, 1.0);
        self.table.shift_centroid(info.target_id, &coords, -1.0);

        for penalty in &mut self.penalties {
            penalty.on_commit(&info);
        }

        if self.recording {
            self.history.record(
                info.step,
                info.target as u32,
                info.source_id,
                info.source_type,
                dh,
            );
        }

        self.stats.committed += 1;
        self.info.success = true;
    }

    /// One model step: V attempts, then the step counter, then the penalty
    /// tick callbacks (strictly after all attempts of the step).
    pub fn model_step(&mut self) {
        for _ in 0..self.space.vertex_count() {
            self.mh_step();
        }
        self.step += 1;
        for penalty in &mut self.penalties {
            penalty.on_tick();
        }
    }

    /// Run `steps` model steps to completion.
    pub fn run(&mut self, steps: u64) {
        self.run_while(steps, |_| true);
    }

    /// Run up to `steps` model steps, consulting `observer` between steps.
    /// Returning false cancels the run; this is also where external
    /// collaborators (reaction-diffusion fields, per-cell dynamics) read the
    /// arrays and advance their own state. Returns the steps completed.
    pub fn run_while(&mut self, steps: u64, mut observer: impl FnMut(&Self) -> bool) -> u64 {
        debug!(steps, step = self.step, "run started");
        for done in 0..steps {
            self.model_step();
            if !observer(self) {
                debug!(done = done + 1, "run cancelled by observer");
                return done + 1;
            }
        }
        debug!(steps, step = self.step, "run finished");
        steps
    }
}
