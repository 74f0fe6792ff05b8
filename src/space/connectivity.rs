/// ==============================================================================================
/// ================================== Local Connectivity Guard ==================================
/// ==============================================================================================
use super::cell_space::CellSpace;

/// Articulation test around a candidate copy target.
///
/// Overwriting vertex `t` removes it from its current cell; the copy is only
/// admissible if the cell stays connected without `t`. The check is local:
/// the induced subgraph of the cell restricted to the 1- and 2-hop
/// neighborhood of `t` (minus `t` itself) must keep all same-cell direct
/// neighbors of `t` in one component. Only the local region is touched, so
/// the cost is O(|N^2(t)|) per call.
///
/// Scratch arrays are epoch stamped and sized to the vertex count once;
/// nothing is reallocated during a run.
#[derive(Debug, Clone)]
pub struct ConnectivityGuard {
    region: Vec<u64>,   // epoch stamp: vertex belongs to the local induced subgraph
    visited: Vec<u64>,  // epoch stamp: vertex reached by the component walk
    epoch: u64,
    stack: Vec<u32>,    // DFS worklist
    anchors: Vec<u32>,  // same-cell direct neighbors of the target
}

impl ConnectivityGuard {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            region: vec![0; vertex_count],
            visited: vec![0; vertex_count],
            epoch: 0,
            stack: Vec::with_capacity(64),
            anchors: Vec::with_capacity(32),
        }
    }

    /// Whether cell `cell` stays connected after vertex `target` leaves it.
    ///
    /// Callers must have ruled out `cell == 0` (medium never needs to stay
    /// connected) and volume-1 cells (handled by the last-vertex rule).
    pub fn stays_connected(&mut self, space: &CellSpace, target: usize, cell: u32) -> bool {
        self.epoch += 1;
        let epoch = self.epoch;

        // Stamp the cell-restricted region: N(t) and N^2(t), never t itself.
        for &u in space.neighbors(target) {
            let u = u as usize;
            if space.node_id(u) == cell {
                self.region[u] = epoch;
            }
            for &w in space.neighbors(u) {
                let w = w as usize;
                if w != target && space.node_id(w) == cell {
                    self.region[w] = epoch;
                }
            }
        }

        self.anchors.clear();
        for &u in space.neighbors(target) {
            if space.node_id(u as usize) == cell {
                self.anchors.push(u);
            }
        }
        // Zero or one same-cell neighbor: nothing can be split locally.
        if self.anchors.len() <= 1 {
            return true;
        }

        // Walk one component from the first anchor, inside the region only.
        self.stack.clear();
        let start = self.anchors[0];
        self.visited[start as usize] = epoch;
        self.stack.push(start);
        while let Some(x) = self.stack.pop() {
            for &w in space.neighbors(x as usize) {
                let wi = w as usize;
                if self.region[wi] == epoch && self.visited[wi] != epoch {
                    self.visited[wi] = epoch;
                    self.stack.push(w);
                }
            }
        }

        self.anchors
            .iter()
            .all(|&u| self.visited[u as usize] == epoch)
    }
}
