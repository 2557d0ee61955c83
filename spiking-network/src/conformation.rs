//! The dense connectivity matrix ("conformation"), grounded on the conformation
//! assembly in `network/network.py`. Each entry stores `1 - p(edge)`, the
//! per-step transmission-failure probability; the no-edge sentinel is `NaN` in
//! the original's numpy array, tracked here instead by a parallel boolean mask
//! so arithmetic never has to special-case `NaN`.

use nalgebra::DMatrix;

/// A directed, dense `N x N` connectivity matrix between neurons.
#[derive(Debug, Clone)]
pub struct Conformation {
    /// `1 - p(edge)` for every ordered pair; `1.0` where there is no edge.
    values: DMatrix<f32>,
    /// `true` where an edge exists, independent of its current value.
    has_edge: DMatrix<bool>,
}

impl Conformation {
    /// Builds a conformation matrix from a matrix of edge probabilities `p(edge)`,
    /// where `NaN` marks the absence of an edge (as produced by the graph
    /// generation functors below).
    pub fn from_edge_probabilities(p: &DMatrix<f32>) -> Self {
        let has_edge = p.map(|v| !v.is_nan());
        let values = p.map(|v| if v.is_nan() { 1.0 } else { 1.0 - v });
        Self { values, has_edge }
    }

    pub fn size(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        self.values[(i, j)] = value.clamp(0.0, 1.0);
    }

    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.has_edge[(i, j)]
    }

    pub fn values(&self) -> &DMatrix<f32> {
        &self.values
    }

    /// Decays only the leading `size x size` block toward `1.0`, leaving the
    /// rest of the matrix (cross-region edges outside that block) untouched.
    pub fn decay_block(&mut self, size: usize, coefficient: f32) {
        for i in 0..size {
            for j in 0..size {
                if self.has_edge[(i, j)] {
                    let v = self.values[(i, j)];
                    self.values[(i, j)] = (v + (1.0 - v) * coefficient).clamp(0.0, 1.0);
                }
            }
        }
    }

    /// The leading `size x size` block of the matrix, by convention the
    /// internal-to-internal submatrix when internal regions are assembled first.
    pub fn internal_submatrix(&self, size: usize) -> DMatrix<f32> {
        self.values.view((0, 0), (size, size)).into_owned()
    }

    /// Writes `block` back into the leading `size x size` submatrix.
    pub fn set_internal_submatrix(&mut self, block: &DMatrix<f32>) {
        let size = block.nrows();
        for i in 0..size {
            for j in 0..size {
                self.set(i, j, block[(i, j)]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edge_probabilities() {
        let p = DMatrix::from_row_slice(2, 2, &[f32::NAN, 0.3, 0.6, f32::NAN]);
        let c = Conformation::from_edge_probabilities(&p);
        assert!(!c.has_edge(0, 0));
        assert_eq!(c.get(0, 0), 1.0);
        assert!(c.has_edge(0, 1));
        assert_eq!(c.get(0, 1), 0.7);
    }

    #[test]
    fn test_decay_block_moves_toward_one_only_on_edges() {
        let p = DMatrix::from_row_slice(2, 2, &[f32::NAN, 0.2, 0.2, f32::NAN]);
        let mut c = Conformation::from_edge_probabilities(&p);
        c.decay_block(2, 0.5);
        assert_eq!(c.get(0, 0), 1.0);
        assert!((c.get(0, 1) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_decay_block_leaves_outside_block_untouched() {
        let p = DMatrix::from_row_slice(
            3,
            3,
            &[0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2],
        );
        let mut c = Conformation::from_edge_probabilities(&p);
        c.decay_block(2, 0.5);
        assert!((c.get(0, 1) - 0.9).abs() < 1e-6);
        assert!((c.get(0, 2) - 0.8).abs() < 1e-6);
        assert!((c.get(2, 0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_internal_submatrix() {
        let p = DMatrix::from_row_slice(
            3,
            3,
            &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
        );
        let c = Conformation::from_edge_probabilities(&p);
        let sub = c.internal_submatrix(2);
        assert_eq!(sub.nrows(), 2);
        assert_eq!(sub.ncols(), 2);
    }
}
