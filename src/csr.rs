use crate::error::{BmsspError, Result};

/// Compressed Sparse Row (CSR) graph representation.
///
/// Stores a directed graph's topology in CSR format: efficient for sparse
/// graphs and fast to iterate over outgoing edges of a vertex. Edge weights
/// live in a separate, caller-owned slice indexed in parallel with
/// `indices` (the same layout the algorithm's edge-relaxation loops walk).
#[derive(Debug, Clone)]
pub struct CsrGraph {
    /// Number of vertices.
    n: usize,
    /// Index pointer array of length n+1; indptr[i] points to the start of
    /// row i in `indices`.
    indptr: Vec<usize>,
    /// Column indices array of length m (number of edges); the destination
    /// vertex for each edge.
    indices: Vec<usize>,
}

impl CsrGraph {
    /// Create a new CSR graph.
    ///
    /// # Errors
    ///
    /// Returns [`BmsspError::InvalidGraph`] if the CSR structure is
    /// internally inconsistent (wrong `indptr` length, non-monotonic
    /// `indptr`, or out-of-range `indices`).
    pub fn new(n: usize, indptr: Vec<usize>, indices: Vec<usize>) -> Result<Self> {
        let graph = Self { n, indptr, indices };
        graph.validate()?;
        Ok(graph)
    }

    /// Validate the CSR structure.
    pub fn validate(&self) -> Result<()> {
        if self.indptr.len() != self.n + 1 {
            return Err(BmsspError::InvalidGraph(format!(
                "indptr length {} != n+1 ({})",
                self.indptr.len(),
                self.n + 1
            )));
        }

        for i in 0..self.n {
            if self.indptr[i] > self.indptr[i + 1] {
                return Err(BmsspError::InvalidGraph(format!(
                    "indptr not monotonic at index {}: {} > {}",
                    i, self.indptr[i], self.indptr[i + 1]
                )));
            }
        }

        for &idx in &self.indices {
            if idx >= self.n {
                return Err(BmsspError::InvalidGraph(format!(
                    "index {} out of range (n={})",
                    idx, self.n
                )));
            }
        }

        if let Some(&last) = self.indptr.last() {
            if last != self.indices.len() {
                return Err(BmsspError::InvalidGraph(format!(
                    "indptr[{}] = {} != indices.len() = {}",
                    self.n,
                    last,
                    self.indices.len()
                )));
            }
        }

        Ok(())
    }

    /// Number of vertices. Vertices with no outgoing edges are still
    /// representable (an empty row); they need not appear anywhere in
    /// `indices`.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.indices.len()
    }

    /// Outgoing neighbours of `u`, in the order they were inserted.
    #[inline]
    pub fn neighbors(&self, u: usize) -> &[usize] {
        let start = self.indptr[u];
        let end = self.indptr[u + 1];
        &self.indices[start..end]
    }

    /// Range of edge indices `(start, end)` for `u`'s outgoing edges, such
    /// that `weights[start..end]` are the weights of `neighbors(u)` in the
    /// same order.
    #[inline]
    pub fn edge_range(&self, u: usize) -> (usize, usize) {
        (self.indptr[u], self.indptr[u + 1])
    }
}
