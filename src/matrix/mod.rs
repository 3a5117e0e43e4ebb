//! Adjacency-matrix construction and algebra.
//!
//! A matrix is a derived value: [`AdjacencyMatrix::from_graph`] snapshots the
//! graph at construction time and stays independent of later mutations. The
//! node-id↔index bijection travels with the matrix so algebraic results can
//! be mapped back into graph space with [`AdjacencyMatrix::to_edges`].
//!
//! Dense matrices are row-major `ndarray` tensors; sparse matrices use the
//! coordinate-list (COO) format. Multiplication of a sparse operand goes
//! through a documented densify fallback rather than a true sparse product.

mod semiring;

use indexmap::IndexMap;
use ndarray::Array2;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::model::{Edge, NodeId};

pub use semiring::{Semiring, SemiringKind, SemiringOp};

/// Storage layout of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Row-major `n × n` tensor.
    Dense,
    /// Coordinate-list triples.
    Sparse,
}

/// Sparse matrix in coordinate-list form: parallel row/col/value arrays.
///
/// Entries are kept coalesced (one entry per coordinate) and sorted
/// row-major so equal matrices compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    /// Row index per entry.
    pub rows: Vec<usize>,
    /// Column index per entry.
    pub cols: Vec<usize>,
    /// Value per entry.
    pub values: Vec<f64>,
    /// Full matrix shape `(rows, cols)`.
    pub shape: (usize, usize),
}

impl CooMatrix {
    fn from_entries(entries: FxHashMap<(usize, usize), f64>, shape: (usize, usize)) -> Self {
        let mut sorted: Vec<((usize, usize), f64)> = entries
            .into_iter()
            .filter(|(_, v)| *v != 0.0)
            .collect();
        sorted.sort_unstable_by_key(|((r, c), _)| (*r, *c));
        let mut coo = CooMatrix {
            rows: Vec::with_capacity(sorted.len()),
            cols: Vec::with_capacity(sorted.len()),
            values: Vec::with_capacity(sorted.len()),
            shape,
        };
        for ((r, c), v) in sorted {
            coo.rows.push(r);
            coo.cols.push(c);
            coo.values.push(v);
        }
        coo
    }

    fn from_dense(dense: &Array2<f64>) -> Self {
        let mut entries = FxHashMap::default();
        for ((r, c), &v) in dense.indexed_iter() {
            if v != 0.0 {
                entries.insert((r, c), v);
            }
        }
        Self::from_entries(entries, dense.dim())
    }

    fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros(self.shape);
        for i in 0..self.values.len() {
            dense[[self.rows[i], self.cols[i]]] = self.values[i];
        }
        dense
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// Matrix payload; the empty graph produces the `Empty` sentinel, which
/// propagates through every operation.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    /// No data; dimensions are `(0, 0)`.
    Empty,
    /// Dense tensor.
    Dense(Array2<f64>),
    /// Coordinate-list triples.
    Sparse(CooMatrix),
}

/// A graph adjacency matrix carrying its node-id↔index bijection.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix {
    kind: MatrixKind,
    data: MatrixData,
    mapping: IndexMap<NodeId, usize>,
}

fn edge_weight(edge: &Edge) -> f64 {
    edge.property("weight")
        .or_else(|| edge.property("w"))
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0)
}

impl AdjacencyMatrix {
    /// Builds the adjacency matrix of a graph.
    ///
    /// Indices are assigned in storage iteration order (node insertion
    /// order). Edge weights come from the `"weight"` property, then `"w"`,
    /// then default to `1.0`; parallel edges collapse last-write-wins in
    /// both layouts. An empty graph yields the empty sentinel.
    pub fn from_graph(graph: &Graph, kind: MatrixKind) -> Self {
        let node_ids = graph.storage().node_ids_snapshot();
        let n = node_ids.len();
        let mapping: IndexMap<NodeId, usize> = node_ids
            .into_iter()
            .enumerate()
            .map(|(idx, id)| (id, idx))
            .collect();
        if n == 0 {
            return Self {
                kind,
                data: MatrixData::Empty,
                mapping,
            };
        }

        let mut entries: FxHashMap<(usize, usize), f64> = FxHashMap::default();
        for edge in graph.storage().edges_snapshot() {
            let (Some(&from), Some(&to)) = (
                mapping.get(&edge.from_node_id),
                mapping.get(&edge.to_node_id),
            ) else {
                warn!(edge = %edge.id, "edge endpoint missing from node table, skipped");
                continue;
            };
            // Insertion order makes the last parallel edge win.
            entries.insert((from, to), edge_weight(&edge));
        }

        let data = match kind {
            MatrixKind::Dense => {
                let mut dense = Array2::zeros((n, n));
                for ((r, c), v) in entries {
                    dense[[r, c]] = v;
                }
                MatrixData::Dense(dense)
            }
            MatrixKind::Sparse => MatrixData::Sparse(CooMatrix::from_entries(entries, (n, n))),
        };
        Self {
            kind,
            data,
            mapping,
        }
    }

    /// Storage layout of this matrix.
    pub fn kind(&self) -> MatrixKind {
        self.kind
    }

    /// Matrix payload.
    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    /// Node-id → index bijection; iteration order follows the indices.
    pub fn mapping(&self) -> &IndexMap<NodeId, usize> {
        &self.mapping
    }

    /// Matrix shape; `(0, 0)` for the empty sentinel.
    pub fn dimensions(&self) -> (usize, usize) {
        match &self.data {
            MatrixData::Empty => (0, 0),
            MatrixData::Dense(d) => d.dim(),
            MatrixData::Sparse(s) => s.shape,
        }
    }

    /// True when this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self.data, MatrixData::Empty)
    }

    /// Entry for a node pair, through the mapping.
    ///
    /// `None` when either id is not mapped; absent sparse entries read 0.0.
    pub fn get(&self, from: &NodeId, to: &NodeId) -> Option<f64> {
        let (&r, &c) = (self.mapping.get(from)?, self.mapping.get(to)?);
        match &self.data {
            MatrixData::Empty => None,
            MatrixData::Dense(d) => Some(d[[r, c]]),
            MatrixData::Sparse(s) => Some(
                (0..s.nnz())
                    .find(|&i| s.rows[i] == r && s.cols[i] == c)
                    .map(|i| s.values[i])
                    .unwrap_or(0.0),
            ),
        }
    }

    /// Swaps the axes. The mapping is unchanged; empty stays empty.
    pub fn transpose(&self) -> Self {
        let data = match &self.data {
            MatrixData::Empty => MatrixData::Empty,
            MatrixData::Dense(d) => MatrixData::Dense(d.t().to_owned()),
            MatrixData::Sparse(s) => {
                let mut entries = FxHashMap::default();
                for i in 0..s.nnz() {
                    entries.insert((s.cols[i], s.rows[i]), s.values[i]);
                }
                MatrixData::Sparse(CooMatrix::from_entries(entries, (s.shape.1, s.shape.0)))
            }
        };
        Self {
            kind: self.kind,
            data,
            mapping: self.mapping.clone(),
        }
    }

    fn check_mapping(&self, other: &Self) -> Result<()> {
        if self.mapping == other.mapping {
            Ok(())
        } else {
            Err(GraphError::IncompatibleMapping)
        }
    }

    fn check_inner_dimensions(&self, other: &Self) -> Result<()> {
        let left = self.dimensions();
        let right = other.dimensions();
        if left.1 == right.0 {
            Ok(())
        } else {
            Err(GraphError::IncompatibleDimensions { left, right })
        }
    }

    fn dense_view(&self) -> Array2<f64> {
        match &self.data {
            MatrixData::Empty => Array2::zeros((0, 0)),
            MatrixData::Dense(d) => d.clone(),
            MatrixData::Sparse(s) => s.to_dense(),
        }
    }

    /// Classical matrix product.
    ///
    /// Both operands must share a node mapping and have compatible inner
    /// dimensions. A sparse operand is densified first (accepted baseline in
    /// place of a true sparse product), so the result is dense whenever
    /// either input is.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        self.check_mapping(other)?;
        if self.is_empty() || other.is_empty() {
            return Ok(Self {
                kind: MatrixKind::Dense,
                data: MatrixData::Empty,
                mapping: self.mapping.clone(),
            });
        }
        self.check_inner_dimensions(other)?;
        let (a, b) = (self.dense_view(), other.dense_view());
        Ok(Self {
            kind: MatrixKind::Dense,
            data: MatrixData::Dense(a.dot(&b)),
            mapping: self.mapping.clone(),
        })
    }

    /// `k`-th matrix power by left-folded multiplication.
    ///
    /// `k = 1` returns a clone; `k = 0` is rejected because the engine does
    /// not materialize semiring identity matrices.
    pub fn power(&self, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(GraphError::InvalidArgument(
                "matrix power requires a positive exponent",
            ));
        }
        let mut acc = self.clone();
        for _ in 1..k {
            acc = acc.multiply(self)?;
        }
        Ok(acc)
    }

    /// Elementwise addition.
    ///
    /// Requires identical mappings and shapes. Two sparse operands produce a
    /// sparse sum; any dense operand makes the result dense.
    pub fn elementwise_add(&self, other: &Self) -> Result<Self> {
        self.check_mapping(other)?;
        if self.is_empty() || other.is_empty() {
            return Ok(Self {
                kind: self.kind,
                data: MatrixData::Empty,
                mapping: self.mapping.clone(),
            });
        }
        let (left, right) = (self.dimensions(), other.dimensions());
        if left != right {
            return Err(GraphError::IncompatibleDimensions { left, right });
        }
        if let (MatrixData::Sparse(a), MatrixData::Sparse(b)) = (&self.data, &other.data) {
            let mut entries: FxHashMap<(usize, usize), f64> = FxHashMap::default();
            for i in 0..a.nnz() {
                *entries.entry((a.rows[i], a.cols[i])).or_insert(0.0) += a.values[i];
            }
            for i in 0..b.nnz() {
                *entries.entry((b.rows[i], b.cols[i])).or_insert(0.0) += b.values[i];
            }
            return Ok(Self {
                kind: MatrixKind::Sparse,
                data: MatrixData::Sparse(CooMatrix::from_entries(entries, left)),
                mapping: self.mapping.clone(),
            });
        }
        let sum = self.dense_view() + &other.dense_view();
        Ok(Self {
            kind: MatrixKind::Dense,
            data: MatrixData::Dense(sum),
            mapping: self.mapping.clone(),
        })
    }

    /// Projects onto the rows/columns of the given nodes.
    ///
    /// The caller's order defines the fresh mapping; ids missing from the
    /// current mapping are skipped. Projecting onto zero known ids yields
    /// the empty sentinel.
    pub fn subgraph(&self, ids: &[NodeId]) -> Self {
        let mut keep: Vec<(NodeId, usize)> = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(&idx) = self.mapping.get(id) {
                if !keep.iter().any(|(kept, _)| kept == id) {
                    keep.push((id.clone(), idx));
                }
            }
        }
        let mapping: IndexMap<NodeId, usize> = keep
            .iter()
            .enumerate()
            .map(|(new_idx, (id, _))| (id.clone(), new_idx))
            .collect();
        if keep.is_empty() || self.is_empty() {
            return Self {
                kind: self.kind,
                data: MatrixData::Empty,
                mapping,
            };
        }
        let n = keep.len();
        let data = match &self.data {
            MatrixData::Empty => MatrixData::Empty,
            MatrixData::Dense(d) => {
                let mut out = Array2::zeros((n, n));
                for (r_new, (_, r_old)) in keep.iter().enumerate() {
                    for (c_new, (_, c_old)) in keep.iter().enumerate() {
                        out[[r_new, c_new]] = d[[*r_old, *c_old]];
                    }
                }
                MatrixData::Dense(out)
            }
            MatrixData::Sparse(s) => {
                let old_to_new: FxHashMap<usize, usize> = keep
                    .iter()
                    .enumerate()
                    .map(|(new_idx, (_, old_idx))| (*old_idx, new_idx))
                    .collect();
                let mut entries = FxHashMap::default();
                for i in 0..s.nnz() {
                    if let (Some(&r), Some(&c)) =
                        (old_to_new.get(&s.rows[i]), old_to_new.get(&s.cols[i]))
                    {
                        entries.insert((r, c), s.values[i]);
                    }
                }
                MatrixData::Sparse(CooMatrix::from_entries(entries, (n, n)))
            }
        };
        Self {
            kind: self.kind,
            data,
            mapping,
        }
    }

    /// Enumerates non-zero entries as `(from, to, weight)` triples through
    /// the inverse mapping, in row-major order.
    pub fn to_edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let node_at = |idx: usize| -> Option<NodeId> {
            self.mapping.get_index(idx).map(|(id, _)| id.clone())
        };
        match &self.data {
            MatrixData::Empty => Vec::new(),
            MatrixData::Dense(d) => {
                let mut out = Vec::new();
                for ((r, c), &v) in d.indexed_iter() {
                    if v != 0.0 {
                        if let (Some(from), Some(to)) = (node_at(r), node_at(c)) {
                            out.push((from, to, v));
                        }
                    }
                }
                out
            }
            MatrixData::Sparse(s) => {
                let mut out = Vec::with_capacity(s.nnz());
                for i in 0..s.nnz() {
                    if let (Some(from), Some(to)) = (node_at(s.rows[i]), node_at(s.cols[i])) {
                        out.push((from, to, s.values[i]));
                    }
                }
                out
            }
        }
    }

    /// Converts between layouts; identity when the kind already matches.
    ///
    /// Dense→sparse drops zero entries into COO; sparse→dense scatters into
    /// a zero-filled tensor.
    pub fn convert(&self, kind: MatrixKind) -> Self {
        if kind == self.kind {
            return self.clone();
        }
        let data = match (&self.data, kind) {
            (MatrixData::Empty, _) => MatrixData::Empty,
            (MatrixData::Dense(d), MatrixKind::Sparse) => {
                MatrixData::Sparse(CooMatrix::from_dense(d))
            }
            (MatrixData::Sparse(s), MatrixKind::Dense) => MatrixData::Dense(s.to_dense()),
            (other, _) => other.clone(),
        };
        Self {
            kind,
            data,
            mapping: self.mapping.clone(),
        }
    }

    /// Semiring matrix product: `(A ⊗ B)[i,j] = ⊕_k (A[i,k] ⊗ B[k,j])`.
    ///
    /// Same mapping/shape rules and densify fallback as [`Self::multiply`];
    /// the named semirings dispatch to specialized kernels.
    pub fn semiring_multiply(&self, other: &Self, semiring: &Semiring) -> Result<Self> {
        self.check_mapping(other)?;
        if self.is_empty() || other.is_empty() {
            return Ok(Self {
                kind: MatrixKind::Dense,
                data: MatrixData::Empty,
                mapping: self.mapping.clone(),
            });
        }
        self.check_inner_dimensions(other)?;
        let (a, b) = (self.dense_view(), other.dense_view());
        Ok(Self {
            kind: MatrixKind::Dense,
            data: MatrixData::Dense(semiring::multiply_dense(&a, &b, semiring)),
            mapping: self.mapping.clone(),
        })
    }

    /// Re-encodes the matrix into a semiring's carrier.
    ///
    /// Absent entries (stored as zero) become the semiring zero and the
    /// diagonal becomes the semiring one, yielding the closed adjacency
    /// whose `k`-th power describes walks of length at most `k`. For the
    /// tropical semiring, off-graph entries read `+∞` and each node reaches
    /// itself at cost 0. Explicit zero-weight edges are indistinguishable
    /// from absent entries here. The result is dense.
    pub fn semiring_weights(&self, semiring: &Semiring) -> Self {
        if self.is_empty() {
            return Self {
                kind: MatrixKind::Dense,
                data: MatrixData::Empty,
                mapping: self.mapping.clone(),
            };
        }
        let source = self.dense_view();
        let (n, m) = source.dim();
        let mut out = Array2::from_elem((n, m), semiring.zero());
        for ((r, c), &v) in source.indexed_iter() {
            if r == c {
                out[[r, c]] = semiring.one();
            } else if v != 0.0 {
                out[[r, c]] = v;
            }
        }
        Self {
            kind: MatrixKind::Dense,
            data: MatrixData::Dense(out),
            mapping: self.mapping.clone(),
        }
    }

    /// `k`-th semiring power by left-folded [`Self::semiring_multiply`].
    pub fn semiring_power(&self, k: usize, semiring: &Semiring) -> Result<Self> {
        if k == 0 {
            return Err(GraphError::InvalidArgument(
                "matrix power requires a positive exponent",
            ));
        }
        let mut acc = self.clone();
        for _ in 1..k {
            acc = acc.semiring_multiply(self, semiring)?;
        }
        Ok(acc)
    }
}
