//! Largest adjacency eigenvalue, the epidemic-threshold normalizer.

use{
    crate::graph::{ContactGraph, NodeId},
    nalgebra::DVector,
    thiserror::Error
};

pub const DEFAULT_TOLERANCE: f64 = 1e-9;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpectralError{
    #[error("power iteration did not converge within {iterations} iterations")]
    NoConvergence{ iterations: usize },
}

/// Largest-magnitude eigenvalue of the graph's adjacency matrix.
///
/// Power iteration over the sparse neighbour lists; the matrix itself is
/// never materialized, so graphs with tens of thousands of nodes stay cheap.
/// A dense eigendecomposition is deliberately avoided.
pub fn largest_eigenvalue<T: NodeId>(graph: &ContactGraph<T>) -> Result<f64, SpectralError>{
    largest_eigenvalue_with(graph, DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS)
}

pub fn largest_eigenvalue_with<T: NodeId>(
    graph: &ContactGraph<T>,
    tolerance: f64,
    max_iterations: usize
) -> Result<f64, SpectralError>
{
    if graph.node_count() == 0 || graph.edge_count() == 0{
        // all-zero adjacency matrix
        return Ok(0.0);
    }
    let (_, neighbor_indices) = index_adjacency(graph);
    power_iterate(&neighbor_indices, tolerance, max_iterations)
        .map(|(eigenvalue, _)| eigenvalue)
}

/// Node order plus neighbour lists re-expressed as dense indices,
/// the sparse stand-in for the adjacency matrix.
pub(crate) fn index_adjacency<T: NodeId>(graph: &ContactGraph<T>) -> (Vec<T>, Vec<Vec<usize>>){
    let nodes: Vec<T> = graph.nodes().collect();
    let index: std::collections::BTreeMap<T, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, &node)| (node, i))
        .collect();
    let neighbor_indices = nodes
        .iter()
        .map(|node| graph.neighbors(node).map(|n| index[&n]).collect())
        .collect();
    (nodes, neighbor_indices)
}

/// Power iteration on `A + I`.
///
/// The shift leaves the Perron vector untouched but makes the top eigenvalue
/// strictly dominant even on bipartite graphs, where `A` alone has a
/// matching negative extreme and the plain iteration oscillates. Returns the
/// eigenvalue of `A` (shift undone) and the normalized dominant eigenvector.
pub(crate) fn power_iterate(
    neighbor_indices: &[Vec<usize>],
    tolerance: f64,
    max_iterations: usize
) -> Result<(f64, DVector<f64>), SpectralError>
{
    let n = neighbor_indices.len();
    let mut vector = DVector::from_element(n, 1.0 / (n as f64).sqrt());
    let mut previous = f64::NAN;

    for _ in 0..max_iterations{
        let mut next = vector.clone();
        for (i, neighbors) in neighbor_indices.iter().enumerate(){
            for &j in neighbors{
                next[i] += vector[j];
            }
        }
        // `vector` is normalized, so this is the Rayleigh quotient of A + I
        let shifted = vector.dot(&next);
        next.normalize_mut();
        vector = next;

        let eigenvalue = (shifted - 1.0).max(0.0);
        if (eigenvalue - previous).abs() <= tolerance * eigenvalue.abs().max(1.0){
            return Ok((eigenvalue, vector));
        }
        previous = eigenvalue;
    }
    Err(SpectralError::NoConvergence{ iterations: max_iterations })
}

/// Outcome of the single-node immunization diagnostic.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmunizationReport<T>{
    /// Node whose removal gives the lowest surviving eigenvalue.
    pub removed: T,
    pub eigenvalue_before: f64,
    pub eigenvalue_after: f64,
    /// Whether the eigenvalue of the unmodified graph converged; if not,
    /// `eigenvalue_before` holds the 0.0 sentinel.
    pub baseline_converged: bool,
    /// Candidates whose eigenvalue computation failed to converge. They are
    /// excluded from the minimization rather than aborting the diagnostic.
    pub failed: Vec<T>,
}

/// Finds the node contributing most to the largest eigenvalue by removing
/// each node in turn (on a clone) and recomputing. Quadratic in graph size
/// times the iteration cost, so strictly a diagnostic for moderate graphs.
///
/// Returns `None` for an empty graph or when no candidate converged.
pub fn most_critical_node<T: NodeId>(graph: &ContactGraph<T>) -> Option<ImmunizationReport<T>>{
    if graph.node_count() == 0{
        return None;
    }

    let (eigenvalue_before, baseline_converged) = match largest_eigenvalue(graph){
        Ok(e) => (e, true),
        Err(_) => (0.0, false),
    };

    let mut failed = Vec::new();
    let mut best: Option<(T, f64)> = None;
    for node in graph.nodes(){
        let mut reduced = graph.clone();
        reduced.remove_node(&node);
        match largest_eigenvalue(&reduced){
            Ok(eigenvalue) => {
                let better = best
                    .map(|(_, current)| eigenvalue < current)
                    .unwrap_or(true);
                if better{
                    best = Some((node, eigenvalue));
                }
            }
            Err(_) => failed.push(node),
        }
    }

    best.map(|(removed, eigenvalue_after)| ImmunizationReport{
        removed,
        eigenvalue_before,
        eigenvalue_after,
        baseline_converged,
        failed,
    })
}
