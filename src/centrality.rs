//! Node rankings used to pick seed or immunization targets.

use{
    crate::graph::{ContactGraph, NodeId},
    crate::spectral::{index_adjacency, power_iterate, SpectralError,
        DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE},
    serde::{Deserialize, Serialize},
    std::collections::{BTreeMap, VecDeque}
};

/// Interchangeable scoring strategies. Degree and eigenvector stay cheap on
/// large graphs; betweenness enumerates shortest paths between all pairs and
/// should be reserved for small networks.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CentralityKind{
    Degree,
    Eigenvector,
    Betweenness,
}

impl CentralityKind{
    pub fn name(self) -> &'static str
    {
        match self{
            Self::Degree => "Deg",
            Self::Eigenvector => "Eig",
            Self::Betweenness => "Btw",
        }
    }
}

/// Maps every node to its non-negative score under `kind`. Only the
/// eigenvector strategy can fail, when the underlying iteration does not
/// converge.
pub fn scores<T: NodeId>(
    graph: &ContactGraph<T>,
    kind: CentralityKind
) -> Result<BTreeMap<T, f64>, SpectralError>
{
    match kind{
        CentralityKind::Degree => Ok(degree_scores(graph)),
        CentralityKind::Eigenvector => eigenvector_scores(graph),
        CentralityKind::Betweenness => Ok(betweenness_scores(graph)),
    }
}

/// The `k` highest-scoring nodes, best first, extracted one maximum at a
/// time. Ties go to the smallest node id, so rankings are deterministic for
/// a fixed graph. `k >= node_count` ranks every node.
pub fn top_k<T: NodeId>(
    graph: &ContactGraph<T>,
    kind: CentralityKind,
    k: usize
) -> Result<Vec<T>, SpectralError>
{
    let mut scores = scores(graph, kind)?;
    let k = k.min(scores.len());
    let mut ranked = Vec::with_capacity(k);
    for _ in 0..k{
        let mut best: Option<(T, f64)> = None;
        for (&node, &score) in scores.iter(){
            let improves = best
                .map(|(_, best_score)| score > best_score)
                .unwrap_or(true);
            if improves{
                best = Some((node, score));
            }
        }
        // scores cannot be empty here, k is clamped to its length
        let (node, _) = best.unwrap();
        scores.remove(&node);
        ranked.push(node);
    }
    Ok(ranked)
}

fn degree_scores<T: NodeId>(graph: &ContactGraph<T>) -> BTreeMap<T, f64>{
    graph
        .nodes()
        .map(|node| (node, graph.degree(&node) as f64))
        .collect()
}

/// Components of the dominant adjacency eigenvector, scaled so the mean
/// score is 1.
fn eigenvector_scores<T: NodeId>(
    graph: &ContactGraph<T>
) -> Result<BTreeMap<T, f64>, SpectralError>
{
    let (nodes, neighbor_indices) = index_adjacency(graph);
    if nodes.is_empty(){
        return Ok(BTreeMap::new());
    }
    let (_, vector) = power_iterate(&neighbor_indices, DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS)?;
    let scale = vector.sum() / nodes.len() as f64;
    Ok(nodes
        .iter()
        .zip(vector.iter())
        .map(|(&node, &component)| (node, component / scale))
        .collect())
}

/// Brandes' accumulation of pair dependencies, O(V * E) on unweighted
/// graphs. Each unordered pair is visited from both endpoints, hence the
/// final halving.
fn betweenness_scores<T: NodeId>(graph: &ContactGraph<T>) -> BTreeMap<T, f64>{
    let (nodes, neighbor_indices) = index_adjacency(graph);
    let n = nodes.len();
    let mut centrality = vec![0.0; n];

    for source in 0..n{
        let mut order = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut path_counts = vec![0.0_f64; n];
        let mut distance = vec![-1_i64; n];
        path_counts[source] = 1.0;
        distance[source] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(v) = queue.pop_front(){
            order.push(v);
            for &w in &neighbor_indices[v]{
                if distance[w] < 0{
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
                if distance[w] == distance[v] + 1{
                    path_counts[w] += path_counts[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut dependency = vec![0.0_f64; n];
        while let Some(w) = order.pop(){
            for &v in &predecessors[w]{
                dependency[v] += path_counts[v] / path_counts[w] * (1.0 + dependency[w]);
            }
            if w != source{
                centrality[w] += dependency[w];
            }
        }
    }

    nodes
        .iter()
        .zip(centrality)
        .map(|(&node, score)| (node, score / 2.0))
        .collect()
}
