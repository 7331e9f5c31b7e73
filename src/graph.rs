//! Undirected contact networks the epidemic runs on.

use{
    rand::{seq::SliceRandom, Rng},
    std::collections::{BTreeMap, BTreeSet},
    std::fmt::Debug,
    std::hash::Hash,
    thiserror::Error
};

/// Bound alias for node identifiers. Anything cheap to copy with a total
/// order works, identifiers do not have to be contiguous.
pub trait NodeId: Copy + Eq + Hash + Ord + Debug + Send + Sync {}
impl<T> NodeId for T where T: Copy + Eq + Hash + Ord + Debug + Send + Sync {}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError<T: Debug>{
    #[error("self-loop on node {0:?} is not a valid contact")]
    SelfLoop(T),
}

/// Adjacency-set representation of an undirected simple graph.
///
/// `BTreeMap`/`BTreeSet` keep node and neighbour iteration in ascending node
/// order, which makes rankings and seeded simulations reproducible. Parallel
/// edges collapse by construction; self-loops are rejected.
#[derive(Clone, Debug, Default)]
pub struct ContactGraph<T>{
    adjacency: BTreeMap<T, BTreeSet<T>>,
    edge_count: usize,
}

impl<T: NodeId> ContactGraph<T>{
    pub fn new() -> Self{
        Self{
            adjacency: BTreeMap::new(),
            edge_count: 0,
        }
    }

    /// Inserts an isolated node. A no-op if it already exists.
    pub fn add_node(&mut self, node: T){
        self.adjacency.entry(node).or_default();
    }

    /// Inserts the undirected edge `{a, b}`, creating missing endpoints.
    /// Duplicate insertions are no-ops.
    pub fn add_edge(&mut self, a: T, b: T) -> Result<(), TopologyError<T>>{
        if a == b{
            return Err(TopologyError::SelfLoop(a));
        }
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        if inserted{
            self.edge_count += 1;
        }
        Ok(())
    }

    pub fn contains_node(&self, node: &T) -> bool{
        self.adjacency.contains_key(node)
    }

    pub fn has_edge(&self, a: &T, b: &T) -> bool{
        self.adjacency
            .get(a)
            .map_or(false, |neighbors| neighbors.contains(b))
    }

    pub fn node_count(&self) -> usize{
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize{
        self.edge_count
    }

    /// Nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = T> + '_{
        self.adjacency.keys().copied()
    }

    /// Neighbours of `node` in ascending order; empty for unknown nodes.
    pub fn neighbors(&self, node: &T) -> impl Iterator<Item = T> + '_{
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().copied())
    }

    pub fn degree(&self, node: &T) -> usize{
        self.adjacency
            .get(node)
            .map_or(0, |neighbors| neighbors.len())
    }

    /// Removes a node and every incident edge. Returns whether it existed.
    /// Only the immunization diagnostic mutates graphs this way, and it
    /// operates on a clone.
    pub fn remove_node(&mut self, node: &T) -> bool{
        let neighbors = match self.adjacency.remove(node){
            Some(n) => n,
            None => return false,
        };
        self.edge_count -= neighbors.len();
        for neighbor in neighbors{
            if let Some(set) = self.adjacency.get_mut(&neighbor){
                set.remove(node);
            }
        }
        true
    }
}

//
// Seeded generators for the standard test topologies.
//

/// Cycle on `n` nodes, 0-1-2-..-(n-1)-0.
pub fn ring(n: usize) -> ContactGraph<u32>{
    let mut graph = ContactGraph::new();
    if n == 1{
        graph.add_node(0);
        return graph;
    }
    for i in 0..n as u32{
        let next = (i + 1) % n as u32;
        graph.add_edge(i, next).unwrap();
    }
    graph
}

/// Hub node 0 connected to `leaves` leaf nodes.
pub fn star(leaves: usize) -> ContactGraph<u32>{
    let mut graph = ContactGraph::new();
    graph.add_node(0);
    for leaf in 1..=leaves as u32{
        graph.add_edge(0, leaf).unwrap();
    }
    graph
}

/// G(n, p) with every node present even when isolated.
pub fn erdos_renyi<R: Rng>(n: usize, p: f64, rng: &mut R) -> ContactGraph<u32>{
    let mut graph = ContactGraph::new();
    for i in 0..n as u32{
        graph.add_node(i);
    }
    for i in 0..n as u32{
        for j in (i + 1)..n as u32{
            if rng.gen_bool(p){
                graph.add_edge(i, j).unwrap();
            }
        }
    }
    graph
}

/// Barabasi-Albert preferential attachment: a clique on the first `m + 1`
/// nodes, then each newcomer attaches to `m` distinct targets chosen
/// proportionally to degree (uniform draw from the edge-endpoint list).
pub fn barabasi_albert<R: Rng>(n: usize, m: usize, rng: &mut R) -> ContactGraph<u32>{
    let m = m.max(1);
    let core = (m + 1).min(n);
    let mut graph = ContactGraph::new();
    let mut endpoints: Vec<u32> = Vec::new();
    for i in 0..core as u32{
        graph.add_node(i);
        for j in (i + 1)..core as u32{
            graph.add_edge(i, j).unwrap();
            endpoints.push(i);
            endpoints.push(j);
        }
    }
    for new_node in core as u32..n as u32{
        let mut targets = BTreeSet::new();
        while targets.len() < m{
            let target = *endpoints
                .choose(rng)
                .expect("endpoint list cannot be empty once the core clique exists");
            targets.insert(target);
        }
        for target in targets{
            graph.add_edge(new_node, target).unwrap();
            endpoints.push(new_node);
            endpoints.push(target);
        }
    }
    graph
}

#[cfg(test)]
mod tests{
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn self_loop_rejected(){
        let mut graph = ContactGraph::new();
        assert_eq!(graph.add_edge(4_u32, 4), Err(TopologyError::SelfLoop(4)));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn duplicate_edges_collapse(){
        let mut graph = ContactGraph::new();
        graph.add_edge(1_u32, 2).unwrap();
        graph.add_edge(2, 1).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(&1), 1);
    }

    #[test]
    fn neighbor_iteration_is_sorted(){
        let mut graph = ContactGraph::new();
        graph.add_edge(5_u32, 9).unwrap();
        graph.add_edge(5, 2).unwrap();
        graph.add_edge(5, 7).unwrap();
        let neighbors: Vec<_> = graph.neighbors(&5).collect();
        assert_eq!(neighbors, vec![2, 7, 9]);
    }

    #[test]
    fn remove_node_strips_incident_edges(){
        let mut graph = star(4);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.remove_node(&0));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 4);
        assert!(!graph.remove_node(&0));
        for leaf in 1..=4_u32{
            assert_eq!(graph.degree(&leaf), 0);
        }
    }

    #[test]
    fn ring_degrees(){
        let graph = ring(4);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        for node in graph.nodes(){
            assert_eq!(graph.degree(&node), 2);
        }
    }

    #[test]
    fn erdos_renyi_extremes(){
        let mut rng = Pcg64::seed_from_u64(0);
        let empty = erdos_renyi(10, 0.0, &mut rng);
        assert_eq!(empty.node_count(), 10);
        assert_eq!(empty.edge_count(), 0);

        let full = erdos_renyi(10, 1.0, &mut rng);
        assert_eq!(full.edge_count(), 45);
    }

    #[test]
    fn barabasi_albert_sizes(){
        let mut rng = Pcg64::seed_from_u64(7);
        let graph = barabasi_albert(50, 2, &mut rng);
        assert_eq!(graph.node_count(), 50);
        // clique on 3 nodes plus 2 edges per newcomer
        assert_eq!(graph.edge_count(), 3 + 47 * 2);
        for node in graph.nodes(){
            assert!(graph.degree(&node) >= 2);
        }
    }
}
