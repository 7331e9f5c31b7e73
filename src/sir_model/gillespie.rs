use{
    crate::event_set::EventSet,
    crate::graph::{ContactGraph, NodeId},
    rand::Rng,
    rand::SeedableRng,
    rand_distr::{Distribution, Exp},
    rand_pcg::Pcg64,
    std::collections::HashMap,
    super::{SirState, Trajectory}
};

/// Event-driven continuous-time SIR engine (Gillespie algorithm).
///
/// Holds the per-run mutable state: one status per node, the set of infected
/// nodes and the set of infectious IS links, both in O(1) event sets so the
/// per-event cost stays constant in graph size. The link set satisfies
/// `(u, v)` present iff `u` is infected, `v` susceptible and `{u, v}` is a
/// graph edge; all transitions below preserve that.
#[derive(Clone)]
pub struct GillespieSir<'a, T: NodeId>{
    graph: &'a ContactGraph<T>,
    transmission_rate: f64,
    recovery_rate: f64,
    t_min: f64,
    t_max: f64,
    rng: Pcg64,
    status: HashMap<T, SirState>,
    infecteds: EventSet<T>,
    is_links: EventSet<(T, T)>,
    sus_count: u32,
    inf_count: u32,
    rec_count: u32,
    time: f64,
}

impl<'a, T: NodeId> GillespieSir<'a, T>{
    pub fn new(
        graph: &'a ContactGraph<T>,
        transmission_rate: f64,
        recovery_rate: f64,
        t_min: f64,
        t_max: f64,
        sir_seed: u64
    ) -> Self
    {
        Self::from_rng(
            graph,
            transmission_rate,
            recovery_rate,
            t_min,
            t_max,
            Pcg64::seed_from_u64(sir_seed)
        )
    }

    pub fn from_rng(
        graph: &'a ContactGraph<T>,
        transmission_rate: f64,
        recovery_rate: f64,
        t_min: f64,
        t_max: f64,
        rng: Pcg64
    ) -> Self
    {
        Self{
            graph,
            transmission_rate,
            recovery_rate,
            t_min,
            t_max,
            rng,
            status: HashMap::with_capacity(graph.node_count()),
            infecteds: EventSet::new(),
            is_links: EventSet::new(),
            sus_count: 0,
            inf_count: 0,
            rec_count: 0,
            time: t_min,
        }
    }

    pub fn status_of(&self, node: &T) -> Option<SirState>{
        self.status.get(node).copied()
    }

    /// Runs one full trajectory from a fresh initial condition. Seeds are
    /// deduplicated (a node listed twice is infected once); seeds not in the
    /// graph are skipped. Stops when no node is infected, when the total
    /// rate is zero, or when the next event would pass `t_max`.
    pub fn propagate_until_completion(&mut self, initial_infected: &[T]) -> Trajectory{
        self.reset(initial_infected);
        let mut trajectory = Trajectory::new();
        trajectory.push(self.time, self.sus_count, self.inf_count, self.rec_count);

        while !self.infecteds.is_empty(){
            if !self.step(){
                break;
            }
            trajectory.push(self.time, self.sus_count, self.inf_count, self.rec_count);
        }
        trajectory
    }

    fn reset(&mut self, initial_infected: &[T]){
        self.status.clear();
        for node in self.graph.nodes(){
            self.status.insert(node, SirState::Susceptible);
        }
        self.infecteds = EventSet::with_capacity(initial_infected.len());
        self.is_links = EventSet::new();
        self.time = self.t_min;

        for seed in initial_infected{
            match self.status.get_mut(seed){
                Some(state) if state.sus_check() => {
                    *state = SirState::Infected;
                    self.infecteds.add(*seed);
                }
                _ => {} // duplicate seed or not a graph node
            }
        }
        let graph = self.graph;
        for &node in self.infecteds.iter(){
            for neighbor in graph.neighbors(&node){
                if self.status[&neighbor].sus_check(){
                    self.is_links.add((node, neighbor));
                }
            }
        }

        self.inf_count = self.infecteds.len() as u32;
        self.sus_count = self.graph.node_count() as u32 - self.inf_count;
        self.rec_count = 0;
    }

    /// Executes the next event. Returns false when the process halted
    /// instead (quiescence or stop time) and nothing was recorded.
    fn step(&mut self) -> bool{
        let total_recovery_rate = self.recovery_rate * self.infecteds.len() as f64;
        let total_transmission_rate = self.transmission_rate * self.is_links.len() as f64;
        let total_rate = total_recovery_rate + total_transmission_rate;
        if total_rate <= 0.0{
            return false;
        }

        let delay = Exp::new(total_rate).unwrap().sample(&mut self.rng);
        let next_time = self.time + delay;
        if next_time >= self.t_max{
            return false;
        }
        self.time = next_time;

        if self.rng.gen::<f64>() < total_recovery_rate / total_rate{
            self.recovery_event();
        } else {
            self.transmission_event();
        }
        true
    }

    fn recovery_event(&mut self){
        // the caller only steps while infecteds is non-empty
        let node = self.infecteds.remove_random(&mut self.rng).unwrap();
        *self.status.get_mut(&node).unwrap() = SirState::Recovered;

        let graph = self.graph;
        for neighbor in graph.neighbors(&node){
            if self.status[&neighbor].sus_check(){
                self.is_links
                    .remove(&(node, neighbor))
                    .expect("IS link of recovering node must be tracked");
            }
        }
        self.inf_count -= 1;
        self.rec_count += 1;
    }

    fn transmission_event(&mut self){
        // a transmission is only drawn when the transmission rate is positive
        let (_, recipient) = self.is_links.choose_uniform(&mut self.rng).unwrap();
        *self.status.get_mut(&recipient).unwrap() = SirState::Infected;
        self.infecteds.add(recipient);

        let graph = self.graph;
        for neighbor in graph.neighbors(&recipient){
            match self.status[&neighbor]{
                SirState::Susceptible => {
                    self.is_links.add((recipient, neighbor));
                }
                SirState::Infected => {
                    // the neighbor's link towards the recipient just died,
                    // including the transmitting link itself
                    self.is_links
                        .remove(&(neighbor, recipient))
                        .expect("IS link towards freshly infected node must be tracked");
                }
                SirState::Recovered => {}
            }
        }
        self.sus_count -= 1;
        self.inf_count += 1;
    }
}

#[cfg(test)]
mod tests{
    use super::*;
    use crate::graph::{ring, star, ContactGraph};
    use std::collections::HashSet;

    fn assert_state_invariants(model: &GillespieSir<'_, u32>){
        let n = model.graph.node_count() as u32;
        assert_eq!(model.sus_count + model.inf_count + model.rec_count, n);
        assert_eq!(model.inf_count as usize, model.infecteds.len());

        // full recomputation of the IS-link set from scratch
        let mut expected = HashSet::new();
        for u in model.graph.nodes(){
            if !model.status[&u].inf_check(){
                continue;
            }
            for v in model.graph.neighbors(&u){
                if model.status[&v].sus_check(){
                    expected.insert((u, v));
                }
            }
        }
        let actual: HashSet<_> = model.is_links.iter().copied().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn edge_invariant_holds_after_every_event(){
        let graph = ring(20);
        let mut model = GillespieSir::new(&graph, 1.3, 0.7, 0.0, f64::INFINITY, 2897);
        model.reset(&[0, 5]);
        assert_state_invariants(&model);
        while !model.infecteds.is_empty(){
            if !model.step(){
                break;
            }
            assert_state_invariants(&model);
        }
        assert_eq!(model.inf_count, 0);
    }

    #[test]
    fn four_cycle_fully_recovers(){
        let graph = ring(4);
        let mut model = GillespieSir::new(&graph, 1.0, 1.0, 0.0, f64::INFINITY, 31415);
        for run in 0..50{
            let trajectory = model.propagate_until_completion(&[0]);
            assert_eq!(trajectory.final_infected(), 0, "run {}", run);
            let recovered = trajectory.final_recovered();
            assert!(recovered >= 1 && recovered <= 4);
        }
    }

    #[test]
    fn isolated_seed_recovers_without_spreading(){
        let mut graph = ContactGraph::new();
        graph.add_node(9_u32);
        graph.add_edge(1, 2).unwrap();

        let mut model = GillespieSir::new(&graph, 5.0, 1.0, 0.0, f64::INFINITY, 77);
        let trajectory = model.propagate_until_completion(&[9]);

        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory.inf, vec![1, 0]);
        assert_eq!(trajectory.rec, vec![0, 1]);
        assert_eq!(trajectory.sus, vec![2, 2]);
        assert!(model.is_links.is_empty());
    }

    #[test]
    fn no_seeds_yield_single_quiescent_point(){
        let graph = ring(6);
        let mut model = GillespieSir::new(&graph, 1.0, 1.0, 0.0, f64::INFINITY, 0);
        let trajectory = model.propagate_until_completion(&[]);
        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory.sus, vec![6]);
        assert_eq!(trajectory.inf, vec![0]);
    }

    #[test]
    fn duplicate_seeds_are_deduplicated(){
        let graph = ring(6);
        let mut model = GillespieSir::new(&graph, 1.0, 1.0, 0.0, f64::INFINITY, 5);
        model.reset(&[2, 2, 2]);
        assert_eq!(model.inf_count, 1);
        assert_eq!(model.sus_count, 5);
    }

    #[test]
    fn monotone_compartments_over_a_trajectory(){
        let graph = star(15);
        let mut model = GillespieSir::new(&graph, 2.0, 0.5, 0.0, f64::INFINITY, 98765);
        let trajectory = model.propagate_until_completion(&[0]);

        for window in trajectory.sus.windows(2){
            assert!(window[1] <= window[0], "S must be non-increasing");
        }
        for window in trajectory.rec.windows(2){
            assert!(window[1] >= window[0], "R must be non-decreasing");
        }
        for window in trajectory.times.windows(2){
            assert!(window[1] > window[0], "times must be strictly increasing");
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_trajectory(){
        let graph = ring(30);
        let run = |seed| {
            let mut model = GillespieSir::new(&graph, 0.8, 0.6, 0.0, f64::INFINITY, seed);
            model.propagate_until_completion(&[3])
        };
        let a = run(123);
        let b = run(123);
        assert_eq!(a.times, b.times);
        assert_eq!(a.sus, b.sus);
        assert_eq!(a.inf, b.inf);
        assert_eq!(a.rec, b.rec);

        let c = run(124);
        assert_ne!(a.times, c.times);
    }

    #[test]
    fn stop_time_halts_without_recording(){
        let graph = ring(40);
        let mut model = GillespieSir::new(&graph, 1.0, 0.01, 0.0, 0.5, 4242);
        let trajectory = model.propagate_until_completion(&[0]);
        for &t in &trajectory.times{
            assert!(t < 0.5);
        }
    }
}
