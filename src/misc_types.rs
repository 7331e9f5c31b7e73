use{
    serde::{Serialize, Deserialize},

    std::num::*,

    crate::centrality::{top_k, CentralityKind},
    crate::experiment::SeedRule,
    crate::graph::{barabasi_albert, erdos_renyi, ring, star, ContactGraph},
    crate::spectral::SpectralError,
    rand::SeedableRng,
    rand_pcg::Pcg64,
};

pub const DEFAULT_SYSTEM_SIZE: NonZeroUsize = unsafe{NonZeroUsize::new_unchecked(200)};
pub const DEFAULT_RECOVERY_RATE: f64 = 1.0;
pub const DEFAULT_GRAPH_SEED: u64 = 875629289;
pub const DEFAULT_SIR_SEED: u64 = 1489264107025;
pub const DEFAULT_ITERATIONS: usize = 10;
pub const DEFAULT_REPORT_STEPS: NonZeroUsize = unsafe{NonZeroUsize::new_unchecked(1000)};
pub const DEFAULT_STRENGTH_DIGITS: u32 = 3;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum GraphType{
    Ring(usize),
    Star(usize),
    ErdosRenyi(usize, f64),
    Barabasi(usize, usize),
}

impl GraphType{
    pub fn name(&self) -> String
    {
        match self
        {
            Self::Ring(n) => format!("ring{}", n),
            Self::Star(leaves) => format!("star{}", leaves),
            Self::ErdosRenyi(n, p) => format!("er{}p{}", n, p),
            Self::Barabasi(n, m) => format!("ba{}m{}", n, m),
        }
    }

    pub fn build(&self, graph_seed: u64) -> ContactGraph<u32>
    {
        let mut rng = Pcg64::seed_from_u64(graph_seed);
        match *self{
            Self::Ring(n) => ring(n),
            Self::Star(leaves) => star(leaves),
            Self::ErdosRenyi(n, p) => erdos_renyi(n, p, &mut rng),
            Self::Barabasi(n, m) => barabasi_albert(n, m, &mut rng),
        }
    }
}

/// How the initially infected set of each run is chosen: redrawn uniformly
/// at random, or fixed to the top nodes of a centrality ranking.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub enum SeedChoice{
    Random,
    Central(CentralityKind),
}

impl SeedChoice{
    pub fn name(&self) -> String
    {
        match self{
            Self::Random => "Rand".into(),
            Self::Central(kind) => kind.name().into(),
        }
    }

    pub fn build_rule(
        &self,
        graph: &ContactGraph<u32>,
        initial_size: usize
    ) -> Result<SeedRule<u32>, SpectralError>
    {
        match self{
            Self::Random => Ok(SeedRule::UniformRandom(initial_size)),
            Self::Central(kind) => Ok(SeedRule::Explicit(top_k(graph, *kind, initial_size)?)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct F64RangeBuilder
{
    pub start: f64,
    pub end: f64,
    pub steps: NonZeroUsize
}

impl F64RangeBuilder{
    /// Linearly spaced values including both ends.
    pub fn get_range(&self) -> Vec<f64>
    {
        let steps = self.steps.get();
        if steps == 1{
            return vec![self.start];
        }
        (0..steps)
            .map(|i| {
                self.start + (self.end - self.start) * i as f64 / (steps - 1) as f64
            })
            .collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LogRangeBuilder
{
    pub start: f64,
    pub end: f64,
    pub steps: NonZeroUsize
}

impl LogRangeBuilder{
    /// Logarithmically spaced values from `start` to `end`, both positive.
    pub fn get_range(&self) -> Vec<f64>
    {
        let steps = self.steps.get();
        if steps == 1{
            return vec![self.start];
        }
        let ratio = self.end / self.start;
        (0..steps)
            .map(|i| self.start * ratio.powf(i as f64 / (steps - 1) as f64))
            .collect()
    }
}
